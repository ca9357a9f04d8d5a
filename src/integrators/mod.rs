pub mod create_integrator;
pub mod path;

pub use create_integrator::*;
pub use path::*;
