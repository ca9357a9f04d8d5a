pub mod rgb;

pub use rgb::*;
