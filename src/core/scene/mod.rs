pub mod camera;
pub mod light;
pub mod loader;
pub mod scene;
pub mod scene_params;
pub mod sphere;

pub use camera::*;
pub use light::*;
pub use loader::*;
pub use scene::*;
pub use scene_params::*;
pub use sphere::*;
