pub mod base;
pub mod buffers;
pub mod device;
pub mod display;
pub mod error;
pub mod geometry;
pub mod imageio;
pub mod integrator;
pub mod misc;
pub mod options;
pub mod prelude;
pub mod progress;
pub mod rng;
pub mod sampling;
pub mod scene;
pub mod session;
pub mod spectrum;
