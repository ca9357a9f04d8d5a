pub mod core;
pub mod devices;
pub mod displays;
pub mod integrators;
