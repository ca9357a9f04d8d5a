pub mod cpu_device;

pub use cpu_device::*;
