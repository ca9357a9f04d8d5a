use crate::core::buffers::*;
use crate::core::error::*;
use crate::core::scene::Scene;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    None,
    Cpu,
    Cuda,
    OpenCl,
    Network,
    Multi,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::registry::string_from_type(*self))
    }
}

/// Static description of a compute device, probed once per process.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub description: String,
    pub id: String,
    pub num: usize,
    /// The device can present directly to a screen.
    pub display_device: bool,
    /// The device can run the OSL shading system.
    pub advanced_shading: bool,
    /// Leaf devices combined by a `Multi` device.
    pub multi_devices: Vec<DeviceInfo>,
}

impl DeviceInfo {
    pub fn cpu(threads: usize) -> Self {
        DeviceInfo {
            device_type: DeviceType::Cpu,
            description: format!("CPU ({} threads)", threads),
            id: String::from("CPU"),
            num: 0,
            display_device: false,
            advanced_shading: true,
            multi_devices: Vec::new(),
        }
    }

    /// Combines leaf devices into one. Advanced shading is only available
    /// when every sub-device supports it.
    pub fn multi(devices: &[DeviceInfo]) -> Self {
        let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
        DeviceInfo {
            device_type: DeviceType::Multi,
            description: format!("Multi Device ({} devices)", devices.len()),
            id: format!("MULTI_{}", ids.join("_")),
            num: 0,
            display_device: devices.iter().any(|d| d.display_device),
            advanced_shading: devices.iter().all(|d| d.advanced_shading),
            multi_devices: devices.to_vec(),
        }
    }

    /// Leaf devices this info stands for: itself, or its sub-devices.
    pub fn leaves(&self) -> Vec<&DeviceInfo> {
        if self.device_type == DeviceType::Multi {
            return self.multi_devices.iter().flat_map(|d| d.leaves()).collect();
        }
        return vec![self];
    }
}

/// A compute device able to render tiles of a scene.
pub trait Device: Send + Sync {
    fn info(&self) -> &DeviceInfo;
    fn render_tile(&self, scene: &Scene, tile: &RenderTile) -> Result<TileResult, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let a = DeviceInfo::cpu(4);
        let mut b = DeviceInfo::cpu(2);
        b.num = 1;
        b.advanced_shading = false;
        b.id = String::from("CPU_1");
        let multi = DeviceInfo::multi(&[a.clone(), b.clone()]);
        assert_eq!(multi.device_type, DeviceType::Multi);
        assert_eq!(multi.id, "MULTI_CPU_CPU_1");
        assert!(!multi.advanced_shading);
        assert_eq!(multi.leaves(), vec![&a, &b]);
        assert_eq!(a.leaves(), vec![&a]);
    }
}
