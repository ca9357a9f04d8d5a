use super::device::*;
use crate::core::error::*;
use crate::devices::CpuDevice;

use log::*;
use std::sync::{Arc, LazyLock};

static DEVICES: LazyLock<Vec<DeviceInfo>> = LazyLock::new(probe_devices);

fn probe_devices() -> Vec<DeviceInfo> {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let devices = device_list(vec![DeviceInfo::cpu(threads)]);
    for d in devices.iter() {
        info!("Found device: {} ({})", d.description, d.id);
    }
    return devices;
}

/// Probed leaf devices, followed by a MULTI entry over all of them when
/// there is more than one.
fn device_list(mut leaves: Vec<DeviceInfo>) -> Vec<DeviceInfo> {
    for (num, d) in leaves.iter_mut().enumerate() {
        d.num = num;
    }
    if leaves.len() > 1 {
        let multi = DeviceInfo::multi(&leaves);
        leaves.push(multi);
    }
    return leaves;
}

const TYPE_NAMES: [(DeviceType, &str); 5] = [
    (DeviceType::Cpu, "cpu"),
    (DeviceType::Cuda, "cuda"),
    (DeviceType::OpenCl, "opencl"),
    (DeviceType::Network, "network"),
    (DeviceType::Multi, "multi"),
];

/// Case-insensitive; unknown names map to `DeviceType::None`.
pub fn type_from_string(name: &str) -> DeviceType {
    let name = name.trim().to_ascii_lowercase();
    for (t, n) in TYPE_NAMES.iter() {
        if *n == name {
            return *t;
        }
    }
    return DeviceType::None;
}

pub fn string_from_type(device_type: DeviceType) -> &'static str {
    for (t, n) in TYPE_NAMES.iter() {
        if *t == device_type {
            return n;
        }
    }
    return "none";
}

/// Devices found on this machine, in probe order.
pub fn available_devices() -> &'static [DeviceInfo] {
    return DEVICES.as_slice();
}

/// Distinct device types, in probe order.
pub fn available_types() -> Vec<DeviceType> {
    let mut types = Vec::new();
    for d in available_devices() {
        if !types.contains(&d.device_type) {
            types.push(d.device_type);
        }
    }
    return types;
}

/// First probed device of the given type.
pub fn find_device(device_type: DeviceType) -> Option<DeviceInfo> {
    return available_devices()
        .iter()
        .find(|d| d.device_type == device_type)
        .cloned();
}

/// Instantiates one device per leaf of `info`. `threads` is the worker
/// count of each CPU device; 0 uses every core.
pub fn create_devices(
    info: &DeviceInfo,
    threads: usize,
) -> Result<Vec<Arc<dyn Device>>, RenderError> {
    let mut devices: Vec<Arc<dyn Device>> = Vec::new();
    for leaf in info.leaves() {
        match leaf.device_type {
            DeviceType::Cpu => {
                devices.push(Arc::new(CpuDevice::new(leaf, threads)?));
            }
            DeviceType::None => {
                return Err(RenderError::config("Unknown device"));
            }
            DeviceType::Multi => {
                return Err(RenderError::config("Multi device without sub-devices"));
            }
            t => {
                let msg = format!("Device type {} is not supported by this build", t);
                return Err(RenderError::Config(msg));
            }
        }
    }
    if devices.is_empty() {
        let msg = format!("No devices to render with for {}", info.description);
        return Err(RenderError::Config(msg));
    }
    return Ok(devices);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        assert_eq!(type_from_string("CPU"), DeviceType::Cpu);
        assert_eq!(type_from_string("OpenCL"), DeviceType::OpenCl);
        assert_eq!(type_from_string("vulkan"), DeviceType::None);
        assert_eq!(string_from_type(DeviceType::Cuda), "cuda");
        assert_eq!(string_from_type(DeviceType::None), "none");
        for t in [
            DeviceType::Cpu,
            DeviceType::Cuda,
            DeviceType::OpenCl,
            DeviceType::Network,
            DeviceType::Multi,
        ] {
            assert_eq!(type_from_string(string_from_type(t)), t);
        }
    }

    #[test]
    fn test_002() {
        let devices = available_devices();
        assert!(!devices.is_empty());
        assert_eq!(devices[0].device_type, DeviceType::Cpu);
        assert!(std::ptr::eq(devices, available_devices()));
        assert_eq!(available_types()[0], DeviceType::Cpu);
        assert!(find_device(DeviceType::Cpu).is_some());
        assert!(find_device(DeviceType::Cuda).is_none());
    }

    #[test]
    fn test_003() {
        let mut cuda = DeviceInfo::cpu(1);
        cuda.device_type = DeviceType::Cuda;
        let err = create_devices(&cuda, 1).err().unwrap();
        assert!(err.is_configuration());

        let multi = DeviceInfo::multi(&[DeviceInfo::cpu(1), DeviceInfo::cpu(1)]);
        let devices = create_devices(&multi, 1).unwrap();
        assert_eq!(devices.len(), 2);
    }

    #[test]
    fn test_004() {
        let single = device_list(vec![DeviceInfo::cpu(4)]);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].device_type, DeviceType::Cpu);

        let list = device_list(vec![DeviceInfo::cpu(2), DeviceInfo::cpu(2)]);
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].num, 1);
        let multi = &list[2];
        assert_eq!(multi.device_type, DeviceType::Multi);
        assert_eq!(multi.leaves().len(), 2);
        assert_eq!(create_devices(multi, 1).unwrap().len(), 2);
    }
}
