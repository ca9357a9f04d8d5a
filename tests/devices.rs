use radiance_session::core::buffers::*;
use radiance_session::core::device::*;
use radiance_session::core::prelude::*;
use radiance_session::core::scene::*;

#[test]
fn devices_registry_lists_cpu() {
    let devices = available_devices();
    assert!(!devices.is_empty());
    assert_eq!(devices[0].device_type, DeviceType::Cpu);
    assert!(available_types().contains(&DeviceType::Cpu));
    let cpu = find_device(DeviceType::Cpu).unwrap();
    assert!(cpu.advanced_shading);
    assert!(find_device(DeviceType::Cuda).is_none());
}

#[test]
fn devices_type_names() {
    assert_eq!(type_from_string("CPU"), DeviceType::Cpu);
    assert_eq!(type_from_string(" opencl "), DeviceType::OpenCl);
    assert_eq!(type_from_string("quantum"), DeviceType::None);
    assert_eq!(string_from_type(DeviceType::Cuda), "cuda");
    assert_eq!(string_from_type(DeviceType::None), "none");
    assert_eq!(DeviceType::Network.to_string(), "network");
}

#[test]
fn devices_create() {
    let cpu = DeviceInfo::cpu(2);
    let devices = create_devices(&cpu, 2).unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].info().description, "CPU (2 threads)");

    let multi = DeviceInfo::multi(&[DeviceInfo::cpu(1), DeviceInfo::cpu(1)]);
    assert_eq!(create_devices(&multi, 1).unwrap().len(), 2);

    let mut cuda = DeviceInfo::cpu(1);
    cuda.device_type = DeviceType::Cuda;
    let err = create_devices(&cuda, 1).err().unwrap();
    assert!(err.is_configuration());
}

#[test]
fn devices_cpu_split_sample_range() {
    let json = r#"{
        "camera": { "width": 8, "height": 8, "position": [0, 0, 0], "look_at": [0, 0, -1] },
        "shaders": [ { "name": "grey", "albedo": [0.6, 0.6, 0.6] } ],
        "objects": [ { "type": "sphere", "center": [0, 0, -3], "radius": 1.2, "shader": "grey" } ],
        "lights": [
            { "type": "background", "color": [0.2, 0.2, 0.2] },
            { "type": "point", "position": [2, 2, 0], "intensity": [5, 5, 5] }
        ]
    }"#;
    let scene = parse_scene(json, &SceneParams::default()).unwrap();
    let params = BufferParams::new(8, 8);
    let devices = create_devices(&DeviceInfo::cpu(2), 2).unwrap();
    let device = &devices[0];

    let tile = |sample, num_samples| RenderTile {
        index: 0,
        bounds: params.bounds(),
        sample,
        num_samples,
        buffer: params,
    };

    let mut whole = RenderBuffers::new();
    whole.allocate(&params).unwrap();
    whole
        .accumulate(&device.render_tile(&scene, &tile(0, 4)).unwrap())
        .unwrap();

    let mut split = RenderBuffers::new();
    split.allocate(&params).unwrap();
    split
        .accumulate(&device.render_tile(&scene, &tile(2, 2)).unwrap())
        .unwrap();
    split
        .accumulate(&device.render_tile(&scene, &tile(0, 2)).unwrap())
        .unwrap();

    let a = whole.resolve(None);
    let b = split.resolve(None);
    for (x, y) in a.rgb.iter().zip(b.rgb.iter()) {
        assert!((x - y).abs() < 1e-4, "{} != {}", x, y);
    }
}
