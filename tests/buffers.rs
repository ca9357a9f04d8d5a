use radiance_session::core::buffers::*;
use radiance_session::core::prelude::*;

fn tile_result(params: &BufferParams, bounds: Bounds2i, sample: u32, n: u32) -> TileResult {
    let tile = RenderTile {
        index: 0,
        bounds,
        sample,
        num_samples: n,
        buffer: *params,
    };
    let mut result = TileResult::new(&tile);
    // radiance of sample i is i
    let sum: u32 = (sample..sample + n).sum();
    for l in result.radiance.iter_mut() {
        *l = Spectrum::new(sum as Float, sum as Float, sum as Float);
    }
    return result;
}

#[test]
fn buffers_merge_order_independent() {
    let params = BufferParams::new(4, 2);
    let bounds = params.bounds();
    let parts = [
        tile_result(&params, bounds, 0, 3),
        tile_result(&params, bounds, 3, 1),
        tile_result(&params, bounds, 4, 4),
    ];

    let mut forward = RenderBuffers::new();
    forward.allocate(&params).unwrap();
    for p in parts.iter() {
        forward.accumulate(p).unwrap();
    }
    let mut backward = RenderBuffers::new();
    backward.allocate(&params).unwrap();
    for p in parts.iter().rev() {
        backward.accumulate(p).unwrap();
    }

    let a = forward.resolve(None);
    let b = backward.resolve(None);
    assert_eq!(a, b);
    assert_eq!(a.get_pixel(3, 1), [3.5, 3.5, 3.5]);
    assert_eq!(forward.get_sample_weight(0, 0), 8.0);
}

#[test]
fn buffers_reallocate_discards_samples() {
    let params = BufferParams::new(2, 2);
    let mut buffers = RenderBuffers::new();
    buffers.allocate(&params).unwrap();
    buffers
        .accumulate(&tile_result(&params, params.bounds(), 0, 4))
        .unwrap();
    buffers.allocate(&params).unwrap();
    assert_eq!(buffers.get_sample_weight(1, 1), 0.0);
    assert_eq!(buffers.resolve(None).get_pixel(1, 1), [0.0; 3]);

    let bigger = BufferParams::new(3, 3);
    buffers.allocate(&bigger).unwrap();
    assert_eq!(*buffers.params(), bigger);
    // tiles for the old shape are rejected
    assert!(buffers
        .accumulate(&tile_result(&params, params.bounds(), 0, 1))
        .is_err());
}

#[test]
fn buffers_crop_window() {
    let params = BufferParams::from_crop_window(100, 50, &[0.25, 0.75, 0.0, 0.5]).unwrap();
    assert_eq!(params.width, 50);
    assert_eq!(params.height, 25);
    assert_eq!((params.full_x, params.full_y), (25, 0));
    assert_eq!((params.full_width, params.full_height), (100, 50));

    assert!(BufferParams::from_crop_window(100, 50, &[0.5, 0.5, 0.0, 1.0]).is_err());
    assert!(BufferParams::from_crop_window(100, 50, &[0.0, 1.5, 0.0, 1.0]).is_err());
}

#[test]
fn buffers_tone_mapping_on_resolve() {
    let params = BufferParams::new(1, 1);
    let mut buffers = RenderBuffers::new();
    buffers.allocate(&params).unwrap();
    buffers
        .accumulate(&tile_result(&params, params.bounds(), 0, 2))
        .unwrap();
    let exposure = ExposureToneMapper::from_stops(1.0);
    assert_eq!(buffers.resolve(Some(&exposure)).get_pixel(0, 0), [1.0; 3]);
    // resolve leaves the accumulation untouched
    assert_eq!(buffers.resolve(None).get_pixel(0, 0), [0.5; 3]);
}
