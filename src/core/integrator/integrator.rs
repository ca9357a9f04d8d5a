use crate::core::buffers::*;
use crate::core::prelude::*;
use crate::core::rng::RNG;
use crate::core::scene::*;

use log::*;

/// Estimates incident radiance along camera rays.
pub trait Integrator: Send + Sync {
    fn li(&self, ray: &Ray, scene: &Scene, rng: &mut RNG) -> Spectrum;
}

fn validate_radiance_result(l: Spectrum, pixel: &Point2i) -> Spectrum {
    if !l.is_valid() {
        error!(
            "Not-a-number radiance value returned for pixel ({}, {}). Setting to black.",
            pixel.x, pixel.y
        );
        return Spectrum::zero();
    }
    if l.y() < -1e-5 {
        error!(
            "Negative luminance value, {}, returned for pixel ({}, {}). Setting to black.",
            l.y(),
            pixel.x,
            pixel.y
        );
        return Spectrum::zero();
    }
    if l.y().is_infinite() {
        error!(
            "Infinite luminance value returned for pixel ({}, {}). Setting to black.",
            pixel.x, pixel.y
        );
        return Spectrum::zero();
    }
    return l;
}

fn clamp_sample(l: Spectrum, clamp: Float) -> Spectrum {
    if clamp <= 0.0 {
        return l;
    }
    let m = l.max_component_value();
    if m > clamp {
        return l * (clamp / m);
    }
    return l;
}

/// Radiance sums over the tile's sample range for buffer row `y`, one entry
/// per tile column.
///
/// Each (pixel, sample) pair draws from its own random stream keyed by the
/// full-frame pixel index, so the result does not depend on how the range is
/// split into units or which device renders it.
pub fn render_tile_row(
    integrator: &dyn Integrator,
    scene: &Scene,
    tile: &RenderTile,
    y: i32,
) -> Vec<Spectrum> {
    let x0 = tile.bounds.min.x;
    let x1 = tile.bounds.max.x;
    let full_width = tile.buffer.full_width;
    let full_height = tile.buffer.full_height;
    let clamp = scene.integrator.sample_clamp;
    let mut row = Vec::with_capacity((x1 - x0).max(0) as usize);
    for x in x0..x1 {
        let pixel = Point2i::new(x, y);
        let full = tile.full_pixel(&pixel);
        let pixel_index = full.y as u64 * full_width as u64 + full.x as u64;
        let mut sum = Spectrum::zero();
        for s in tile.sample..(tile.sample + tile.num_samples) {
            let mut rng = RNG::for_pixel_sample(pixel_index, s);
            let jitter = rng.uniform_2d();
            let p_film = Point2f::new(full.x as Float + jitter.x, full.y as Float + jitter.y);
            let ray = scene
                .camera
                .generate_ray(&p_film, full_width, full_height);
            let l = integrator.li(&ray, scene, &mut rng);
            let l = validate_radiance_result(l, &full);
            sum += clamp_sample(l, clamp);
        }
        row.push(sum);
    }
    return row;
}

/// Serial rendering of a whole tile.
pub fn render_tile_samples(
    integrator: &dyn Integrator,
    scene: &Scene,
    tile: &RenderTile,
) -> TileResult {
    let mut result = TileResult::new(tile);
    for y in tile.bounds.min.y..tile.bounds.max.y {
        let row = render_tile_row(integrator, scene, tile, y);
        for (i, l) in row.iter().enumerate() {
            let p = Point2i::new(tile.bounds.min.x + i as i32, y);
            result.add_sample(&p, l);
        }
    }
    return result;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantIntegrator;

    impl Integrator for ConstantIntegrator {
        fn li(&self, _ray: &Ray, _scene: &Scene, _rng: &mut RNG) -> Spectrum {
            return Spectrum::new(0.5, 0.25, 1.0);
        }
    }

    fn scene() -> Scene {
        let camera = Camera::new(
            8,
            8,
            &Point3f::zero(),
            &Point3f::new(0.0, 0.0, -1.0),
            &Vector3f::new(0.0, 1.0, 0.0),
            45.0,
        );
        Scene::new(
            &camera,
            &[],
            &[],
            &[],
            &IntegratorSettings::default(),
            &SceneParams::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_001() {
        let scene = scene();
        let tile = RenderTile {
            index: 0,
            bounds: Bounds2i::from(((2, 2), (5, 4))),
            sample: 3,
            num_samples: 4,
            buffer: BufferParams::new(8, 8),
        };
        let result = render_tile_samples(&ConstantIntegrator, &scene, &tile);
        assert_eq!(result.radiance.len(), 6);
        for l in result.radiance.iter() {
            assert_eq!(*l, Spectrum::new(2.0, 1.0, 4.0));
        }
    }

    #[test]
    fn test_002() {
        assert_eq!(
            clamp_sample(Spectrum::new(4.0, 2.0, 1.0), 2.0),
            Spectrum::new(2.0, 1.0, 0.5)
        );
        let nan = Spectrum::new(Float::NAN, 0.0, 0.0);
        assert_eq!(
            validate_radiance_result(nan, &Point2i::new(0, 0)),
            Spectrum::zero()
        );
    }
}
