use crate::core::buffers::*;
use crate::core::device::*;
use crate::core::integrator::*;
use crate::core::prelude::*;
use crate::core::scene::Scene;
use crate::integrators::create_integrator;

use log::*;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Renders tiles on the host, one row per rayon task.
pub struct CpuDevice {
    info: DeviceInfo,
    pool: ThreadPool,
}

impl CpuDevice {
    pub fn new(info: &DeviceInfo, threads: usize) -> Result<Self, RenderError> {
        let num = info.num;
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("cpu-device-{}-{}", num, i))
            .build()
            .map_err(|e| RenderError::Device(e.to_string()))?;
        let mut info = info.clone();
        info.description = format!("CPU ({} threads)", pool.current_num_threads());
        debug!("Created {} with id {}", info.description, info.id);
        return Ok(CpuDevice { info, pool });
    }
}

impl Device for CpuDevice {
    fn info(&self) -> &DeviceInfo {
        return &self.info;
    }

    fn render_tile(&self, scene: &Scene, tile: &RenderTile) -> Result<TileResult, RenderError> {
        let integrator = create_integrator(scene);
        let y0 = tile.bounds.min.y;
        let y1 = tile.bounds.max.y;
        let rows: Vec<Vec<Spectrum>> = self.pool.install(|| {
            (y0..y1)
                .into_par_iter()
                .map(|y| render_tile_row(integrator.as_ref(), scene, tile, y))
                .collect()
        });

        let mut result = TileResult::new(tile);
        let width = tile.bounds.width().max(0) as usize;
        for (j, row) in rows.iter().enumerate() {
            let offset = j * width;
            result.radiance[offset..offset + row.len()].copy_from_slice(row);
        }
        return Ok(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::*;

    #[test]
    fn test_001() {
        let camera = Camera::new(
            16,
            16,
            &Point3f::zero(),
            &Point3f::new(0.0, 0.0, -1.0),
            &Vector3f::new(0.0, 1.0, 0.0),
            45.0,
        );
        let shaders = [Shader {
            name: "white".to_string(),
            albedo: Spectrum::new(0.8, 0.8, 0.8),
            emission: Spectrum::zero(),
        }];
        let objects = [Sphere::new(&Point3f::new(0.0, 0.0, -3.0), 1.0, 0)];
        let lights = [Light::Background {
            color: Spectrum::new(1.0, 1.0, 1.0),
        }];
        let scene = Scene::new(
            &camera,
            &objects,
            &shaders,
            &lights,
            &IntegratorSettings::default(),
            &SceneParams::default(),
        )
        .unwrap();
        let tile = RenderTile {
            index: 0,
            bounds: Bounds2i::from(((4, 4), (12, 10))),
            sample: 0,
            num_samples: 2,
            buffer: BufferParams::new(16, 16),
        };

        let device = CpuDevice::new(&DeviceInfo::cpu(2), 2).unwrap();
        let parallel = device.render_tile(&scene, &tile).unwrap();
        let serial = render_tile_samples(create_integrator(&scene).as_ref(), &scene, &tile);
        assert_eq!(parallel.radiance, serial.radiance);
        assert_eq!(parallel.radiance.len(), 48);
    }
}
