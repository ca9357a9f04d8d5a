use crate::core::integrator::*;
use crate::core::prelude::*;
use crate::core::rng::RNG;
use crate::core::sampling::*;
use crate::core::scene::*;

/// Diffuse path tracer with next-event estimation for point lights.
pub struct PathIntegrator {
    max_depth: u32,
    rr_threshold: Float,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, rr_threshold: Float) -> Self {
        PathIntegrator {
            max_depth,
            rr_threshold,
        }
    }

    fn sample_point_lights(scene: &Scene, p: &Point3f, n: &Normal3f) -> Spectrum {
        let mut ld = Spectrum::zero();
        for light in scene.lights.iter() {
            if let Light::Point {
                position,
                intensity,
            } = light
            {
                let to_light = *position - *p;
                let dist2 = to_light.length_squared();
                if dist2 == 0.0 {
                    continue;
                }
                let dist = dist2.sqrt();
                let wi = to_light * (1.0 / dist);
                let cos_theta = n.dot(&wi);
                if cos_theta <= 0.0 {
                    continue;
                }
                let origin = *p + *n * SHADOW_EPSILON;
                let shadow = Ray::new(&origin, &wi, dist * (1.0 - SHADOW_EPSILON));
                if scene.intersect_p(&shadow) {
                    continue;
                }
                ld += *intensity * (cos_theta / dist2);
            }
        }
        return ld;
    }
}

impl Integrator for PathIntegrator {
    fn li(&self, r: &Ray, scene: &Scene, rng: &mut RNG) -> Spectrum {
        let mut ray = *r;
        let mut l = Spectrum::zero();
        let mut beta = Spectrum::one();
        let mut bounces = 0;
        loop {
            let hit = match scene.intersect(&ray) {
                Some(hit) => hit,
                None => {
                    l += beta * scene.background();
                    break;
                }
            };
            let shader = scene.shader(hit.shader);
            l += beta * shader.emission;

            if shader.albedo.is_black() {
                break;
            }

            // Shade on the side the ray arrived from.
            let n = if hit.n.dot(&ray.d) > 0.0 { -hit.n } else { hit.n };

            // Lambertian: f = albedo / pi, so f * cos / pdf reduces to albedo
            // for cosine-weighted directions.
            let f = shader.albedo * INV_PI;
            l += beta * f * Self::sample_point_lights(scene, &hit.p, &n);

            if bounces >= self.max_depth {
                break;
            }

            let (nz, nx, ny) = Vector3f::coordinate_system(&n);
            let local = cosine_sample_hemisphere(&rng.uniform_2d());
            let wi = nx * local.x + ny * local.y + nz * local.z;
            if local.z <= 0.0 {
                break;
            }
            beta *= shader.albedo;

            if bounces > 3 && beta.max_component_value() < self.rr_threshold {
                let q = Float::max(0.05, 1.0 - beta.max_component_value());
                if rng.uniform_float() < q {
                    break;
                }
                beta = beta * (1.0 / (1.0 - q));
            }

            let origin = hit.p + n * SHADOW_EPSILON;
            ray = Ray::new(&origin, &wi.normalize(), Float::INFINITY);
            bounces += 1;
        }
        return l;
    }
}

pub fn create_path_integrator(settings: &IntegratorSettings) -> PathIntegrator {
    return PathIntegrator::new(settings.max_bounces, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(
            4,
            4,
            &Point3f::zero(),
            &Point3f::new(0.0, 0.0, -1.0),
            &Vector3f::new(0.0, 1.0, 0.0),
            45.0,
        )
    }

    #[test]
    fn test_001() {
        let background = Spectrum::new(0.25, 0.5, 1.0);
        let scene = Scene::new(
            &camera(),
            &[],
            &[],
            &[Light::Background { color: background }],
            &IntegratorSettings::default(),
            &SceneParams::default(),
        )
        .unwrap();
        let integrator = create_path_integrator(&scene.integrator);
        let ray = scene.camera.generate_ray(&Point2f::new(2.0, 2.0), 4, 4);
        let mut rng = RNG::new();
        assert_eq!(integrator.li(&ray, &scene, &mut rng), background);
    }

    #[test]
    fn test_002() {
        let shaders = [Shader {
            name: "lamp".to_string(),
            albedo: Spectrum::zero(),
            emission: Spectrum::new(2.0, 2.0, 2.0),
        }];
        let objects = [Sphere::new(&Point3f::new(0.0, 0.0, -4.0), 1.0, 0)];
        let scene = Scene::new(
            &camera(),
            &objects,
            &shaders,
            &[],
            &IntegratorSettings::default(),
            &SceneParams::default(),
        )
        .unwrap();
        let integrator = create_path_integrator(&scene.integrator);
        let ray = scene.camera.generate_ray(&Point2f::new(2.0, 2.0), 4, 4);
        let mut rng = RNG::new();
        assert_eq!(
            integrator.li(&ray, &scene, &mut rng),
            Spectrum::new(2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn test_003() {
        // A white floor lit from above by a point light, camera looking down.
        let shaders = [Shader {
            name: "white".to_string(),
            albedo: Spectrum::new(0.5, 0.5, 0.5),
            emission: Spectrum::zero(),
        }];
        let objects = [Sphere::new(&Point3f::new(0.0, -1001.0, 0.0), 1000.0, 0)];
        let lights = [Light::Point {
            position: Point3f::new(0.0, 3.0, 0.0),
            intensity: Spectrum::new(10.0, 10.0, 10.0),
        }];
        let camera = Camera::new(
            4,
            4,
            &Point3f::new(0.0, 1.0, 0.0),
            &Point3f::new(0.0, -1.0, 0.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            10.0,
        );
        let settings = IntegratorSettings {
            max_bounces: 0,
            sample_clamp: 0.0,
        };
        let scene = Scene::new(
            &camera,
            &objects,
            &shaders,
            &lights,
            &settings,
            &SceneParams::default(),
        )
        .unwrap();
        let integrator = create_path_integrator(&scene.integrator);
        let ray = scene.camera.generate_ray(&Point2f::new(2.0, 2.0), 4, 4);
        let mut rng = RNG::new();
        let l = integrator.li(&ray, &scene, &mut rng);
        // Direct term only: 0.5 / pi * 10 / 4^2.
        let direct = 0.5 * INV_PI * 10.0 / 16.0;
        assert!((l[0] - direct).abs() < 1e-4);

        let scene = Scene::new(
            &camera,
            &objects,
            &shaders,
            &lights,
            &IntegratorSettings::default(),
            &SceneParams::default(),
        )
        .unwrap();
        let integrator = create_path_integrator(&scene.integrator);
        let l = integrator.li(&ray, &scene, &mut rng);
        assert!(l[0] >= direct * 0.99);
    }
}
