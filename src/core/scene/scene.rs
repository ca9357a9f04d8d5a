use super::camera::Camera;
use super::light::*;
use super::scene_params::SceneParams;
use super::sphere::Sphere;
use crate::core::prelude::*;

pub struct SurfaceHit {
    pub t: Float,
    pub p: Point3f,
    pub n: Normal3f,
    pub shader: usize,
}

/// Immutable scene snapshot shared by every device of a session.
pub struct Scene {
    pub camera: Camera,
    pub objects: Vec<Sphere>,
    pub shaders: Vec<Shader>,
    pub lights: Vec<Light>,
    pub integrator: IntegratorSettings,
    pub params: SceneParams,
}

impl Scene {
    pub fn new(
        camera: &Camera,
        objects: &[Sphere],
        shaders: &[Shader],
        lights: &[Light],
        integrator: &IntegratorSettings,
        params: &SceneParams,
    ) -> Result<Self, RenderError> {
        if let Some(o) = objects.iter().find(|o| o.shader >= shaders.len()) {
            let msg = format!("object refers to missing shader index {}", o.shader);
            return Err(RenderError::Scene(msg));
        }
        return Ok(Scene {
            camera: camera.clone(),
            objects: objects.to_vec(),
            shaders: shaders.to_vec(),
            lights: lights.to_vec(),
            integrator: *integrator,
            params: *params,
        });
    }

    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mut r = *ray;
        let mut nearest: Option<(Float, &Sphere)> = None;
        for object in self.objects.iter() {
            if let Some(t) = object.intersect(&r) {
                r.t_max = t;
                nearest = Some((t, object));
            }
        }
        let (t, object) = nearest?;
        let p = ray.position(t);
        return Some(SurfaceHit {
            t,
            p,
            n: object.normal_at(&p),
            shader: object.shader,
        });
    }

    /// True if anything blocks `ray` before `ray.t_max`.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        return self.objects.iter().any(|o| o.intersect(ray).is_some());
    }

    pub fn shader(&self, index: usize) -> &Shader {
        return &self.shaders[index];
    }

    /// Radiance seen by rays that escape the scene.
    pub fn background(&self) -> Spectrum {
        let mut l = Spectrum::zero();
        for light in self.lights.iter() {
            if let Light::Background { color } = light {
                l += *color;
            }
        }
        return l;
    }
}
