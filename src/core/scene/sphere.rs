use crate::core::misc::quadratic;
use crate::core::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
    /// Index into `Scene::shaders`.
    pub shader: usize,
}

impl Sphere {
    pub fn new(center: &Point3f, radius: Float, shader: usize) -> Self {
        Sphere {
            center: *center,
            radius,
            shader,
        }
    }

    /// Nearest hit distance in `(SHADOW_EPSILON, ray.t_max)`.
    pub fn intersect(&self, ray: &Ray) -> Option<Float> {
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * oc.dot(&ray.d);
        let c = oc.length_squared() - self.radius * self.radius;
        let (t0, t1) = quadratic(a, b, c)?;
        if t0 > SHADOW_EPSILON && t0 < ray.t_max {
            return Some(t0);
        }
        if t1 > SHADOW_EPSILON && t1 < ray.t_max {
            return Some(t1);
        }
        return None;
    }

    pub fn normal_at(&self, p: &Point3f) -> Normal3f {
        return (*p - self.center).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let sphere = Sphere::new(&Point3f::new(0.0, 0.0, -5.0), 1.0, 0);
        let ray = Ray::new(
            &Point3f::new(0.0, 0.0, 0.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
        );
        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-4);

        let inside = Ray::new(&sphere.center, &Vector3f::new(1.0, 0.0, 0.0), Float::INFINITY);
        let t = sphere.intersect(&inside).unwrap();
        assert!((t - 1.0).abs() < 1e-4);

        let miss = Ray::new(
            &Point3f::new(0.0, 5.0, 0.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
        );
        assert!(sphere.intersect(&miss).is_none());
    }
}
