use crate::core::prelude::*;

/// Pinhole perspective camera.
///
/// `fov` is in degrees and spans the shorter axis of the frame being
/// rendered. `width` and `height` are only the declared default size: rays
/// are generated against the full frame of the buffer, so a larger buffer
/// sees the same view at a higher resolution and a cropped buffer sees the
/// same region it would see uncropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    pub position: Point3f,
    pub fov: Float,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov: Float,
}

impl Camera {
    pub fn new(
        width: u32,
        height: u32,
        position: &Point3f,
        look_at: &Point3f,
        up: &Vector3f,
        fov: Float,
    ) -> Self {
        let forward = (*look_at - *position).normalize();
        let right = Vector3f::cross(&forward, up).normalize();
        let up = Vector3f::cross(&right, &forward);

        let tan_half_fov = Float::tan(fov.to_radians() * 0.5);
        Camera {
            width,
            height,
            position: *position,
            fov,
            forward,
            right,
            up,
            tan_half_fov,
        }
    }

    /// Primary ray through raster position `p_film` of a
    /// `film_width` x `film_height` frame.
    pub fn generate_ray(&self, p_film: &Point2f, film_width: u32, film_height: u32) -> Ray {
        let w = u32::max(film_width, 1) as Float;
        let h = u32::max(film_height, 1) as Float;
        let aspect = w / h;
        let (scale_x, scale_y) = if aspect > 1.0 {
            (aspect * self.tan_half_fov, self.tan_half_fov)
        } else {
            (self.tan_half_fov, self.tan_half_fov / aspect)
        };
        let sx = (2.0 * p_film.x / w - 1.0) * scale_x;
        let sy = (1.0 - 2.0 * p_film.y / h) * scale_y;
        let d = (self.forward + self.right * sx + self.up * sy).normalize();
        return Ray::new(&self.position, &d, Float::INFINITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let camera = Camera::new(
            64,
            32,
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(0.0, 0.0, -1.0),
            &Vector3f::new(0.0, 1.0, 0.0),
            60.0,
        );
        let ray = camera.generate_ray(&Point2f::new(32.0, 16.0), 64, 32);
        assert!((ray.d.z + 1.0).abs() < 1e-5);

        let corner = camera.generate_ray(&Point2f::new(0.0, 0.0), 64, 32);
        assert!(corner.d.x < 0.0);
        assert!(corner.d.y > 0.0);
    }

    #[test]
    fn test_002() {
        let camera = Camera::new(
            16,
            8,
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(0.0, 0.0, -1.0),
            &Vector3f::new(0.0, 1.0, 0.0),
            45.0,
        );
        // the same relative film position gives the same ray at any size
        let pairs = [((4.0, 2.0), (8.0, 4.0)), ((16.0, 0.0), (32.0, 0.0))];
        for ((x0, y0), (x1, y1)) in pairs {
            let a = camera.generate_ray(&Point2f::new(x0, y0), 16, 8);
            let b = camera.generate_ray(&Point2f::new(x1, y1), 32, 16);
            assert!((a.d - b.d).length() < 1e-5);
        }
    }
}
