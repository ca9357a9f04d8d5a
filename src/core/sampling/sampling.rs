use crate::core::prelude::*;

pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to $[-1,1]^2$
    let u_offset = *u * 2.0 - Vector2f::new(1.0, 1.0);

    // Handle degeneracy at the origin
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    if Float::abs(u_offset.x) > Float::abs(u_offset.y) {
        let r = u_offset.x;
        let theta = PI_OVER_4 * (u_offset.y / u_offset.x);
        return Point2f::new(r * Float::cos(theta), r * Float::sin(theta));
    } else {
        let r = u_offset.y;
        let theta = PI_OVER_2 - PI_OVER_4 * (u_offset.x / u_offset.y);
        return Point2f::new(r * Float::cos(theta), r * Float::sin(theta));
    }
}

/// Local-frame direction around +z, distributed with pdf `cos_theta / pi`.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = Float::sqrt(Float::max(0.0, 1.0 - d.x * d.x - d.y * d.y));
    return Vector3f::new(d.x, d.y, z);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::RNG;

    #[test]
    fn test_001() {
        let mut rng = RNG::new_sequence(7);
        for _ in 0..256 {
            let d = cosine_sample_hemisphere(&rng.uniform_2d());
            assert!(d.z >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_002() {
        let p = concentric_sample_disk(&Point2f::new(0.5, 0.5));
        assert_eq!(p, Point2f::zero());
    }
}
