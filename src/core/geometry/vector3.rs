use crate::core::base::*;
use serde::{Deserialize, Serialize};
use std::ops;

#[derive(Debug, PartialEq, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(from = "[Float; 3]", into = "[Float; 3]")]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    #[inline]
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }

    #[inline]
    pub fn zero() -> Self {
        Vector3f::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn dot(&self, rhs: &Self) -> Float {
        return self.x * rhs.x + self.y * rhs.y + self.z * rhs.z;
    }

    #[inline]
    pub fn length_squared(&self) -> Float {
        return self.dot(self);
    }

    #[inline]
    pub fn length(&self) -> Float {
        return Float::sqrt(self.length_squared());
    }

    #[inline]
    pub fn normalize(&self) -> Self {
        let l = self.length();
        if l == 0.0 {
            return *self;
        }
        return *self * (1.0 / l);
    }

    #[inline]
    pub fn cross(v1: &Self, v2: &Self) -> Self {
        Vector3f {
            x: (v1.y * v2.z) - (v1.z * v2.y),
            y: (v1.z * v2.x) - (v1.x * v2.z),
            z: (v1.x * v2.y) - (v1.y * v2.x),
        }
    }

    /// Builds an orthonormal basis `(v1, v2, v3)` whose first axis is `d1`.
    pub fn coordinate_system(d1: &Self) -> (Self, Self, Self) {
        let v1 = d1.normalize();
        let v2 = if Float::abs(v1.x) > Float::abs(v1.y) {
            Self::new(-v1.z, 0.0, v1.x).normalize()
        } else {
            Self::new(0.0, v1.z, -v1.y).normalize()
        };
        let v3 = Self::cross(&v1, &v2).normalize();
        return (v1, v2, v3);
    }
}

impl ops::Add<Vector3f> for Vector3f {
    type Output = Vector3f;
    fn add(self, rhs: Vector3f) -> Self::Output {
        Vector3f::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl ops::Sub<Vector3f> for Vector3f {
    type Output = Vector3f;
    fn sub(self, rhs: Vector3f) -> Self::Output {
        Vector3f::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl ops::Mul<Float> for Vector3f {
    type Output = Vector3f;
    fn mul(self, rhs: Float) -> Self::Output {
        Vector3f::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl ops::Mul<Vector3f> for Float {
    type Output = Vector3f;
    fn mul(self, rhs: Vector3f) -> Self::Output {
        rhs * self
    }
}

impl ops::Neg for Vector3f {
    type Output = Vector3f;
    fn neg(self) -> Self::Output {
        Vector3f::new(-self.x, -self.y, -self.z)
    }
}

impl From<[Float; 3]> for Vector3f {
    fn from(value: [Float; 3]) -> Self {
        Vector3f::new(value[0], value[1], value[2])
    }
}

impl From<Vector3f> for [Float; 3] {
    fn from(value: Vector3f) -> Self {
        [value.x, value.y, value.z]
    }
}
