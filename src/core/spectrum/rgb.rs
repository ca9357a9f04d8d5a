use crate::core::base::*;
use serde::{Deserialize, Serialize};
use std::ops;

const YWEIGHT: [f32; 3] = [0.212671, 0.715160, 0.072169];

#[derive(Debug, PartialEq, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(from = "[Float; 3]", into = "[Float; 3]")]
pub struct RGBSpectrum {
    c: [Float; 3],
}

pub type Spectrum = RGBSpectrum;

impl RGBSpectrum {
    #[inline]
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        RGBSpectrum { c: [r, g, b] }
    }

    #[inline]
    pub fn zero() -> Self {
        RGBSpectrum { c: [0.0, 0.0, 0.0] }
    }

    #[inline]
    pub fn one() -> Self {
        RGBSpectrum { c: [1.0, 1.0, 1.0] }
    }

    pub fn y(&self) -> Float {
        let c = &self.c;
        return YWEIGHT[0] * c[0] + YWEIGHT[1] * c[1] + YWEIGHT[2] * c[2];
    }

    pub fn to_rgb(&self) -> [Float; 3] {
        return self.c;
    }

    pub fn max_component_value(&self) -> Float {
        let c = &self.c;
        return Float::max(c[0], Float::max(c[1], c[2]));
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        return self.c.iter().all(|x| x.abs() <= 0.0);
    }

    pub fn is_valid(&self) -> bool {
        return self.c.iter().all(|x| x.is_finite());
    }
}

impl ops::Index<usize> for RGBSpectrum {
    type Output = Float;
    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        return &self.c[i];
    }
}

impl ops::Add for RGBSpectrum {
    type Output = RGBSpectrum;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let (a, b) = (&self.c, &rhs.c);
        RGBSpectrum::new(a[0] + b[0], a[1] + b[1], a[2] + b[2])
    }
}

impl ops::AddAssign for RGBSpectrum {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..3 {
            self.c[i] += rhs.c[i];
        }
    }
}

impl ops::Mul for RGBSpectrum {
    type Output = RGBSpectrum;
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b) = (&self.c, &rhs.c);
        RGBSpectrum::new(a[0] * b[0], a[1] * b[1], a[2] * b[2])
    }
}

impl ops::MulAssign for RGBSpectrum {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        for i in 0..3 {
            self.c[i] *= rhs.c[i];
        }
    }
}

impl ops::Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    #[inline]
    fn mul(self, rhs: Float) -> Self::Output {
        let a = &self.c;
        RGBSpectrum::new(a[0] * rhs, a[1] * rhs, a[2] * rhs)
    }
}

impl From<[Float; 3]> for RGBSpectrum {
    fn from(value: [Float; 3]) -> Self {
        RGBSpectrum { c: value }
    }
}

impl From<RGBSpectrum> for [Float; 3] {
    fn from(value: RGBSpectrum) -> Self {
        value.c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let a = Spectrum::new(1.0, 2.0, 3.0);
        let b = Spectrum::from([0.5, 0.5, 0.5]);
        assert_eq!(a * b, Spectrum::new(0.5, 1.0, 1.5));
        assert_eq!(a + b, Spectrum::new(1.5, 2.5, 3.5));
        assert_eq!(a * 2.0, Spectrum::new(2.0, 4.0, 6.0));
        assert!(Spectrum::zero().is_black());
        assert!(!Spectrum::new(Float::NAN, 0.0, 0.0).is_valid());
    }
}
