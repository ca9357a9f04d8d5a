use crate::core::prelude::*;

/// Maps normalized radiance to display values during `resolve`.
pub trait ToneMapper: Send + Sync {
    fn map(&self, rgb: &[Float; 3]) -> [Float; 3];
}

/// Linear exposure scale.
#[derive(Debug, Clone, Copy)]
pub struct ExposureToneMapper {
    pub scale: Float,
}

impl ExposureToneMapper {
    pub fn new(scale: Float) -> Self {
        ExposureToneMapper { scale }
    }

    /// Scale from photographic stops: `2^stops`.
    pub fn from_stops(stops: Float) -> Self {
        ExposureToneMapper {
            scale: Float::powf(2.0, stops),
        }
    }
}

impl ToneMapper for ExposureToneMapper {
    fn map(&self, rgb: &[Float; 3]) -> [Float; 3] {
        [rgb[0] * self.scale, rgb[1] * self.scale, rgb[2] * self.scale]
    }
}

/// Reinhard operator on luminance, `L / (1 + L)`, with an exposure scale.
#[derive(Debug, Clone, Copy)]
pub struct ReinhardToneMapper {
    pub scale: Float,
}

impl ReinhardToneMapper {
    pub fn new(scale: Float) -> Self {
        ReinhardToneMapper { scale }
    }
}

impl ToneMapper for ReinhardToneMapper {
    fn map(&self, rgb: &[Float; 3]) -> [Float; 3] {
        let c = Spectrum::from(*rgb) * self.scale;
        let l = c.y();
        if l <= 0.0 {
            return [0.0; 3];
        }
        let s = 1.0 / (1.0 + l);
        return (c * s).to_rgb();
    }
}
