use crate::core::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Constant radiance for rays that leave the scene.
    Background { color: Spectrum },
    Point {
        position: Point3f,
        intensity: Spectrum,
    },
}

impl Light {
    pub fn is_infinite(&self) -> bool {
        return matches!(self, Light::Background { .. });
    }
}

/// A compiled surface program: diffuse albedo plus emitted radiance.
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    pub name: String,
    pub albedo: Spectrum,
    pub emission: Spectrum,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    pub max_bounces: u32,
    /// Per-sample radiance clamp, 0 disables it.
    pub sample_clamp: Float,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        IntegratorSettings {
            max_bounces: 4,
            sample_clamp: 0.0,
        }
    }
}
