use crate::core::device::*;
use crate::core::prelude::*;

use std::path::PathBuf;

pub const DEFAULT_TILE_SIZE: u32 = 64;

/// Session configuration, fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParams {
    pub device: DeviceInfo,
    /// Worker threads per CPU device, 0 uses every core.
    pub threads: usize,
    /// Target samples per pixel, 0 renders until cancelled.
    pub samples: u32,
    pub background: bool,
    pub progressive: bool,
    pub output_path: Option<PathBuf>,
    pub tile_size: u32,
    /// Samples each tile advances by per pass when progressive.
    pub samples_per_pass: u32,
    /// `[x0, x1, y0, y1]` fractions of the full frame kept across resizes.
    pub crop_window: Option<[Float; 4]>,
}

impl Default for SessionParams {
    fn default() -> Self {
        let device = find_device(DeviceType::Cpu).unwrap_or_else(|| DeviceInfo::cpu(1));
        SessionParams {
            device,
            threads: 0,
            samples: 0,
            background: false,
            progressive: false,
            output_path: None,
            tile_size: DEFAULT_TILE_SIZE,
            samples_per_pass: 1,
            crop_window: None,
        }
    }
}
