use crate::core::buffers::*;
use crate::core::device::*;
use crate::core::prelude::*;
use crate::core::scene::*;
use crate::core::session::*;

use std::path::PathBuf;
use std::sync::Arc;

/// Everything the driver collects from the command line, validated into
/// session and scene parameters before any session exists.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub filepath: Option<PathBuf>,
    /// 0 uses the size the scene camera declares.
    pub width: u32,
    pub height: u32,
    pub device_name: String,
    pub shading_system: String,
    pub samples: i32,
    pub threads: usize,
    pub background: bool,
    pub quiet: bool,
    pub output_path: Option<PathBuf>,
    pub tile_size: u32,
    pub samples_per_pass: u32,
    /// `[x0, x1, y0, y1]` in fractions of the full frame.
    pub crop_window: Option<[Float; 4]>,
    /// Exposure in stops, 0 leaves the image untouched.
    pub exposure: Float,
    /// `linear` or `reinhard`.
    pub tone_mapping: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            filepath: None,
            width: 0,
            height: 0,
            device_name: String::from("cpu"),
            shading_system: String::from("svm"),
            samples: 0,
            threads: 0,
            background: false,
            quiet: false,
            output_path: None,
            tile_size: DEFAULT_TILE_SIZE,
            samples_per_pass: 1,
            crop_window: None,
            exposure: 0.0,
            tone_mapping: String::from("linear"),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    fn device_info(&self) -> Result<DeviceInfo, RenderError> {
        let device_type = type_from_string(&self.device_name);
        if device_type == DeviceType::None {
            return Err(RenderError::Config(format!(
                "Unknown device: {}",
                self.device_name
            )));
        }
        return find_device(device_type).ok_or_else(|| {
            RenderError::Config(format!("Unknown device: {}", self.device_name))
        });
    }

    pub fn session_params(&self) -> Result<SessionParams, RenderError> {
        let device = self.device_info()?;
        if self.samples < 0 {
            return Err(RenderError::Config(format!(
                "Invalid number of samples: {}",
                self.samples
            )));
        }
        if self.tile_size == 0 {
            return Err(RenderError::config("Tile size must be positive"));
        }
        return Ok(SessionParams {
            device,
            threads: self.threads,
            samples: self.samples as u32,
            background: self.background,
            progressive: !self.background,
            output_path: self.output_path.clone(),
            tile_size: self.tile_size,
            samples_per_pass: u32::max(self.samples_per_pass, 1),
            crop_window: self.crop_window,
        });
    }

    pub fn scene_params(&self) -> Result<SceneParams, RenderError> {
        let shading_system = ShadingSystem::from_name(&self.shading_system)?;
        if shading_system == ShadingSystem::Osl
            && type_from_string(&self.device_name) != DeviceType::Cpu
        {
            return Err(RenderError::config(
                "OSL shading system only works with CPU device",
            ));
        }
        return Ok(SceneParams { shading_system });
    }

    /// Checks everything in the order the driver reports problems: device,
    /// shading system, sample count, scene path.
    pub fn validate(&self) -> Result<(SessionParams, SceneParams), RenderError> {
        self.device_info()?;
        let scene_params = self.scene_params()?;
        let session_params = self.session_params()?;
        self.tone_mapper()?;
        if self.filepath.is_none() {
            return Err(RenderError::config("No file path specified"));
        }
        return Ok((session_params, scene_params));
    }

    /// Buffer for the requested size, or the camera's when no size is given.
    pub fn buffer_params(&self, camera: &Camera) -> Result<BufferParams, RenderError> {
        let (width, height) = if self.width == 0 || self.height == 0 {
            (camera.width, camera.height)
        } else {
            (self.width, self.height)
        };
        match self.crop_window.as_ref() {
            Some(crop_window) => BufferParams::from_crop_window(width, height, crop_window),
            None => Ok(BufferParams::new(width, height)),
        }
    }

    /// Tone mapper applied on resolve. Linear mapping without exposure
    /// needs none.
    pub fn tone_mapper(&self) -> Result<Option<Arc<dyn ToneMapper>>, RenderError> {
        match self.tone_mapping.trim().to_ascii_lowercase().as_str() {
            "linear" => {
                if self.exposure == 0.0 {
                    return Ok(None);
                }
                let t = ExposureToneMapper::from_stops(self.exposure);
                return Ok(Some(Arc::new(t)));
            }
            "reinhard" => {
                let scale = Float::powf(2.0, self.exposure);
                return Ok(Some(Arc::new(ReinhardToneMapper::new(scale))));
            }
            _ => {
                return Err(RenderError::Config(format!(
                    "Unknown tone mapping: {}",
                    self.tone_mapping
                )));
            }
        }
    }
}
