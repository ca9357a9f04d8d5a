use super::buffer_params::BufferParams;
use crate::core::prelude::*;

/// A resolved, display-ready RGB image of one buffer window.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub params: BufferParams,
    /// Interleaved RGB, row-major, `3 * width * height` values.
    pub rgb: Vec<Float>,
}

impl Image {
    pub fn new(params: &BufferParams) -> Self {
        Image {
            params: *params,
            rgb: vec![0.0; 3 * params.num_pixels()],
        }
    }

    pub fn width(&self) -> u32 {
        return self.params.width;
    }

    pub fn height(&self) -> u32 {
        return self.params.height;
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [Float; 3] {
        let offset = 3 * (y as usize * self.params.width as usize + x as usize);
        return [self.rgb[offset], self.rgb[offset + 1], self.rgb[offset + 2]];
    }
}
