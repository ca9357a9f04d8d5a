use crate::core::buffers::Image;
use crate::core::error::*;

/// A rectangle of resolved RGB pixels handed to a display.
pub struct DisplayTile {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub buffer: Vec<f32>,
}

impl DisplayTile {
    /// Wraps a whole resolved image, placed at its offset inside the full frame.
    pub fn from_image(image: &Image) -> Self {
        let params = image.params;
        DisplayTile {
            x: params.full_x as usize,
            y: params.full_y as usize,
            width: params.width as usize,
            height: params.height as usize,
            buffer: image.rgb.clone(),
        }
    }
}

pub trait Display: Send + Sync {
    fn start(
        &mut self,
        title: &str,
        resolution: &[usize; 2],
        channel_names: &[&str],
    ) -> Result<(), RenderError>;
    fn update(&mut self, tile: &DisplayTile) -> Result<(), RenderError>;
    fn end(&mut self) -> Result<(), RenderError>;
}
