use crate::core::prelude::*;

/// Shape of one render target: a `width` x `height` window placed at
/// (`full_x`, `full_y`) inside a `full_width` x `full_height` virtual frame.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct BufferParams {
    pub width: u32,
    pub height: u32,
    pub full_x: u32,
    pub full_y: u32,
    pub full_width: u32,
    pub full_height: u32,
}

impl BufferParams {
    pub fn new(width: u32, height: u32) -> Self {
        BufferParams {
            width,
            height,
            full_x: 0,
            full_y: 0,
            full_width: width,
            full_height: height,
        }
    }

    /// Crop window given as `[x0, x1, y0, y1]` fractions of the full frame.
    pub fn from_crop_window(
        full_width: u32,
        full_height: u32,
        crop_window: &[Float; 4],
    ) -> Result<Self, RenderError> {
        let [cx0, cx1, cy0, cy1] = *crop_window;
        if !(0.0..=1.0).contains(&cx0)
            || !(0.0..=1.0).contains(&cx1)
            || !(0.0..=1.0).contains(&cy0)
            || !(0.0..=1.0).contains(&cy1)
            || cx0 >= cx1
            || cy0 >= cy1
        {
            let msg = format!("Invalid crop window {:?}", crop_window);
            return Err(RenderError::Config(msg));
        }
        let x0 = Float::floor(full_width as Float * cx0) as u32;
        let y0 = Float::floor(full_height as Float * cy0) as u32;
        let x1 = u32::min(Float::ceil(full_width as Float * cx1) as u32, full_width);
        let y1 = u32::min(Float::ceil(full_height as Float * cy1) as u32, full_height);
        Ok(BufferParams {
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
            full_x: x0,
            full_y: y0,
            full_width,
            full_height,
        })
    }

    pub fn num_pixels(&self) -> usize {
        return self.width as usize * self.height as usize;
    }

    pub fn is_empty(&self) -> bool {
        return self.width == 0 || self.height == 0;
    }

    /// Pixel bounds in buffer-local coordinates.
    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::from(((0, 0), (self.width as i32, self.height as i32)))
    }
}
