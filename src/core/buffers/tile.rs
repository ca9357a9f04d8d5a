use super::buffer_params::BufferParams;
use crate::core::prelude::*;

/// One unit of work: a tile rectangle (buffer-local pixel coordinates) and
/// the sample range `[sample, sample + num_samples)` to render into it.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct RenderTile {
    pub index: usize,
    pub bounds: Bounds2i,
    pub sample: u32,
    pub num_samples: u32,
    pub buffer: BufferParams,
}

impl RenderTile {
    pub fn num_pixels(&self) -> usize {
        return self.bounds.area().max(0) as usize;
    }

    /// Full-frame coordinates of a buffer-local pixel.
    pub fn full_pixel(&self, p: &Point2i) -> Point2i {
        Point2i::new(
            p.x + self.buffer.full_x as i32,
            p.y + self.buffer.full_y as i32,
        )
    }
}

/// Radiance sums computed by a device for one `RenderTile`.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: RenderTile,
    pub radiance: Vec<Spectrum>,
}

impl TileResult {
    pub fn new(tile: &RenderTile) -> Self {
        TileResult {
            tile: *tile,
            radiance: vec![Spectrum::zero(); tile.num_pixels()],
        }
    }

    pub fn get_pixel_index(&self, p: &Point2i) -> usize {
        let bounds = &self.tile.bounds;
        let width = bounds.max.x - bounds.min.x;
        let x = p.x - bounds.min.x;
        let y = p.y - bounds.min.y;
        return (y * width + x) as usize;
    }

    pub fn add_sample(&mut self, p: &Point2i, l: &Spectrum) {
        if !self.tile.bounds.inside_exclusive(p) {
            return;
        }
        let index = self.get_pixel_index(p);
        self.radiance[index] += *l;
    }

    /// Sample weight every pixel of this result carries.
    pub fn weight(&self) -> Float {
        return self.tile.num_samples as Float;
    }
}
