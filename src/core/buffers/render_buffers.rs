use super::buffer_params::BufferParams;
use super::image::Image;
use super::tile::TileResult;
use super::tone_mapper::ToneMapper;
use crate::core::prelude::*;

use log::*;

#[derive(Debug, Default, Copy, Clone)]
struct Pixel {
    pub radiance_sum: Spectrum,
    pub weight_sum: Float,
}

/// Accumulation storage for one render target.
///
/// Each pixel keeps the sum of its radiance samples and the number of
/// samples merged so far, so partial results from any pass or device add up
/// in any order and `resolve` divides once.
pub struct RenderBuffers {
    params: BufferParams,
    pixels: Vec<Pixel>,
}

impl RenderBuffers {
    pub fn new() -> Self {
        RenderBuffers {
            params: BufferParams::default(),
            pixels: Vec::new(),
        }
    }

    pub fn params(&self) -> &BufferParams {
        return &self.params;
    }

    /// Reallocates storage for `params`, discarding every accumulated sample.
    pub fn allocate(&mut self, params: &BufferParams) -> Result<(), RenderError> {
        let n_pixels = (params.width as usize)
            .checked_mul(params.height as usize)
            .ok_or_else(|| {
                RenderError::Resource(format!(
                    "buffer of {}x{} pixels is too large",
                    params.width, params.height
                ))
            })?;

        let mut pixels: Vec<Pixel> = Vec::new();
        pixels.try_reserve_exact(n_pixels).map_err(|e| {
            RenderError::Resource(format!(
                "failed to allocate {}x{} render buffer: {}",
                params.width, params.height, e
            ))
        })?;
        pixels.resize(n_pixels, Pixel::default());

        debug!(
            "Allocated render buffer {}x{} (full frame {}x{} at {},{})",
            params.width,
            params.height,
            params.full_width,
            params.full_height,
            params.full_x,
            params.full_y
        );
        self.params = *params;
        self.pixels = pixels;
        return Ok(());
    }

    /// Merges one tile result. The whole tile is rejected if it does not fit.
    pub fn accumulate(&mut self, result: &TileResult) -> Result<(), RenderError> {
        let tile = &result.tile;
        if tile.buffer != self.params {
            return Err(RenderError::state(
                "tile was rendered for a different buffer shape",
            ));
        }
        let bounds = tile.bounds;
        if !self.params.bounds().contains(&bounds) || result.radiance.len() != tile.num_pixels()
        {
            let msg = format!("tile bounds {:?} do not fit the render buffer", bounds);
            return Err(RenderError::State(msg));
        }

        let weight = result.weight();
        let width = self.params.width as usize;
        let tile_width = bounds.width() as usize;
        for y in bounds.min.y..bounds.max.y {
            let src_row = (y - bounds.min.y) as usize * tile_width;
            let dst_row = y as usize * width;
            for x in bounds.min.x..bounds.max.x {
                let src_index = src_row + (x - bounds.min.x) as usize;
                let dst_index = dst_row + x as usize;
                let pixel = &mut self.pixels[dst_index];
                pixel.radiance_sum += result.radiance[src_index];
                pixel.weight_sum += weight;
            }
        }
        return Ok(());
    }

    /// Number of samples merged into a pixel (buffer-local coordinates).
    pub fn get_sample_weight(&self, x: u32, y: u32) -> Float {
        let index = y as usize * self.params.width as usize + x as usize;
        return self.pixels.get(index).map_or(0.0, |p| p.weight_sum);
    }

    /// Averages accumulated radiance into an image. Pixels without samples
    /// resolve to black. Does not modify the accumulated state.
    pub fn resolve(&self, tone_mapper: Option<&dyn ToneMapper>) -> Image {
        let mut image = Image::new(&self.params);
        for (offset, pixel) in self.pixels.iter().enumerate() {
            let mut c = [0.0; 3];
            if pixel.weight_sum > 0.0 {
                let inv_wt = 1.0 / pixel.weight_sum;
                let rgb = pixel.radiance_sum.to_rgb();
                c[0] = Float::max(0.0, rgb[0] * inv_wt);
                c[1] = Float::max(0.0, rgb[1] * inv_wt);
                c[2] = Float::max(0.0, rgb[2] * inv_wt);
            }
            if let Some(tone_mapper) = tone_mapper {
                c = tone_mapper.map(&c);
            }
            image.rgb[3 * offset..3 * offset + 3].copy_from_slice(&c);
        }
        return image;
    }
}

impl Default for RenderBuffers {
    fn default() -> Self {
        Self::new()
    }
}
