use crate::core::buffers::Image;
use crate::core::error::*;
use crate::core::misc::gamma_correct;
use crate::core::prelude::*;

use image::*;
use std::path::Path;

fn to_byte(v: Float) -> u8 {
    Float::clamp(255.0 * gamma_correct(v), 0.0, 255.0) as u8
}

fn image_buffer_error(path: &Path) -> RenderError {
    let msg = format!("write_image: pixel data does not match image size for {:?}", path);
    return RenderError::Config(msg);
}

fn write_image_float(path: &Path, image: &Image) -> Result<(), RenderError> {
    let float_img: Vec<f32> = image.rgb.iter().map(|v| *v as f32).collect();
    let img = Rgb32FImage::from_vec(image.width(), image.height(), float_img)
        .ok_or_else(|| image_buffer_error(path))?;
    img.save(path)?;
    return Ok(());
}

fn write_image_bytes(path: &Path, image: &Image) -> Result<(), RenderError> {
    let byte_img: Vec<u8> = image.rgb.iter().map(|v| to_byte(*v)).collect();
    let img = RgbImage::from_vec(image.width(), image.height(), byte_img)
        .ok_or_else(|| image_buffer_error(path))?;
    img.save(path)?;
    return Ok(());
}

/// Writes a resolved image. `.exr` keeps linear float values; every other
/// format the `image` crate knows is written as 8-bit sRGB.
pub fn write_image(path: &Path, image: &Image) -> Result<(), RenderError> {
    if image.params.is_empty() {
        let msg = format!("write_image: nothing to write to {:?}", path);
        return Err(RenderError::State(msg));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("exr") => {
            return write_image_float(path, image);
        }
        Some(_) => {
            return write_image_bytes(path, image);
        }
        None => {
            let msg = format!("write_image: missing file extension in {:?}", path);
            return Err(RenderError::Config(msg));
        }
    }
}
