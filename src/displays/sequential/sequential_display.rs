use crate::core::buffers::*;
use crate::core::display::*;
use crate::core::error::*;
use crate::core::imageio::*;

use log::*;
use std::path::{Path, PathBuf};

/// Writes every drawn frame to `<output_dir>/<frame:08>.<extension>`.
pub struct SequentialDisplay {
    count: u64,
    resolution: [usize; 2],
    buffer: Vec<f32>,
    output_dir: PathBuf,
    extension: String,
    channel_names: Vec<String>,
}

impl SequentialDisplay {
    pub fn new(output_dir: &Path, extension: &str) -> Self {
        let channel_names: Vec<String> = ["R", "G", "B"].iter().map(|s| s.to_string()).collect();
        SequentialDisplay {
            count: 0,
            resolution: [0, 0],
            buffer: Vec::new(),
            output_dir: output_dir.to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
            channel_names,
        }
    }

    pub fn frame_path(&self, frame: u64) -> PathBuf {
        let filename = format!("{:08}.{}", frame, self.extension);
        return self.output_dir.join(filename);
    }

    fn update_buffer(&mut self, tile: &DisplayTile) -> Result<(), RenderError> {
        let x0 = tile.x;
        let x1 = tile.x + tile.width;
        let y0 = tile.y;
        let y1 = tile.y + tile.height;
        if x1 > self.resolution[0] || y1 > self.resolution[1] {
            let msg = format!(
                "display tile {}x{} at {},{} exceeds the {}x{} frame",
                tile.width, tile.height, tile.x, tile.y, self.resolution[0], self.resolution[1]
            );
            return Err(RenderError::State(msg));
        }
        let channels = self.channel_names.len();
        for y in y0..y1 {
            for x in x0..x1 {
                let i_offset = ((y - y0) * tile.width + (x - x0)) * channels;
                let o_offset = (y * self.resolution[0] + x) * channels;
                self.buffer[o_offset..o_offset + channels]
                    .copy_from_slice(&tile.buffer[i_offset..i_offset + channels]);
            }
        }
        Ok(())
    }
}

impl Display for SequentialDisplay {
    fn start(
        &mut self,
        _title: &str,
        resolution: &[usize; 2],
        channel_names: &[&str],
    ) -> Result<(), RenderError> {
        if channel_names.len() != 3 {
            let msg = format!("expected RGB channels, got {:?}", channel_names);
            return Err(RenderError::Config(msg));
        }
        std::fs::create_dir_all(&self.output_dir)?;
        let n_pixels = resolution[0] * resolution[1];
        self.buffer = vec![0.0; channel_names.len() * n_pixels];
        self.resolution = *resolution;
        self.count = 0;
        self.channel_names = channel_names.iter().map(|s| s.to_string()).collect();
        Ok(())
    }

    fn update(&mut self, tile: &DisplayTile) -> Result<(), RenderError> {
        self.update_buffer(tile)?;
        let params = BufferParams::new(self.resolution[0] as u32, self.resolution[1] as u32);
        let image = Image {
            params,
            rgb: self.buffer.clone(),
        };
        let filepath = self.frame_path(self.count);
        write_image(&filepath, &image)?;
        self.count += 1;
        Ok(())
    }

    fn end(&mut self) -> Result<(), RenderError> {
        info!("Wrote {} frame(s) to {:?}", self.count, self.output_dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = SequentialDisplay::new(dir.path(), "png");
        display.start("test", &[4, 4], &["R", "G", "B"]).unwrap();
        let tile = DisplayTile {
            x: 2,
            y: 2,
            width: 2,
            height: 2,
            buffer: vec![1.0; 12],
        };
        display.update(&tile).unwrap();
        display.update(&tile).unwrap();
        display.end().unwrap();
        assert!(display.frame_path(0).exists());
        assert!(display.frame_path(1).exists());

        let big = DisplayTile {
            x: 3,
            y: 0,
            width: 2,
            height: 1,
            buffer: vec![0.0; 6],
        };
        assert!(display.update(&big).is_err());
    }
}
