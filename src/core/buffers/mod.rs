pub mod buffer_params;
pub mod image;
pub mod render_buffers;
pub mod tile;
pub mod tone_mapper;

pub use buffer_params::*;
pub use image::*;
pub use render_buffers::*;
pub use tile::*;
pub use tone_mapper::*;
