//! Raster collaborator: decoded bitmaps, their display orientation, export
//! and asynchronous decoding.
//!
//! # Architecture
//!
//! Pixel storage is always upright RGB8. Rotation and flips are display
//! metadata until a transformation or an export calls [`Raster::render`].
//! All operations except decoding are synchronous.

mod decode;
mod encode;
mod render;
mod types;

pub use decode::{decode_raster, ImageDecoder, RasterDecoder};
pub use encode::{encode_jpeg, encode_png, ExportFormat};
pub use render::BACKGROUND;
pub use types::{Raster, RasterError};
