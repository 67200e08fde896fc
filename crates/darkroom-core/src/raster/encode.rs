//! Synchronous raster export.
//!
//! Export always encodes the rendered raster, so pending rotation and flips
//! are baked into the output.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{Raster, RasterError};

/// Output format for [`Raster::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Lossless; replaying an exported raster reproduces it exactly.
    #[default]
    Png,
    /// Lossy with quality 1-100.
    Jpeg { quality: u8 },
}

impl Raster {
    /// Encode the raster as displayed.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, RasterError> {
        let rendered = self.render()?;
        match format {
            ExportFormat::Png => encode_png(&rendered),
            ExportFormat::Jpeg { quality } => encode_jpeg(&rendered, quality),
        }
    }
}

/// Encode the stored pixels as PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, RasterError> {
    validate(raster)?;
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&raster.pixels, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| RasterError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Encode the stored pixels as JPEG.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, RasterError> {
    validate(raster)?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&raster.pixels, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| RasterError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

fn validate(raster: &Raster) -> Result<(), RasterError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(RasterError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }
    let expected = raster.width as usize * raster.height as usize * 3;
    if raster.pixels.len() != expected {
        return Err(RasterError::BufferMismatch {
            expected,
            actual: raster.pixels.len(),
        });
    }
    Ok(())
}
