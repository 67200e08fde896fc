//! Crop transformation.
//!
//! The crop region is stored as fractions of the raster's viewport at the
//! time the selection was committed, so replaying it against a rebuilt
//! raster selects the same region.
//!
//! # Coordinate System
//!
//! - (0.0, 0.0) = top-left corner of the viewport
//! - (1.0, 1.0) = bottom-right corner
//! - Fractions refer to the raster as displayed (after rotation and flips)

use serde::{Deserialize, Serialize};

use super::{Applied, TransformError};
use crate::geometry::{Rect, Viewport};
use crate::raster::Raster;

/// Extract a region of the displayed raster into a new upright raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

fn fraction(field: &'static str, value: f64) -> Result<f64, TransformError> {
    if value.is_finite() {
        Ok(value.clamp(0.0, 1.0))
    } else {
        Err(TransformError::InvalidCrop { field, value })
    }
}

impl Crop {
    /// Create a crop from fractions; values are clamped into `[0, 1]`.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Result<Self, TransformError> {
        Ok(Self {
            left: fraction("left", left)?,
            top: fraction("top", top)?,
            width: fraction("width", width)?,
            height: fraction("height", height)?,
        })
    }

    /// Crop covering a committed selection, given in native pixels of a
    /// raster whose viewport is `viewport`.
    pub fn from_selection(selection: Rect, viewport: Viewport) -> Result<Self, TransformError> {
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Err(TransformError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Self::new(
            selection.left / viewport.width,
            selection.top / viewport.height,
            selection.width / viewport.width,
            selection.height / viewport.height,
        )
    }

    /// Pixel region `(left, top, width, height)` of `viewport`, clamped so it
    /// never extends past the viewport.
    pub fn pixel_region(&self, viewport: Viewport) -> (u32, u32, u32, u32) {
        let left = self.left * viewport.width;
        let top = self.top * viewport.height;
        let width = (self.width * viewport.width).min(viewport.width - left);
        let height = (self.height * viewport.height).min(viewport.height - top);

        (
            left.round().max(0.0) as u32,
            top.round().max(0.0) as u32,
            width.round().max(0.0) as u32,
            height.round().max(0.0) as u32,
        )
    }

    /// Apply the crop. A region smaller than one pixel on either side leaves
    /// the raster unchanged.
    pub fn apply(&self, raster: &Raster) -> Result<Applied, TransformError> {
        let (px_left, px_top, px_width, px_height) = self.pixel_region(raster.viewport());
        if px_width < 1 || px_height < 1 {
            log::warn!("crop region {px_width}x{px_height} is below one pixel, skipped");
            return Ok(Applied::Unchanged);
        }

        let image = raster.render()?;

        // The rendered size is the rounded viewport; stay inside it
        let px_left = px_left.min(image.width - 1);
        let px_top = px_top.min(image.height - 1);
        let out_width = px_width.min(image.width - px_left);
        let out_height = px_height.min(image.height - px_top);

        let mut output = vec![0u8; out_width as usize * out_height as usize * 3];

        // Copy pixel data row by row
        let row_len = out_width as usize * 3;
        for y in 0..out_height as usize {
            let src_start = ((px_top as usize + y) * image.width as usize + px_left as usize) * 3;
            let dst_start = y * row_len;
            output[dst_start..dst_start + row_len].copy_from_slice(&image.pixels[src_start..src_start + row_len]);
        }

        Ok(Applied::Replaced(Raster::new(out_width, out_height, output)))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
