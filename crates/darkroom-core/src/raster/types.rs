//! Core raster types.

use thiserror::Error;

use crate::geometry::Viewport;

/// Error types for raster decode, export and buffer handling.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The encoded input could not be decoded into pixels.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Pixel buffer length does not match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Encoding for export failed.
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// A decoded bitmap plus the orientation it is displayed with.
///
/// Pixels are stored upright; `rotation` (degrees, clockwise) and the flip
/// flags describe how the raster is presented. [`Raster::render`] bakes them
/// into a new upright raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Stored width in pixels.
    pub width: u32,
    /// Stored height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
    /// Display rotation in degrees, clockwise, in `[0, 360)`.
    pub rotation: f64,
    /// Mirror around the vertical axis before rotating.
    pub flip_x: bool,
    /// Mirror around the horizontal axis before rotating.
    pub flip_y: bool,
}

impl Raster {
    /// Create an upright raster from dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }

    /// A raster of a single flat colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(width, height, pixels)
    }

    /// Create a Raster from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Convert the stored pixels to an image::RgbImage.
    pub fn to_rgb_image(&self) -> Result<image::RgbImage, RasterError> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            RasterError::BufferMismatch {
                expected: self.width as usize * self.height as usize * 3,
                actual: self.pixels.len(),
            },
        )
    }

    /// Rotation-aware bounding box of the raster as displayed.
    pub fn viewport(&self) -> Viewport {
        Viewport::of(self.width as f64, self.height as f64, self.rotation)
    }

    /// True when no rotation or flip is pending.
    pub fn is_upright(&self) -> bool {
        self.rotation == 0.0 && !self.flip_x && !self.flip_y
    }

    /// Get the RGB value at `(x, y)` of the stored pixels.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Check if this is an empty/invalid raster.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
