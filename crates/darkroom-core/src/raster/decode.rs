//! Asynchronous raster decoding.
//!
//! Decoding is the only suspension point in the editing core: a host may back
//! [`RasterDecoder`] with a browser image decoder that completes later. The
//! default [`ImageDecoder`] decodes PNG and JPEG with the `image` crate and
//! resolves immediately.

use std::io::Cursor;

use futures::future::{self, FutureExt, LocalBoxFuture};
use image::ImageReader;

use super::{Raster, RasterError};

/// Asynchronous decode constructor for rasters.
///
/// The returned future must resolve exactly once, either with the raster or
/// with the reason it could not be materialized.
pub trait RasterDecoder {
    fn decode(&self, encoded: &[u8]) -> LocalBoxFuture<'static, Result<Raster, RasterError>>;
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl RasterDecoder for ImageDecoder {
    fn decode(&self, encoded: &[u8]) -> LocalBoxFuture<'static, Result<Raster, RasterError>> {
        future::ready(decode_raster(encoded)).boxed_local()
    }
}

/// Decode PNG or JPEG bytes into an upright RGB raster.
///
/// # Errors
///
/// Returns `RasterError::Decode` if the format is not recognized or the data
/// is corrupted.
pub fn decode_raster(bytes: &[u8]) -> Result<Raster, RasterError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RasterError::Decode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| RasterError::Decode(e.to_string()))?;

    let raster = Raster::from_rgb_image(img.into_rgb8());
    log::debug!("decoded {}x{} raster", raster.width, raster.height);
    Ok(raster)
}
