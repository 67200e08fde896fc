//! Raster transformations: crop, rotate and flip.
//!
//! A transformation is immutable configuration plus a pure `apply` from
//! `(raster, configuration)` to a new raster. The [`Pipeline`] applies them
//! one at a time and can replay the whole list from the original input.
//!
//! # Completion
//!
//! [`Transformation::apply`] always resolves, with either a replacement
//! raster or [`Applied::Unchanged`]. A crop region that rounds below one
//! pixel resolves as `Unchanged` rather than never completing.
//!
//! [`Pipeline`]: crate::pipeline::Pipeline

mod crop;
mod flip;
mod rotate;

pub use crop::Crop;
pub use flip::Flip;
pub use rotate::Rotate;

use futures::future::{self, FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::{Raster, RasterError};

/// Error types for transformations.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input raster could not be rendered.
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    /// A crop fraction is NaN or infinite.
    #[error("Invalid crop {field}: {value}")]
    InvalidCrop { field: &'static str, value: f64 },

    /// Fractions cannot be taken of an empty viewport.
    #[error("Cannot crop an empty viewport ({width}x{height})")]
    EmptyViewport { width: f64, height: f64 },

    /// A rotation angle is NaN or infinite.
    #[error("Invalid rotation angle: {0}")]
    InvalidAngle(f64),
}

/// Outcome of a completed transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The transformation produced a new source raster.
    Replaced(Raster),
    /// The transformation completed without producing a raster.
    Unchanged,
}

/// Every transformation the editor knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transformation {
    Crop(Crop),
    Rotate(Rotate),
    Flip(Flip),
}

impl Transformation {
    pub fn name(&self) -> &'static str {
        match self {
            Transformation::Crop(_) => "crop",
            Transformation::Rotate(_) => "rotate",
            Transformation::Flip(_) => "flip",
        }
    }

    /// Apply to `raster`. The future owns everything it needs, so the caller
    /// may keep using `raster` while it is pending.
    pub fn apply(&self, raster: &Raster) -> LocalBoxFuture<'static, Result<Applied, TransformError>> {
        let result = match self {
            Transformation::Crop(crop) => crop.apply(raster),
            Transformation::Rotate(rotate) => rotate.apply(raster),
            Transformation::Flip(flip) => flip.apply(raster),
        };
        match &result {
            Ok(Applied::Replaced(out)) => {
                log::debug!("{} -> {}x{} raster", self.name(), out.width, out.height)
            }
            Ok(Applied::Unchanged) => log::debug!("{} left the raster unchanged", self.name()),
            Err(e) => log::warn!("{} failed: {e}", self.name()),
        }
        future::ready(result).boxed_local()
    }
}

impl From<Crop> for Transformation {
    fn from(crop: Crop) -> Self {
        Transformation::Crop(crop)
    }
}

impl From<Rotate> for Transformation {
    fn from(rotate: Rotate) -> Self {
        Transformation::Rotate(rotate)
    }
}

impl From<Flip> for Transformation {
    fn from(flip: Flip) -> Self {
        Transformation::Flip(flip)
    }
}
