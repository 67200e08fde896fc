//! Rotation transformation.

use serde::{Deserialize, Serialize};

use super::{Applied, TransformError};
use crate::raster::Raster;

/// Turn the displayed raster by `angle` degrees, clockwise.
///
/// Only the display rotation changes; pixels are baked in by the next
/// transformation that needs them (or by the working copy refresh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotate {
    pub angle: f64,
}

impl Rotate {
    pub fn new(angle: f64) -> Result<Self, TransformError> {
        if !angle.is_finite() {
            return Err(TransformError::InvalidAngle(angle));
        }
        Ok(Self { angle })
    }

    pub fn apply(&self, raster: &Raster) -> Result<Applied, TransformError> {
        if !self.angle.is_finite() {
            return Err(TransformError::InvalidAngle(self.angle));
        }
        let mut out = raster.clone();
        out.rotation = (raster.rotation + self.angle).rem_euclid(360.0);
        Ok(Applied::Replaced(out))
    }
}
