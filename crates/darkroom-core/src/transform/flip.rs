//! Mirror transformation.

use serde::{Deserialize, Serialize};

use super::{Applied, TransformError};
use crate::raster::Raster;

/// Toggle the raster's mirror flags. Flips are applied before rotation when
/// the raster is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub fn horizontal() -> Self {
        Self {
            horizontal: true,
            vertical: false,
        }
    }

    pub fn vertical() -> Self {
        Self {
            horizontal: false,
            vertical: true,
        }
    }

    pub fn apply(&self, raster: &Raster) -> Result<Applied, TransformError> {
        if !self.horizontal && !self.vertical {
            return Ok(Applied::Unchanged);
        }
        let mut out = raster.clone();
        out.flip_x ^= self.horizontal;
        out.flip_y ^= self.vertical;
        Ok(Applied::Replaced(out))
    }
}
