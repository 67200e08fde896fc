//! Converting the on-screen selection into raster-native pixel coordinates.

use thiserror::Error;

use crate::geometry::Rect;

/// Why a selection could not be committed. The caller simply does nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    /// There is no selection rectangle.
    #[error("No selection to commit")]
    NoSelection,

    /// Width and height are both below one pixel, or the selection misses
    /// the raster entirely.
    #[error("Degenerate selection: {width}x{height}")]
    Degenerate { width: f64, height: f64 },

    /// The display scale must be positive and finite.
    #[error("Invalid display scale: {0}")]
    InvalidScale(f64),
}

/// Trim `selection` to the raster's display bounds and divide by the display
/// scale.
///
/// A selection hanging over the raster's near edge is trimmed rather than
/// rejected; width and height are capped by the raster's display size. A
/// selection starting at or past the far edge misses the raster.
pub fn to_native(selection: Rect, raster_bounds: Rect, scale: f64) -> Result<Rect, SelectError> {
    if selection.is_degenerate() {
        return Err(SelectError::Degenerate {
            width: selection.width,
            height: selection.height,
        });
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(SelectError::InvalidScale(scale));
    }

    let mut top = selection.top - raster_bounds.top;
    let mut left = selection.left - raster_bounds.left;
    let mut width = selection.width;
    let mut height = selection.height;

    if top < 0.0 {
        height += top;
        top = 0.0;
    }
    if left < 0.0 {
        width += left;
        left = 0.0;
    }
    if left >= raster_bounds.width || top >= raster_bounds.height {
        return Err(SelectError::Degenerate { width: 0.0, height: 0.0 });
    }
    width = width.min(raster_bounds.width);
    height = height.min(raster_bounds.height);

    let native = Rect::new(left / scale, top / scale, width / scale, height / scale);
    if native.is_degenerate() || native.width <= 0.0 || native.height <= 0.0 {
        return Err(SelectError::Degenerate {
            width: native.width,
            height: native.height,
        });
    }
    Ok(native)
}
