//! Plane geometry shared by the selection engine and the transformations.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the viewport
//! - `x` grows to the right, `y` grows downwards
//! - All values are `f64` display units; conversion to native pixels happens
//!   only when a selection is committed

use serde::{Deserialize, Serialize};

/// A pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal and vertical midlines.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// A rectangle with effectively zero area (both sides below one unit).
    pub fn is_degenerate(&self) -> bool {
        self.width < 1.0 && self.height < 1.0
    }

    /// Check whether the rectangle lies inside `viewport`, allowing `tolerance`
    /// for floating point drift on each edge.
    pub fn fits_within(&self, viewport: Viewport, tolerance: f64) -> bool {
        self.left >= -tolerance
            && self.top >= -tolerance
            && self.right() <= viewport.width + tolerance
            && self.bottom() <= viewport.height + tolerance
    }
}

/// Rotation-aware bounding box of a raster.
///
/// This is the coordinate space of the selection rectangle: a raster rotated
/// by θ occupies `|h·sin θ| + |w·cos θ|` by `|w·sin θ| + |h·cos θ|`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Compute the viewport of a `width` x `height` raster rotated by
    /// `angle_degrees`.
    ///
    /// Multiples of 90° are handled exactly so that quarter turns swap the
    /// dimensions without trigonometric noise.
    pub fn of(width: f64, height: f64, angle_degrees: f64) -> Self {
        let normalized = angle_degrees.rem_euclid(360.0);
        for (quarter, swapped) in [(0.0, false), (90.0, true), (180.0, false), (270.0, true), (360.0, false)] {
            if (normalized - quarter).abs() < 1e-9 {
                return if swapped {
                    Self::new(height, width)
                } else {
                    Self::new(width, height)
                };
            }
        }

        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        Self {
            height: (width * sin).abs() + (height * cos).abs(),
            width: (height * sin).abs() + (width * cos).abs(),
        }
    }

    /// The whole viewport as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
