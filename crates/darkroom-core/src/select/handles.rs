//! Direct manipulation of the selection through its move and scale handles.
//!
//! The scene graph reports candidate geometry while the user drags the
//! rectangle or one of its handles; these functions decide what is allowed.

use serde::{Deserialize, Serialize};

use super::resize::{translate_rect, Constraints};
use crate::geometry::{Point, Rect, Viewport};

/// A scale handle on the selection outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    fn moves_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Left | Handle::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::Right | Handle::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Top | Handle::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::Bottom | Handle::BottomRight)
    }

    fn is_corner(self) -> bool {
        (self.moves_left() || self.moves_right()) && (self.moves_top() || self.moves_bottom())
    }
}

/// Candidate geometry of a scale interaction: position plus scale factors
/// relative to the size the rectangle had when the interaction began.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleScale {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Keep a moved rectangle inside the viewport: `left ∈ [0, vw - width]`,
/// `top ∈ [0, vh - height]`.
pub(crate) fn clamp_move(rect: Rect, left: f64, top: f64, viewport: Viewport) -> Rect {
    let max_x = (viewport.width - rect.width).max(0.0);
    let max_y = (viewport.height - rect.height).max(0.0);
    Rect::new(left.clamp(0.0, max_x), top.clamp(0.0, max_y), rect.width, rect.height)
}

/// Derive the scale candidate for `handle` dragged to `pointer`, starting
/// from `origin`. Edges never cross over their opposite edge.
pub(crate) fn candidate_from_pointer(
    origin: Rect,
    handle: Handle,
    pointer: Point,
    ratio_locked: bool,
) -> HandleScale {
    let (mut left, mut right) = (origin.left, origin.right());
    let (mut top, mut bottom) = (origin.top, origin.bottom());

    if handle.moves_left() {
        left = pointer.x.min(right);
    }
    if handle.moves_right() {
        right = pointer.x.max(left);
    }
    if handle.moves_top() {
        top = pointer.y.min(bottom);
    }
    if handle.moves_bottom() {
        bottom = pointer.y.max(top);
    }

    let mut scale_x = (right - left) / origin.width;
    let mut scale_y = (bottom - top) / origin.height;

    if ratio_locked {
        let uniform = if handle.is_corner() {
            scale_x.max(scale_y)
        } else if handle.moves_left() || handle.moves_right() {
            scale_x
        } else {
            scale_y
        };
        scale_x = uniform;
        scale_y = uniform;
        if handle.moves_left() {
            left = right - origin.width * uniform;
        }
        if handle.moves_top() {
            top = bottom - origin.height * uniform;
        }
    }

    HandleScale {
        left,
        top,
        scale_x,
        scale_y,
    }
}

/// Validate a scale candidate against bounds and minimum size.
///
/// An axis that would leave the viewport falls back to `last_valid`; when
/// the ratio is locked any overflow reverts both axes. A size below the
/// minimum is scaled back up. The edges `handle` does not move stay where
/// they were in `origin`. Returns the accepted rectangle and the scale
/// factors to remember as the new last valid pair.
pub(crate) fn validate_scale(
    origin: Rect,
    handle: Handle,
    candidate: HandleScale,
    last_valid: (f64, f64),
    constraints: &Constraints,
) -> (Rect, (f64, f64)) {
    let viewport = constraints.viewport;
    let HandleScale {
        left,
        top,
        mut scale_x,
        mut scale_y,
    } = candidate;

    let width = origin.width * scale_x;
    let height = origin.height * scale_y;
    let out_x = left < 0.0 || left + width > viewport.width;
    let out_y = top < 0.0 || top + height > viewport.height;
    let locked = constraints.ratio.is_some();
    let prevent = locked && (out_x || out_y);

    if out_x || prevent {
        scale_x = last_valid.0;
    }
    if out_y || prevent {
        scale_y = last_valid.1;
    }

    let min_w = constraints.min_width.min(viewport.width);
    let min_h = constraints.min_height.min(viewport.height);
    if origin.width * scale_x < min_w {
        scale_x = min_w / origin.width;
        if locked {
            scale_y = scale_x;
        }
    }
    if origin.height * scale_y < min_h {
        scale_y = min_h / origin.height;
        if locked {
            scale_x = scale_y;
        }
    }

    let width = origin.width * scale_x;
    let height = origin.height * scale_y;
    let left = if handle.moves_left() { origin.right() - width } else { origin.left };
    let top = if handle.moves_top() { origin.bottom() - height } else { origin.top };

    let rect = Rect::new(left.max(0.0), top.max(0.0), width, height);
    (translate_rect(rect, viewport), (scale_x, scale_y))
}
