//! Constrained resize: turning an anchor and a live pointer into a selection
//! rectangle that respects the viewport, the minimum size and the ratio.
//!
//! # Algorithm
//!
//! The step order matters; each step assumes the previous ones ran:
//! 1. Drag direction from anchor to pointer
//! 2. Raw bounding box, clamped into the viewport
//! 3. Minimum size, extended in the drag direction
//! 4. Bounds restored by translation (sizes are preserved)
//! 5. Ratio correction away from the anchor edge, shrinking proportionally
//!    when the grown side would leave the viewport

use crate::geometry::{Point, Rect, Viewport};

/// Tolerance on `width / height` before a ratio correction kicks in.
pub const RATIO_EPSILON: f64 = 1e-9;

/// Which side of the anchor the selection grows towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Direction {
    pub is_left: bool,
    pub is_up: bool,
}

impl Direction {
    /// Direction of a drag from `anchor` to `live`.
    pub fn of_drag(anchor: Point, live: Point) -> Self {
        Self {
            is_left: live.x <= anchor.x,
            is_up: live.y <= anchor.y,
        }
    }
}

/// Limits applied to every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub viewport: Viewport,
    pub min_width: f64,
    pub min_height: f64,
    pub ratio: Option<f64>,
}

impl Constraints {
    /// Minimums never exceed the viewport itself.
    fn effective_min(&self) -> (f64, f64) {
        let (vw, vh) = self.dimensions();
        (self.min_width.min(vw), self.min_height.min(vh))
    }

    fn dimensions(&self) -> (f64, f64) {
        (self.viewport.width.max(0.0), self.viewport.height.max(0.0))
    }
}

/// Compute the selection spanned by `anchor` and `live`.
///
/// `latched` overrides the drag direction used for the ratio correction
/// (quick select latches it from the pointer position instead).
pub fn constrained_rect(
    anchor: Point,
    live: Point,
    constraints: &Constraints,
    latched: Option<Direction>,
) -> Rect {
    let (vw, vh) = constraints.dimensions();
    let (min_w, min_h) = constraints.effective_min();

    let is_right = live.x > anchor.x;
    let is_down = live.y > anchor.y;

    let mut left = anchor.x.min(live.x).clamp(0.0, vw);
    let mut right = anchor.x.max(live.x).clamp(0.0, vw);
    let mut top = anchor.y.min(live.y).clamp(0.0, vh);
    let mut bottom = anchor.y.max(live.y).clamp(0.0, vh);

    if right - left < min_w {
        if is_right {
            right = left + min_w;
        } else {
            left = right - min_w;
        }
    }
    if bottom - top < min_h {
        if is_down {
            bottom = top + min_h;
        } else {
            top = bottom - min_h;
        }
    }

    let (left, right) = translate_into(left, right, vw);
    let (top, bottom) = translate_into(top, bottom, vh);
    let rect = Rect::new(left, top, right - left, bottom - top);

    match constraints.ratio {
        Some(ratio) => {
            let direction = latched.unwrap_or(Direction::of_drag(anchor, live));
            fit_ratio(rect, ratio, direction, constraints)
        }
        None => rect,
    }
}

/// Shift the span `[lo, hi]` inside `[0, dim]` without changing its length.
/// Only a span longer than `dim` is truncated.
fn translate_into(mut lo: f64, mut hi: f64, dim: f64) -> (f64, f64) {
    if lo < 0.0 {
        hi -= lo;
        lo = 0.0;
    }
    if hi > dim {
        lo -= hi - dim;
        hi = dim;
    }
    if lo < 0.0 {
        lo = 0.0;
    }
    (lo, hi)
}

/// Translate a whole rectangle back inside the viewport.
pub(crate) fn translate_rect(rect: Rect, viewport: Viewport) -> Rect {
    let (left, right) = translate_into(rect.left, rect.right(), viewport.width.max(0.0));
    let (top, bottom) = translate_into(rect.top, rect.bottom(), viewport.height.max(0.0));
    Rect::new(left, top, right - left, bottom - top)
}

fn fit_ratio(mut r: Rect, ratio: f64, dir: Direction, constraints: &Constraints) -> Rect {
    let (vw, vh) = constraints.dimensions();
    if r.width <= 0.0 || r.height <= 0.0 {
        return r;
    }

    let current = r.width / r.height;
    if (current - ratio).abs() <= RATIO_EPSILON {
        return r;
    }

    if current < ratio {
        let new_width = r.height * ratio;
        if dir.is_left {
            r.left -= new_width - r.width;
        }
        r.width = new_width;
    } else {
        let new_height = r.width / ratio;
        if dir.is_up {
            r.top -= new_height - r.height;
        }
        r.height = new_height;
    }

    // Only the grown axis can overflow. Take what space remains on that
    // axis and shrink the other side to match, keeping its anchor edge.
    if r.left < 0.0 {
        let right = r.right();
        r.left = 0.0;
        r.width = right;
        let height = r.width / ratio;
        set_height_keeping_anchor(&mut r, height, dir);
    }
    if r.right() > vw {
        r.width = vw - r.left;
        let height = r.width / ratio;
        set_height_keeping_anchor(&mut r, height, dir);
    }
    if r.top < 0.0 {
        let bottom = r.bottom();
        r.top = 0.0;
        r.height = bottom;
        let width = r.height * ratio;
        set_width_keeping_anchor(&mut r, width, dir);
    }
    if r.bottom() > vh {
        r.height = vh - r.top;
        let width = r.height * ratio;
        set_width_keeping_anchor(&mut r, width, dir);
    }

    restore_minimum(r, dir, constraints)
}

fn set_height_keeping_anchor(r: &mut Rect, height: f64, dir: Direction) {
    if dir.is_up {
        r.top = r.bottom() - height;
    }
    r.height = height;
}

fn set_width_keeping_anchor(r: &mut Rect, width: f64, dir: Direction) {
    if dir.is_left {
        r.left = r.right() - width;
    }
    r.width = width;
}

/// Scale a ratio-corrected rectangle back up to the minimum size when a
/// ratio-preserving rectangle of that size fits in the viewport.
fn restore_minimum(r: Rect, dir: Direction, constraints: &Constraints) -> Rect {
    let (vw, vh) = constraints.dimensions();
    let (min_w, min_h) = constraints.effective_min();
    if r.width <= 0.0 || r.height <= 0.0 {
        return r;
    }

    let factor = (min_w / r.width).max(min_h / r.height);
    if factor <= 1.0 {
        return r;
    }

    let width = r.width * factor;
    let height = r.height * factor;
    if width > vw || height > vh {
        return r;
    }

    let mut grown = r;
    set_width_keeping_anchor(&mut grown, width, dir);
    set_height_keeping_anchor(&mut grown, height, dir);
    translate_rect(grown, constraints.viewport)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints(min: f64, ratio: Option<f64>) -> Constraints {
        Constraints {
            viewport: Viewport::new(800.0, 600.0),
            min_width: min,
            min_height: min,
            ratio,
        }
    }

    fn drag(from: (f64, f64), to: (f64, f64), c: &Constraints) -> Rect {
        constrained_rect(Point::new(from.0, from.1), Point::new(to.0, to.1), c, None)
    }

    #[test]
    fn test_plain_drag() {
        let r = drag((10.0, 20.0), (110.0, 70.0), &constraints(1.0, None));
        assert_eq!(r, Rect::new(10.0, 20.0, 100.0, 50.0));
    }

    #[test]
    fn test_reverse_drag_normalizes() {
        let r = drag((110.0, 70.0), (10.0, 20.0), &constraints(1.0, None));
        assert_eq!(r, Rect::new(10.0, 20.0, 100.0, 50.0));
    }

    #[test]
    fn test_minimum_extends_in_drag_direction() {
        let r = drag((10.0, 10.0), (20.0, 15.0), &constraints(50.0, None));
        assert_eq!(r, Rect::new(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_minimum_extends_towards_near_edge_when_dragging_back() {
        let r = drag((100.0, 100.0), (90.0, 95.0), &constraints(50.0, None));
        assert_eq!(r, Rect::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_minimum_translates_instead_of_truncating() {
        // Dragging left from near the origin pushes the box past 0
        let r = drag((10.0, 10.0), (5.0, 5.0), &constraints(50.0, None));
        assert_eq!(r, Rect::new(0.0, 0.0, 50.0, 50.0));

        // Dragging right near the far edge
        let r = drag((790.0, 590.0), (795.0, 595.0), &constraints(50.0, None));
        assert_eq!(r, Rect::new(750.0, 550.0, 50.0, 50.0));
    }

    #[test]
    fn test_pointer_outside_viewport_is_clamped() {
        let r = drag((100.0, 100.0), (1000.0, -50.0), &constraints(1.0, None));
        assert_eq!(r, Rect::new(100.0, 0.0, 700.0, 100.0));
    }

    #[test]
    fn test_minimum_larger_than_viewport_uses_viewport() {
        let c = Constraints {
            viewport: Viewport::new(30.0, 20.0),
            min_width: 50.0,
            min_height: 50.0,
            ratio: None,
        };
        let r = drag((5.0, 5.0), (6.0, 6.0), &c);
        assert_eq!(r, Rect::new(0.0, 0.0, 30.0, 20.0));
    }

    #[test]
    fn test_ratio_grows_width_from_left_anchor() {
        let r = drag((0.0, 0.0), (100.0, 100.0), &constraints(1.0, Some(2.0)));
        assert_eq!(r, Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_ratio_grows_width_leftwards_when_dragging_left() {
        let r = drag((400.0, 100.0), (300.0, 200.0), &constraints(1.0, Some(2.0)));
        assert_eq!(r, Rect::new(200.0, 100.0, 200.0, 100.0));
    }

    #[test]
    fn test_ratio_grows_height_upwards_when_dragging_up() {
        let r = drag((100.0, 300.0), (300.0, 200.0), &constraints(1.0, Some(1.0)));
        assert_eq!(r, Rect::new(100.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn test_ratio_overflow_right_shrinks_proportionally() {
        // 100 tall needs 200 wide, only 100 left before the edge
        let r = drag((700.0, 0.0), (750.0, 100.0), &constraints(1.0, Some(2.0)));
        assert_eq!(r, Rect::new(700.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_ratio_overflow_left_keeps_bottom_when_dragging_up() {
        let r = drag((50.0, 300.0), (0.0, 200.0), &constraints(1.0, Some(2.0)));
        // Grew leftwards past 0: width = 50, height = 25 anchored at the bottom
        assert_eq!(r, Rect::new(0.0, 275.0, 50.0, 25.0));
    }

    #[test]
    fn test_ratio_overflow_bottom() {
        let r = drag((0.0, 500.0), (400.0, 550.0), &constraints(1.0, Some(1.0)));
        assert_eq!(r, Rect::new(0.0, 500.0, 100.0, 100.0));
    }

    #[test]
    fn test_ratio_respects_minimum_after_shrink() {
        let r = drag((790.0, 0.0), (800.0, 300.0), &constraints(50.0, Some(2.0)));
        assert_eq!(r, Rect::new(700.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_latched_direction_overrides_drag_direction() {
        let c = constraints(1.0, Some(2.0));
        let latched = Direction {
            is_left: true,
            is_up: false,
        };
        let r = constrained_rect(Point::new(300.0, 0.0), Point::new(400.0, 100.0), &c, Some(latched));
        assert_eq!(r, Rect::new(200.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_translate_into() {
        assert_eq!(translate_into(-10.0, 20.0, 100.0), (0.0, 30.0));
        assert_eq!(translate_into(90.0, 120.0, 100.0), (70.0, 100.0));
        assert_eq!(translate_into(-10.0, 200.0, 100.0), (0.0, 100.0));
    }

    #[test]
    fn test_direction_of_drag() {
        let d = Direction::of_drag(Point::new(5.0, 5.0), Point::new(5.0, 9.0));
        assert!(d.is_left);
        assert!(!d.is_up);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-6;

    fn viewport_strategy() -> impl Strategy<Value = Viewport> {
        (1.0f64..2000.0, 1.0f64..2000.0).prop_map(|(w, h)| Viewport::new(w, h))
    }

    /// Pointers may wander outside the viewport.
    fn point_strategy() -> impl Strategy<Value = Point> {
        (-500.0f64..2500.0, -500.0f64..2500.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        /// Property: the rectangle never leaves the viewport.
        #[test]
        fn prop_stays_in_bounds(
            viewport in viewport_strategy(),
            anchor in point_strategy(),
            live in point_strategy(),
            min in 1.0f64..300.0,
            ratio in prop::option::of(0.1f64..10.0),
        ) {
            let c = Constraints { viewport, min_width: min, min_height: min, ratio };
            let r = constrained_rect(anchor, live, &c, None);

            prop_assert!(r.left >= -TOLERANCE, "left {} < 0", r.left);
            prop_assert!(r.top >= -TOLERANCE, "top {} < 0", r.top);
            prop_assert!(r.right() <= viewport.width + TOLERANCE, "right {} > {}", r.right(), viewport.width);
            prop_assert!(r.bottom() <= viewport.height + TOLERANCE, "bottom {} > {}", r.bottom(), viewport.height);
        }

        /// Property: without a ratio the minimum size always holds, capped by
        /// the viewport.
        #[test]
        fn prop_minimum_size(
            viewport in viewport_strategy(),
            anchor in point_strategy(),
            live in point_strategy(),
            min_w in 1.0f64..300.0,
            min_h in 1.0f64..300.0,
        ) {
            let c = Constraints { viewport, min_width: min_w, min_height: min_h, ratio: None };
            let r = constrained_rect(anchor, live, &c, None);

            prop_assert!(r.width >= min_w.min(viewport.width) - TOLERANCE);
            prop_assert!(r.height >= min_h.min(viewport.height) - TOLERANCE);
        }

        /// Property: with a ratio the result has that ratio.
        #[test]
        fn prop_ratio_holds(
            viewport in viewport_strategy(),
            anchor in point_strategy(),
            live in point_strategy(),
            ratio in 0.1f64..10.0,
        ) {
            let c = Constraints { viewport, min_width: 1.0, min_height: 1.0, ratio: Some(ratio) };
            let r = constrained_rect(anchor, live, &c, None);

            prop_assert!(r.width > 0.0 && r.height > 0.0);
            let actual = r.width / r.height;
            prop_assert!(
                (actual - ratio).abs() <= TOLERANCE * ratio.max(1.0),
                "ratio {} != {}", actual, ratio
            );
        }

        /// Property: with a ratio, the minimum size holds whenever a
        /// ratio-shaped rectangle of that size fits.
        #[test]
        fn prop_ratio_and_minimum(
            anchor in point_strategy(),
            live in point_strategy(),
            ratio in 0.5f64..2.0,
            min in 1.0f64..100.0,
        ) {
            let viewport = Viewport::new(1000.0, 1000.0);
            let c = Constraints { viewport, min_width: min, min_height: min, ratio: Some(ratio) };
            let r = constrained_rect(anchor, live, &c, None);

            prop_assert!(r.width >= min - TOLERANCE, "width {} < {}", r.width, min);
            prop_assert!(r.height >= min - TOLERANCE, "height {} < {}", r.height, min);
        }
    }
}
