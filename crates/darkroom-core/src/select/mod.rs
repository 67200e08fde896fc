//! The selection-rectangle engine.
//!
//! Owns the transient crop rectangle and the state of the current
//! interaction. Pointer and key events come in, a constrained rectangle comes
//! out; committing converts it to native raster pixels.
//!
//! ## Interactions
//!
//! - **Draw**: pointer down outside the rectangle, drag to span a new one
//! - **Move**: drag the rectangle itself, clamped to the viewport
//! - **Scale**: drag one of the eight handles
//! - **Quick select**: hold the configured key and move the pointer; the
//!   rectangle grows from whichever corner is opposite the pointer
//!
//! Every reshape ends with [`Signal::SelectionChanged`], emitted after the
//! rectangle has been written.

mod commit;
mod config;
mod handles;
mod resize;

pub use commit::{to_native, SelectError};
pub use config::{ConfigError, SelectConfig};
pub use handles::{Handle, HandleScale};
pub use resize::{constrained_rect, Constraints, Direction, RATIO_EPSILON};

pub(crate) use config::positive;

use crate::geometry::{Point, Rect, Viewport};
use crate::signal::{ListenerId, Signal, Signals};

/// What a pointer-down should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Span a fresh rectangle from the pointer.
    New,
    /// Translate the existing rectangle.
    Move,
    /// Resize through one of the handles.
    Scale(Handle),
}

/// The interaction currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    None,
    Drawing,
    Moving,
    Scaling(Handle),
    KeySelecting,
}

/// Transient state of one interaction, from begin to end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub mode: DragMode,
    /// Where the interaction started. Quick select latches it on the first
    /// pointer move when no pointer position was known yet.
    pub anchor: Option<Point>,
    /// The rectangle as it was when the interaction began.
    pub origin: Rect,
    pub last_valid_scale: (f64, f64),
    pub latched: Direction,
}

impl DragState {
    fn new(mode: DragMode, anchor: Option<Point>, origin: Rect) -> Self {
        Self {
            mode,
            anchor,
            origin,
            last_valid_scale: (1.0, 1.0),
            latched: Direction::default(),
        }
    }
}

/// Selection engine for one editing session.
#[derive(Debug)]
pub struct SelectionEngine {
    config: SelectConfig,
    viewport: Viewport,
    rect: Option<Rect>,
    drag: Option<DragState>,
    pointer: Option<Point>,
    signals: Signals,
}

impl SelectionEngine {
    /// Create an engine; invalid configuration is rejected here and nowhere
    /// else.
    pub fn new(config: SelectConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            viewport,
            rect: None,
            drag: None,
            pointer: None,
            signals: Signals::new(),
        })
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The current rectangle, if one exists.
    pub fn selection(&self) -> Option<Rect> {
        self.rect
    }

    pub fn has_focus(&self) -> bool {
        self.rect.is_some()
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag.map_or(DragMode::None, |d| d.mode)
    }

    /// Last pointer position seen by [`update_drag`](Self::update_drag).
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Signal) + 'static) -> ListenerId {
        self.signals.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.signals.unsubscribe(id)
    }

    fn constraints(&self) -> Constraints {
        Constraints {
            viewport: self.viewport,
            min_width: self.config.min_width,
            min_height: self.config.min_height,
            ratio: self.config.ratio,
        }
    }

    /// Zero-size rectangle at `point`, clamped into the viewport.
    fn collapsed_at(&self, point: Point) -> Rect {
        Rect::new(
            point.x.clamp(0.0, self.viewport.width.max(0.0)),
            point.y.clamp(0.0, self.viewport.height.max(0.0)),
            0.0,
            0.0,
        )
    }

    fn write(&mut self, rect: Rect) {
        self.rect = Some(rect);
        self.signals.emit(Signal::SelectionChanged);
    }

    /// Switch to a new viewport (the raster or its layout changed). An
    /// existing rectangle is translated back inside.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(rect) = self.rect {
            let moved = resize::translate_rect(rect, viewport);
            if moved != rect {
                self.write(moved);
            }
        }
    }

    /// Create a zero-size rectangle if none exists.
    pub fn acquire(&mut self) {
        if self.rect.is_none() {
            log::debug!("selection acquired");
            self.rect = Some(Rect::default());
        }
    }

    /// Discard the rectangle and any interaction in progress.
    pub fn release(&mut self) {
        self.drag = None;
        if self.rect.take().is_some() {
            log::debug!("selection released");
            self.signals.emit(Signal::SelectionChanged);
        }
    }

    pub fn toggle(&mut self) {
        if self.has_focus() {
            self.release();
        } else {
            self.acquire();
        }
    }

    /// Start an interaction at `pointer`.
    ///
    /// Returns `false` when ignored: no rectangle, quick select running, or
    /// a scale on a rectangle with no size to scale from.
    pub fn begin_drag(&mut self, pointer: Point, kind: DragKind) -> bool {
        let Some(rect) = self.rect else {
            return false;
        };
        if self.drag_mode() == DragMode::KeySelecting {
            return false;
        }
        self.pointer = Some(pointer);

        let mode = match kind {
            DragKind::New => DragMode::Drawing,
            DragKind::Move => DragMode::Moving,
            DragKind::Scale(handle) => {
                if rect.width <= 0.0 || rect.height <= 0.0 {
                    return false;
                }
                DragMode::Scaling(handle)
            }
        };
        log::debug!("begin {mode:?} at ({}, {})", pointer.x, pointer.y);

        if mode == DragMode::Drawing {
            let fresh = self.collapsed_at(pointer);
            self.drag = Some(DragState::new(mode, Some(pointer), fresh));
            self.write(fresh);
        } else {
            self.drag = Some(DragState::new(mode, Some(pointer), rect));
        }
        true
    }

    /// Feed a pointer move. Reshapes the rectangle when an interaction is in
    /// progress and returns whether it did.
    pub fn update_drag(&mut self, pointer: Point) -> bool {
        self.pointer = Some(pointer);
        let Some(mut drag) = self.drag else {
            return false;
        };

        let rect = match drag.mode {
            DragMode::None => return false,
            DragMode::Drawing => {
                let Some(anchor) = drag.anchor else {
                    return false;
                };
                constrained_rect(anchor, pointer, &self.constraints(), None)
            }
            DragMode::Moving => {
                let Some(anchor) = drag.anchor else {
                    return false;
                };
                let origin = drag.origin;
                handles::clamp_move(
                    origin,
                    origin.left + pointer.x - anchor.x,
                    origin.top + pointer.y - anchor.y,
                    self.viewport,
                )
            }
            DragMode::Scaling(handle) => {
                let locked = self.config.ratio.is_some();
                let candidate = handles::candidate_from_pointer(drag.origin, handle, pointer, locked);
                let (rect, last) =
                    handles::validate_scale(drag.origin, handle, candidate, drag.last_valid_scale, &self.constraints());
                drag.last_valid_scale = last;
                rect
            }
            DragMode::KeySelecting => self.key_select_rect(&mut drag, pointer),
        };

        log::trace!(
            "{:?} -> {{{}, {}, {}x{}}}",
            drag.mode,
            rect.left,
            rect.top,
            rect.width,
            rect.height
        );
        self.drag = Some(drag);
        self.write(rect);
        true
    }

    /// Grow the rectangle from the corner opposite the pointer. The latched
    /// direction comes from the pointer position against the midlines.
    fn key_select_rect(&self, drag: &mut DragState, pointer: Point) -> Rect {
        let current = match (drag.anchor, self.rect) {
            (Some(_), Some(rect)) => rect,
            _ => {
                log::debug!("quick select latched at ({}, {})", pointer.x, pointer.y);
                drag.anchor = Some(pointer);
                return self.collapsed_at(pointer);
            }
        };

        let center = current.center();
        drag.latched = Direction {
            is_left: pointer.x < center.x,
            is_up: pointer.y < center.y,
        };
        let anchor = Point::new(
            if drag.latched.is_left { current.right() } else { current.left },
            if drag.latched.is_up { current.bottom() } else { current.top },
        );
        constrained_rect(anchor, pointer, &self.constraints(), Some(drag.latched))
    }

    /// Finish the interaction. A second call is a no-op and returns `false`.
    pub fn end_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                log::debug!("end {:?}", drag.mode);
                true
            }
            None => false,
        }
    }

    /// Enter quick select. The rectangle collapses onto the last known
    /// pointer position, or onto the first pointer move if none is known.
    pub fn begin_key_select(&mut self) -> bool {
        if !self.has_focus() || self.drag_mode() == DragMode::KeySelecting {
            return false;
        }

        let fresh = match self.pointer {
            Some(p) => {
                log::debug!("quick select latched at ({}, {})", p.x, p.y);
                self.collapsed_at(p)
            }
            None => Rect::default(),
        };
        self.drag = Some(DragState::new(DragMode::KeySelecting, self.pointer, fresh));
        self.write(fresh);
        true
    }

    pub fn end_key_select(&mut self) -> bool {
        if self.drag_mode() != DragMode::KeySelecting {
            return false;
        }
        self.end_drag()
    }

    fn is_quick_select_key(&self, code: u32) -> bool {
        self.config.quick_select_key == Some(code)
    }

    /// Key press dispatch. Only the configured quick select key is handled.
    pub fn on_key_down(&mut self, code: u32) -> bool {
        self.is_quick_select_key(code) && self.begin_key_select()
    }

    pub fn on_key_up(&mut self, code: u32) -> bool {
        self.is_quick_select_key(code) && self.end_key_select()
    }

    /// The scene graph moved the rectangle to `(left, top)`.
    pub fn handle_moved(&mut self, left: f64, top: f64) -> bool {
        let Some(rect) = self.rect else {
            return false;
        };
        let moved = handles::clamp_move(rect, left, top, self.viewport);
        self.write(moved);
        true
    }

    /// The scene graph scaled the rectangle through `handle`.
    ///
    /// Scale factors are relative to the rectangle at the start of the
    /// current scale interaction, or to the current rectangle otherwise.
    pub fn handle_scaled(&mut self, handle: Handle, candidate: HandleScale) -> bool {
        let Some(rect) = self.rect else {
            return false;
        };
        let (origin, last_valid) = match self.drag {
            Some(DragState {
                mode: DragMode::Scaling(_),
                origin,
                last_valid_scale,
                ..
            }) => (origin, last_valid_scale),
            _ => (rect, (1.0, 1.0)),
        };
        if origin.width <= 0.0 || origin.height <= 0.0 {
            return false;
        }

        let (scaled, last) = handles::validate_scale(origin, handle, candidate, last_valid, &self.constraints());
        if let Some(drag) = self.drag.as_mut() {
            if matches!(drag.mode, DragMode::Scaling(_)) {
                drag.last_valid_scale = last;
            }
        }
        self.write(scaled);
        true
    }

    /// Programmatic selection. Without `force` the rectangle goes through the
    /// same constraints as a drag from its top-left to its bottom-right
    /// corner.
    pub fn draw(&mut self, rect: Rect, force: bool) {
        self.acquire();
        let rect = if force {
            rect
        } else {
            constrained_rect(
                Point::new(rect.left, rect.top),
                Point::new(rect.right(), rect.bottom()),
                &self.constraints(),
                None,
            )
        };
        self.write(rect);
    }

    /// Convert the rectangle to native pixels of a raster displayed at
    /// `raster_bounds` with display `scale`.
    pub fn commit_selection(&self, raster_bounds: Rect, scale: f64) -> Result<Rect, SelectError> {
        let rect = self.rect.ok_or(SelectError::NoSelection)?;
        let result = to_native(rect, raster_bounds, scale);
        match &result {
            Ok(native) => log::debug!(
                "commit {{{}, {}, {}x{}}}",
                native.left,
                native.top,
                native.width,
                native.height
            ),
            Err(e) => log::debug!("commit skipped: {e}"),
        }
        result
    }
}
