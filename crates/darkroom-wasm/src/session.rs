//! WASM bindings for a crop editing session.
//!
//! Pointer coordinates are canvas-local display pixels. Signals raised while
//! handling a call are queued; JavaScript drains them afterwards with
//! `drain_signals()` and dispatches its own DOM events, so listeners never
//! re-enter the session.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsCropSession(bytes, { display: { maxWidth: 640, maxHeight: 480 } });
//! session.toggle_select();
//! session.pointer_down(10, 10);
//! session.pointer_move(200, 120);
//! session.pointer_up();
//! if (session.commit_crop()) {
//!     const image = session.working_image();
//! }
//! for (const name of session.drain_signals()) {
//!     element.dispatchEvent(new Event(name));
//! }
//! ```
//!
//! Decoding goes through `ImageDecoder`, whose future is ready on first poll,
//! so the async core is driven with `block_on` without ever parking.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use darkroom_core::{
    CommitOutcome, CropSession, ExportFormat, ImageDecoder, Point, SessionConfig, SessionError, Signal,
};
use futures::executor::block_on;
use wasm_bindgen::prelude::*;

use crate::types::JsRaster;

fn to_js(error: SessionError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_config(config: JsValue) -> Result<SessionConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(SessionConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))
}

/// One crop editing session over one image.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
    pending: Rc<RefCell<VecDeque<Signal>>>,
}

impl JsCropSession {
    pub(crate) fn from_session(mut inner: CropSession) -> Self {
        let pending: Rc<RefCell<VecDeque<Signal>>> = Rc::default();
        let queue = Rc::clone(&pending);
        inner.subscribe(move |signal| queue.borrow_mut().push_back(signal));
        Self { inner, pending }
    }

    pub(crate) fn take_signals(&self) -> Vec<Signal> {
        self.pending.borrow_mut().drain(..).collect()
    }

    /// Commit the selection; `Ok(true)` when a crop was applied.
    pub(crate) fn commit(&mut self) -> Result<bool, SessionError> {
        match block_on(self.inner.commit_crop())? {
            CommitOutcome::Applied(_) => Ok(true),
            CommitOutcome::Skipped(reason) => {
                log::debug!("crop skipped: {reason}");
                Ok(false)
            }
        }
    }
}

#[wasm_bindgen]
impl JsCropSession {
    /// Decode `bytes` (PNG or JPEG) and open a session.
    ///
    /// `config` is `{ display: {...}, select: {...} }`; `undefined` or `null`
    /// means defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8], config: JsValue) -> Result<JsCropSession, JsValue> {
        let config = parse_config(config)?;
        let inner = block_on(CropSession::open(bytes, &ImageDecoder, config)).map_err(to_js)?;
        Ok(Self::from_session(inner))
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_down(Point::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) -> bool {
        self.inner.pointer_up()
    }

    pub fn key_down(&mut self, code: u32) -> bool {
        self.inner.key_down(code)
    }

    pub fn key_up(&mut self, code: u32) -> bool {
        self.inner.key_up(code)
    }

    pub fn toggle_select(&mut self) {
        self.inner.toggle_select();
    }

    #[wasm_bindgen(getter)]
    pub fn has_selection(&self) -> bool {
        self.inner.engine().has_focus()
    }

    /// The selection as `{left, top, width, height}`, or `undefined`.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        match self.inner.selection() {
            Some(rect) => serde_wasm_bindgen::to_value(&rect).map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Canvas and image placement as `{canvas, image, scale}`.
    pub fn layout(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.layout()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Crop to the selection. Returns `false` when there was nothing to crop.
    pub fn commit_crop(&mut self) -> Result<bool, JsValue> {
        self.commit().map_err(to_js)
    }

    pub fn rotate(&mut self, angle: f64) -> Result<(), JsValue> {
        block_on(self.inner.rotate(angle)).map_err(to_js)
    }

    pub fn flip(&mut self, horizontal: bool, vertical: bool) -> Result<(), JsValue> {
        block_on(self.inner.flip(horizontal, vertical)).map_err(to_js)
    }

    pub fn undo(&mut self) -> Result<(), JsValue> {
        block_on(self.inner.undo()).map_err(to_js)
    }

    pub fn redo(&mut self) -> Result<(), JsValue> {
        block_on(self.inner.redo()).map_err(to_js)
    }

    /// The applied transformations, e.g. `[{type: "crop", left: 0.1, ...}]`.
    pub fn transformations(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.pipeline().transformations())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The displayed image.
    pub fn working_image(&self) -> JsRaster {
        JsRaster::from_raster(self.inner.working())
    }

    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.export(ExportFormat::Png).map_err(to_js)
    }

    pub fn export_jpeg(&self, quality: u8) -> Result<Vec<u8>, JsValue> {
        self.inner.export(ExportFormat::Jpeg { quality }).map_err(to_js)
    }

    /// Names of the signals raised since the last call, oldest first.
    pub fn drain_signals(&self) -> js_sys::Array {
        self.take_signals()
            .into_iter()
            .map(|signal| JsValue::from_str(signal.name()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_core::Raster;

    fn session() -> JsCropSession {
        let inner = CropSession::from_raster(Raster::filled(200, 100, [10, 20, 30]), SessionConfig::default()).unwrap();
        JsCropSession::from_session(inner)
    }

    #[test]
    fn test_draw_and_commit() {
        let mut s = session();
        s.toggle_select();
        assert!(s.pointer_down(20.0, 10.0));
        assert!(s.pointer_move(120.0, 60.0));
        assert!(s.pointer_up());

        assert!(s.commit().unwrap());
        let image = s.working_image();
        assert_eq!((image.width(), image.height()), (100, 50));
        assert!(!s.has_selection());
    }

    #[test]
    fn test_signals_are_queued_until_drained() {
        let mut s = session();
        s.toggle_select();
        s.pointer_down(0.0, 0.0);
        s.pointer_move(50.0, 50.0);
        s.pointer_up();
        s.commit().unwrap();

        assert_eq!(
            s.take_signals(),
            vec![
                Signal::SelectionChanged,
                Signal::SelectionChanged,
                Signal::TransformationApplied,
                Signal::SelectionChanged,
            ]
        );
        assert!(s.take_signals().is_empty());
    }

    #[test]
    fn test_commit_without_selection_is_false() {
        let mut s = session();
        assert!(!s.commit().unwrap());
        assert!(s.take_signals().is_empty());
    }

    #[test]
    fn test_pointer_ignored_without_selection() {
        let mut s = session();
        assert!(!s.pointer_down(5.0, 5.0));
        assert!(!s.pointer_up());
    }
}

/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use darkroom_core::raster::encode_png;
    use darkroom_core::Raster;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&Raster::filled(width, height, [200, 100, 50])).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_new_with_default_config() {
        let s = JsCropSession::new(&png(40, 30), JsValue::UNDEFINED).unwrap();
        assert_eq!(s.working_image().width(), 40);
        assert!(s.selection().unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_new_rejects_garbage() {
        assert!(JsCropSession::new(&[0, 1, 2, 3], JsValue::NULL).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rotate_and_export() {
        let mut s = JsCropSession::new(&png(40, 30), JsValue::UNDEFINED).unwrap();
        s.rotate(90.0).unwrap();
        assert_eq!(s.working_image().width(), 30);

        let jpeg = s.export_jpeg(90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(s.drain_signals().length(), 1);
    }
}
