//! One editing session: a selection engine and a pipeline over one image.
//!
//! The session lays the working raster out on the canvas, feeds the canvas
//! to the engine as its viewport and turns committed selections into crop
//! transformations. After every applied transformation it lays the raster out
//! again and releases the selection.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::display::{DisplayConfig, DisplayLayout};
use crate::geometry::{Point, Rect};
use crate::pipeline::{Pipeline, PipelineError};
use crate::raster::{ExportFormat, Raster, RasterDecoder};
use crate::select::{ConfigError, DragKind, SelectConfig, SelectError, SelectionEngine};
use crate::signal::{ListenerId, Signal};
use crate::transform::{Crop, Flip, Rotate, Transformation};

/// Error types for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Everything a session can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub display: DisplayConfig,
    pub select: SelectConfig,
}

/// What `commit_crop` did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The crop was appended to the pipeline.
    Applied(Crop),
    /// Nothing happened; the reason is informational only.
    Skipped(SelectError),
}

/// Listener handles returned by [`CropSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionListener {
    engine: ListenerId,
    pipeline: ListenerId,
}

#[derive(Debug)]
pub struct CropSession {
    engine: SelectionEngine,
    pipeline: Pipeline,
    display: DisplayConfig,
    layout: DisplayLayout,
}

impl CropSession {
    /// Decode `encoded` and open a session on it.
    pub async fn open(
        encoded: &[u8],
        decoder: &dyn RasterDecoder,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config.display.validate()?;
        config.select.validate()?;
        let pipeline = Pipeline::open(encoded, decoder).await?;
        Self::with_pipeline(pipeline, config)
    }

    pub fn from_raster(raster: Raster, config: SessionConfig) -> Result<Self, SessionError> {
        config.display.validate()?;
        let pipeline = Pipeline::from_raster(raster)?;
        Self::with_pipeline(pipeline, config)
    }

    fn with_pipeline(pipeline: Pipeline, config: SessionConfig) -> Result<Self, SessionError> {
        let layout = DisplayLayout::fit(pipeline.working().viewport(), &config.display);
        let engine = SelectionEngine::new(config.select, layout.canvas)?;
        Ok(Self {
            engine,
            pipeline,
            display: config.display,
            layout,
        })
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SelectionEngine {
        &mut self.engine
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn layout(&self) -> DisplayLayout {
        self.layout
    }

    pub fn selection(&self) -> Option<Rect> {
        self.engine.selection()
    }

    pub fn working(&self) -> &Raster {
        self.pipeline.working()
    }

    /// Register `listener` for both selection and pipeline signals.
    pub fn subscribe(&mut self, listener: impl FnMut(Signal) + 'static) -> SessionListener {
        let shared = Rc::new(RefCell::new(listener));
        let for_pipeline = Rc::clone(&shared);
        SessionListener {
            engine: self
                .engine
                .subscribe(move |signal| (&mut *shared.borrow_mut())(signal)),
            pipeline: self
                .pipeline
                .subscribe(move |signal| (&mut *for_pipeline.borrow_mut())(signal)),
        }
    }

    pub fn unsubscribe(&mut self, listener: SessionListener) -> bool {
        let engine = self.engine.unsubscribe(listener.engine);
        let pipeline = self.pipeline.unsubscribe(listener.pipeline);
        engine && pipeline
    }

    pub fn toggle_select(&mut self) {
        self.engine.toggle();
    }

    /// Pointer down on the canvas: inside the selection starts a move,
    /// anywhere else starts a new rectangle.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        let kind = match self.engine.selection() {
            Some(rect) if rect.width > 0.0 && rect.height > 0.0 && rect.contains(point) => DragKind::Move,
            _ => DragKind::New,
        };
        self.engine.begin_drag(point, kind)
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.engine.update_drag(point)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.engine.end_drag()
    }

    pub fn key_down(&mut self, code: u32) -> bool {
        self.engine.on_key_down(code)
    }

    pub fn key_up(&mut self, code: u32) -> bool {
        self.engine.on_key_up(code)
    }

    /// Crop the image to the current selection.
    ///
    /// A missing or degenerate selection is not an error: the session stays
    /// as it was and the outcome is [`CommitOutcome::Skipped`].
    pub async fn commit_crop(&mut self) -> Result<CommitOutcome, SessionError> {
        let native = match self.engine.commit_selection(self.layout.image, self.layout.scale) {
            Ok(native) => native,
            Err(reason) => return Ok(CommitOutcome::Skipped(reason)),
        };
        let crop = Crop::from_selection(native, self.pipeline.working().viewport()).map_err(PipelineError::from)?;
        self.pipeline.append(crop.into()).await?;
        self.relayout();
        Ok(CommitOutcome::Applied(crop))
    }

    pub async fn rotate(&mut self, angle: f64) -> Result<(), SessionError> {
        let rotate = Rotate::new(angle).map_err(PipelineError::from)?;
        self.append(rotate.into()).await
    }

    pub async fn flip(&mut self, horizontal: bool, vertical: bool) -> Result<(), SessionError> {
        self.append(Flip { horizontal, vertical }.into()).await
    }

    async fn append(&mut self, transformation: Transformation) -> Result<(), SessionError> {
        self.pipeline.append(transformation).await?;
        self.relayout();
        Ok(())
    }

    pub async fn undo(&mut self) -> Result<(), SessionError> {
        self.pipeline.undo().await?;
        self.relayout();
        Ok(())
    }

    pub async fn redo(&mut self) -> Result<(), SessionError> {
        self.pipeline.redo().await?;
        self.relayout();
        Ok(())
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, SessionError> {
        Ok(self.pipeline.export(format)?)
    }

    fn relayout(&mut self) {
        self.layout = DisplayLayout::fit(self.pipeline.working().viewport(), &self.display);
        self.engine.set_viewport(self.layout.canvas);
        self.engine.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::raster::{encode_png, ImageDecoder, RasterError};
    use crate::signal::testing::recorder;
    use futures::executor::block_on;

    fn config(max_width: f64, max_height: f64) -> SessionConfig {
        SessionConfig {
            display: DisplayConfig::new().with_max_size(max_width, max_height),
            select: SelectConfig::default(),
        }
    }

    fn session() -> CropSession {
        CropSession::from_raster(Raster::filled(800, 600, [40, 80, 120]), config(400.0, 300.0)).unwrap()
    }

    #[test]
    fn test_layout_feeds_engine_viewport() {
        let s = session();
        assert_eq!(s.layout().scale, 0.5);
        assert_eq!(s.engine().viewport(), Viewport::new(400.0, 300.0));
    }

    #[test]
    fn test_commit_crop() {
        let mut s = session();
        s.toggle_select();
        s.engine_mut().draw(Rect::new(100.0, 50.0, 200.0, 150.0), false);

        let (log, listener) = recorder();
        s.subscribe(listener);
        let outcome = block_on(s.commit_crop()).unwrap();

        assert!(matches!(outcome, CommitOutcome::Applied(_)));
        assert_eq!((s.working().width, s.working().height), (400, 300));
        assert_eq!(s.layout().scale, 1.0);
        assert_eq!(s.selection(), None);
        assert_eq!(
            *log.borrow(),
            vec![Signal::TransformationApplied, Signal::SelectionChanged]
        );
    }

    #[test]
    fn test_commit_without_selection_is_skipped() {
        let mut s = session();
        let outcome = block_on(s.commit_crop()).unwrap();
        assert_eq!(outcome, CommitOutcome::Skipped(SelectError::NoSelection));
        assert!(s.pipeline().transformations().is_empty());
    }

    #[test]
    fn test_commit_degenerate_is_skipped() {
        let mut s = session();
        s.toggle_select();
        let outcome = block_on(s.commit_crop()).unwrap();
        assert!(matches!(outcome, CommitOutcome::Skipped(SelectError::Degenerate { .. })));
        assert!(s.pipeline().transformations().is_empty());
        assert!(s.engine().has_focus());
    }

    #[test]
    fn test_commit_in_letterbox_is_skipped() {
        let mut s = CropSession::from_raster(Raster::filled(800, 400, [0, 0, 0]), config(400.0, 400.0)).unwrap();
        assert_eq!(s.layout().image, Rect::new(0.0, 100.0, 400.0, 200.0));
        s.toggle_select();
        s.engine_mut().draw(Rect::new(10.0, 320.0, 50.0, 50.0), true);

        let (log, listener) = recorder();
        s.subscribe(listener);
        let outcome = block_on(s.commit_crop()).unwrap();

        assert!(matches!(outcome, CommitOutcome::Skipped(SelectError::Degenerate { .. })));
        assert!(s.pipeline().transformations().is_empty());
        assert!(!s.pipeline().can_undo());
        assert_eq!((s.working().width, s.working().height), (800, 400));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_rotate_relayouts_and_releases() {
        let mut s = CropSession::from_raster(Raster::filled(80, 60, [0, 0, 0]), SessionConfig::default()).unwrap();
        s.toggle_select();
        block_on(s.rotate(90.0)).unwrap();

        assert_eq!(s.engine().viewport(), Viewport::new(60.0, 80.0));
        assert!(!s.engine().has_focus());

        block_on(s.undo()).unwrap();
        assert_eq!(s.engine().viewport(), Viewport::new(80.0, 60.0));
        block_on(s.redo()).unwrap();
        assert_eq!(s.engine().viewport(), Viewport::new(60.0, 80.0));
    }

    #[test]
    fn test_flip_and_export() {
        let mut s = CropSession::from_raster(Raster::new(2, 1, vec![1, 1, 1, 2, 2, 2]), SessionConfig::default()).unwrap();
        block_on(s.flip(true, false)).unwrap();
        assert_eq!(s.working().pixels, vec![2, 2, 2, 1, 1, 1]);
        assert!(s.export(ExportFormat::Png).is_ok());
    }

    #[test]
    fn test_pointer_down_moves_or_draws() {
        let mut s = session();
        s.toggle_select();
        s.engine_mut().draw(Rect::new(100.0, 100.0, 50.0, 50.0), true);

        assert!(s.pointer_down(Point::new(120.0, 120.0)));
        s.pointer_move(Point::new(130.0, 110.0));
        assert!(s.pointer_up());
        assert_eq!(s.selection(), Some(Rect::new(110.0, 90.0, 50.0, 50.0)));

        assert!(s.pointer_down(Point::new(10.0, 10.0)));
        s.pointer_move(Point::new(40.0, 30.0));
        s.pointer_up();
        assert_eq!(s.selection(), Some(Rect::new(10.0, 10.0, 30.0, 20.0)));
    }

    #[test]
    fn test_open_and_decode_failure() {
        let bytes = encode_png(&Raster::filled(10, 10, [0, 0, 0])).unwrap();
        let s = block_on(CropSession::open(&bytes, &ImageDecoder, SessionConfig::default())).unwrap();
        assert_eq!(s.layout().canvas, Viewport::new(10.0, 10.0));

        let result = block_on(CropSession::open(b"garbage", &ImageDecoder, SessionConfig::default()));
        assert!(matches!(
            result,
            Err(SessionError::Pipeline(PipelineError::Decode(RasterError::Decode(_))))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SessionConfig::default();
        config.select.min_width = 0.0;
        let result = CropSession::from_raster(Raster::filled(4, 4, [0, 0, 0]), config);
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn test_unsubscribe() {
        let mut s = session();
        let (log, listener) = recorder();
        let id = s.subscribe(listener);
        assert!(s.unsubscribe(id));

        s.toggle_select();
        s.toggle_select();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_config_deserialize() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"display": {"maxWidth": 500}, "select": {"ratio": 1.0}}"#).unwrap();
        assert_eq!(config.display.max_width, Some(500.0));
        assert_eq!(config.select.ratio, Some(1.0));
        assert_eq!(config.select.min_width, 1.0);
    }
}
