//! Darkroom Core - crop selection and transformation pipeline
//!
//! This crate provides the editing core behind the Darkroom image widget:
//! the selection-rectangle engine that turns pointer and key input into a
//! constrained crop rectangle, and the pipeline that applies and replays
//! transformations (crop, rotate, flip) over the decoded image.
//!
//! Everything is single-threaded. The only asynchronous step is decoding; a
//! host drives the futures returned by [`Pipeline`] and [`CropSession`].

pub mod display;
pub mod geometry;
pub mod pipeline;
pub mod raster;
pub mod select;
pub mod session;
pub mod signal;
pub mod transform;

pub use display::{DisplayConfig, DisplayLayout};
pub use geometry::{Point, Rect, Viewport};
pub use pipeline::{Pipeline, PipelineError};
pub use raster::{ExportFormat, ImageDecoder, Raster, RasterDecoder, RasterError};
pub use select::{
    ConfigError, DragKind, DragMode, Handle, HandleScale, SelectConfig, SelectError, SelectionEngine,
};
pub use session::{CommitOutcome, CropSession, SessionConfig, SessionError, SessionListener};
pub use signal::{ListenerId, Signal, Signals};
pub use transform::{Applied, Crop, Flip, Rotate, TransformError, Transformation};
