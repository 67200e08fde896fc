//! The transformation pipeline.
//!
//! Keeps the original decoded input, the authoritative `source` raster, the
//! displayed `working` copy and the ordered list of applied transformations.
//!
//! # Sequencing
//!
//! Every operation takes `&mut self` and awaits each transformation before
//! starting the next, so a replay is a strict left-to-right fold over the
//! list and nothing can start while another operation is pending. `source`
//! is only assigned once an operation has completed: dropping a pending
//! future leaves the pipeline exactly as it was.

use thiserror::Error;

use crate::raster::{ExportFormat, Raster, RasterDecoder, RasterError};
use crate::signal::{ListenerId, Signal, Signals};
use crate::transform::{Applied, TransformError, Transformation};

/// Error types for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The original input never materialized as a raster.
    #[error("Failed to decode the original image: {0}")]
    Decode(RasterError),

    /// Rendering or exporting a raster failed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A transformation failed; it was not recorded.
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Ordered, replayable list of transformations over one original raster.
#[derive(Debug)]
pub struct Pipeline {
    original: Raster,
    source: Raster,
    working: Raster,
    transformations: Vec<Transformation>,
    undone: Vec<Transformation>,
    signals: Signals,
}

impl Pipeline {
    /// Decode `encoded` and start a pipeline on it.
    pub async fn open(encoded: &[u8], decoder: &dyn RasterDecoder) -> Result<Self, PipelineError> {
        let raster = decoder.decode(encoded).await.map_err(|e| {
            log::warn!("decode failed: {e}");
            PipelineError::Decode(e)
        })?;
        Self::from_raster(raster)
    }

    /// Start a pipeline on an already decoded raster.
    pub fn from_raster(raster: Raster) -> Result<Self, PipelineError> {
        let working = raster.render()?;
        Ok(Self {
            source: raster.clone(),
            original: raster,
            working,
            transformations: Vec::new(),
            undone: Vec::new(),
            signals: Signals::new(),
        })
    }

    /// The unmodified input.
    pub fn original(&self) -> &Raster {
        &self.original
    }

    /// The authoritative raster all transformations so far produced.
    pub fn source(&self) -> &Raster {
        &self.source
    }

    /// Upright display copy of `source`.
    pub fn working(&self) -> &Raster {
        &self.working
    }

    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    pub fn can_undo(&self) -> bool {
        !self.transformations.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Signal) + 'static) -> ListenerId {
        self.signals.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.signals.unsubscribe(id)
    }

    /// Apply `transformation` to `source` and record it.
    ///
    /// On failure nothing is recorded and `source` is untouched. Clears the
    /// redo history.
    pub async fn append(&mut self, transformation: Transformation) -> Result<(), PipelineError> {
        self.apply(transformation).await?;
        self.undone.clear();
        Ok(())
    }

    async fn apply(&mut self, transformation: Transformation) -> Result<(), PipelineError> {
        let applied = transformation.apply(&self.source).await?;
        let source = match applied {
            Applied::Replaced(raster) => raster,
            Applied::Unchanged => self.source.clone(),
        };
        let working = source.render()?;

        self.source = source;
        self.working = working;
        self.transformations.push(transformation);
        self.signals.emit(Signal::TransformationApplied);
        Ok(())
    }

    /// Rebuild `source` from the original input by replaying every
    /// transformation in order.
    pub async fn reinitialize(&mut self) -> Result<(), PipelineError> {
        let source = replay(&self.original, &self.transformations).await?;
        self.reset_to(source)
    }

    fn reset_to(&mut self, source: Raster) -> Result<(), PipelineError> {
        let working = source.render()?;
        self.source = source;
        self.working = working;
        self.signals.emit(Signal::Reinitialized);
        Ok(())
    }

    /// Drop the last transformation and rebuild from the original.
    pub async fn undo(&mut self) -> Result<(), PipelineError> {
        let Some((_, kept)) = self.transformations.split_last() else {
            return Err(PipelineError::NothingToUndo);
        };
        let source = replay(&self.original, kept).await?;

        if let Some(last) = self.transformations.pop() {
            log::debug!("undo {}", last.name());
            self.undone.push(last);
        }
        self.reset_to(source)
    }

    /// Re-apply the most recently undone transformation.
    pub async fn redo(&mut self) -> Result<(), PipelineError> {
        let Some(next) = self.undone.last().cloned() else {
            return Err(PipelineError::NothingToRedo);
        };
        log::debug!("redo {}", next.name());
        self.apply(next).await?;
        self.undone.pop();
        Ok(())
    }

    /// Encode the working raster.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, PipelineError> {
        Ok(self.working.export(format)?)
    }
}

/// Fold `transformations` over a copy of `original`, one at a time.
async fn replay(original: &Raster, transformations: &[Transformation]) -> Result<Raster, PipelineError> {
    log::debug!("replaying {} transformation(s)", transformations.len());
    let mut source = original.clone();
    for transformation in transformations {
        if let Applied::Replaced(raster) = transformation.apply(&source).await? {
            source = raster;
        }
    }
    Ok(source)
}
