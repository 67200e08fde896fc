//! Selection configuration and its validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration values. Raised only at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A minimum dimension is zero, negative or not finite.
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// The aspect ratio is zero, negative or not finite.
    #[error("ratio must be a positive finite number, got {0}")]
    InvalidRatio(f64),

    /// A minimum exceeds the matching maximum.
    #[error("{min_field} ({min}) exceeds {max_field} ({max})")]
    MinExceedsMax {
        min_field: &'static str,
        min: f64,
        max_field: &'static str,
        max: f64,
    },
}

/// Options recognized by the selection engine.
///
/// Field names follow the page-side widget (`minWidth`, `quickSelectKey`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectConfig {
    /// Minimum selection width in viewport pixels.
    pub min_width: f64,
    /// Minimum selection height in viewport pixels.
    pub min_height: f64,
    /// Locked width/height ratio, if any.
    pub ratio: Option<f64>,
    /// Key code that toggles quick select while held, if enabled.
    pub quick_select_key: Option<u32>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            min_width: 1.0,
            min_height: 1.0,
            ratio: None,
            quick_select_key: None,
        }
    }
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn with_quick_select_key(mut self, key: u32) -> Self {
        self.quick_select_key = Some(key);
        self
    }

    /// Check every value; the engine refuses to start on failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("minWidth", self.min_width)?;
        positive("minHeight", self.min_height)?;
        if let Some(ratio) = self.ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(ConfigError::InvalidRatio(ratio));
            }
        }
        Ok(())
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
