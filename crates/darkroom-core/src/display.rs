//! Canvas fitting: where and how large the working raster is displayed.
//!
//! The displayed image keeps its aspect ratio. An optional canvas ratio
//! letterboxes it first; each axis is then scaled down to its maximum or up
//! to its minimum and the smaller factor wins. The image is centred on the
//! canvas, whose size becomes the selection engine's viewport.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Viewport};
use crate::select::{positive, ConfigError};

/// Canvas limits, in display pixels. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayConfig {
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    /// Canvas width/height ratio.
    pub ratio: Option<f64>,
}

impl DisplayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(mut self, max_width: f64, max_height: f64) -> Self {
        self.max_width = Some(max_width);
        self.max_height = Some(max_height);
        self
    }

    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = Some(min_width);
        self.min_height = Some(min_height);
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("minWidth", self.min_width),
            ("minHeight", self.min_height),
            ("maxWidth", self.max_width),
            ("maxHeight", self.max_height),
        ];
        for (field, value) in limits {
            if let Some(value) = value {
                positive(field, value)?;
            }
        }
        if let Some(ratio) = self.ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(ConfigError::InvalidRatio(ratio));
            }
        }

        let pairs = [
            ("minWidth", self.min_width, "maxWidth", self.max_width),
            ("minHeight", self.min_height, "maxHeight", self.max_height),
        ];
        for (min_field, min, max_field, max) in pairs {
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(ConfigError::MinExceedsMax {
                        min_field,
                        min,
                        max_field,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Result of fitting a raster viewport onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayLayout {
    /// Canvas size; the coordinate space of the selection.
    pub canvas: Viewport,
    /// Where the image sits on the canvas.
    pub image: Rect,
    /// Display pixels per native pixel.
    pub scale: f64,
}

fn axis_scale(size: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    match (min, max) {
        (_, Some(max)) if max < size => max / size,
        (Some(min), _) if min > size => min / size,
        _ => 1.0,
    }
}

impl DisplayLayout {
    pub fn fit(viewport: Viewport, config: &DisplayConfig) -> Self {
        let (mut box_w, mut box_h) = (viewport.width, viewport.height);
        if let Some(ratio) = config.ratio {
            let current = box_w / box_h;
            if current > ratio {
                box_h = box_w / ratio;
            } else if current < ratio {
                box_w = box_h * ratio;
            }
        }

        let scale_x = axis_scale(box_w, config.min_width, config.max_width);
        let scale_y = axis_scale(box_h, config.min_height, config.max_height);
        let scale = scale_x.min(scale_y);

        let canvas = Viewport::new(
            config.max_width.unwrap_or(box_w * scale),
            config.max_height.unwrap_or(box_h * scale),
        );
        let width = viewport.width * scale;
        let height = viewport.height * scale;
        let image = Rect::new((canvas.width - width) / 2.0, (canvas.height - height) / 2.0, width, height);

        log::debug!(
            "layout: canvas {}x{}, image {}x{} at ({}, {}), scale {}",
            canvas.width,
            canvas.height,
            width,
            height,
            image.left,
            image.top,
            scale
        );
        Self { canvas, image, scale }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_limits_is_identity() {
        let layout = DisplayLayout::fit(Viewport::new(800.0, 600.0), &DisplayConfig::default());
        assert_eq!(layout.canvas, Viewport::new(800.0, 600.0));
        assert_eq!(layout.image, Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(layout.scale, 1.0);
    }

    #[test]
    fn test_scale_down_to_max() {
        let config = DisplayConfig::new().with_max_size(400.0, 400.0);
        let layout = DisplayLayout::fit(Viewport::new(800.0, 400.0), &config);

        assert_eq!(layout.scale, 0.5);
        assert_eq!(layout.canvas, Viewport::new(400.0, 400.0));
        assert_eq!(layout.image, Rect::new(0.0, 100.0, 400.0, 200.0));
    }

    #[test]
    fn test_scale_up_to_min() {
        let config = DisplayConfig::new().with_min_size(200.0, 200.0);
        let layout = DisplayLayout::fit(Viewport::new(100.0, 50.0), &config);

        // x needs 2, y needs 4; the smaller keeps the image inside
        assert_eq!(layout.scale, 2.0);
        assert_eq!(layout.canvas, Viewport::new(200.0, 100.0));
        assert_eq!(layout.image, Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_ratio_letterboxes() {
        let config = DisplayConfig::new().with_ratio(1.0);
        let layout = DisplayLayout::fit(Viewport::new(200.0, 100.0), &config);

        assert_eq!(layout.canvas, Viewport::new(200.0, 200.0));
        assert_eq!(layout.image, Rect::new(0.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn test_validate() {
        assert!(DisplayConfig::default().validate().is_ok());
        assert!(matches!(
            DisplayConfig::new().with_max_size(0.0, 10.0).validate(),
            Err(ConfigError::NonPositive { field: "maxWidth", .. })
        ));
        assert!(matches!(
            DisplayConfig::new()
                .with_min_size(500.0, 10.0)
                .with_max_size(400.0, 400.0)
                .validate(),
            Err(ConfigError::MinExceedsMax { min_field: "minWidth", .. })
        ));
        assert!(DisplayConfig::new().with_ratio(-1.0).validate().is_err());
    }

    #[test]
    fn test_deserialize() {
        let config: DisplayConfig = serde_json::from_str(r#"{"maxWidth": 640, "maxHeight": 480}"#).unwrap();
        assert_eq!(config, DisplayConfig::new().with_max_size(640.0, 480.0));
    }
}
