//! Canvas configuration: card footprint, zoom limits, gesture thresholds.
//!
//! DESIGN
//! ======
//! One `CanvasConfig` value is owned by the engine and handed by reference to
//! every component that needs a size or a limit, so the card footprint used
//! by group bounds and by fit-to-content can never drift apart.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::doc::CardSize;
use crate::error::CanvasError;

/// Parameters for one flavour of fit-to-view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    /// Screen padding kept on each side of the fitted box, in pixels.
    pub padding: f64,
    /// Largest zoom the fit may choose.
    pub max_zoom: f64,
    /// Smallest zoom the fit may choose.
    pub min_zoom: f64,
    /// Zoom used when every placement shares one position.
    pub degenerate_zoom: f64,
}

impl FitParams {
    #[must_use]
    pub fn content() -> Self {
        Self {
            padding: FIT_CONTENT_PADDING,
            max_zoom: FIT_CONTENT_MAX_ZOOM,
            min_zoom: FIT_CONTENT_MIN_ZOOM,
            degenerate_zoom: FIT_CONTENT_DEGENERATE_ZOOM,
        }
    }

    #[must_use]
    pub fn selection() -> Self {
        Self {
            padding: FIT_SELECTION_PADDING,
            max_zoom: FIT_SELECTION_MAX_ZOOM,
            min_zoom: FIT_SELECTION_MIN_ZOOM,
            degenerate_zoom: FIT_SELECTION_DEGENERATE_ZOOM,
        }
    }
}

/// Tunable sizes, limits, and durations for a canvas session.
///
/// Every field is optional when decoding; absent fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub card_width: f64,
    pub card_height: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub wheel_step_slow: f64,
    pub wheel_step_normal: f64,
    pub wheel_step_fast: f64,
    pub wheel_slow_below: f64,
    pub wheel_fast_above: f64,
    pub button_zoom_factor: f64,
    pub fit_content: FitParams,
    pub fit_selection: FitParams,
    pub drag_threshold_px: f64,
    pub touch_slop_px: f64,
    pub long_press_ms: u32,
    pub haptic_pulse_ms: u32,
    pub highlight_ms: u32,
    pub duplicate_offset: f64,
    pub modal_z_base: i32,
    pub modal_z_step: i32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            card_width: CARD_WIDTH,
            card_height: CARD_HEIGHT,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            wheel_step_slow: WHEEL_STEP_SLOW,
            wheel_step_normal: WHEEL_STEP_NORMAL,
            wheel_step_fast: WHEEL_STEP_FAST,
            wheel_slow_below: WHEEL_SLOW_BELOW,
            wheel_fast_above: WHEEL_FAST_ABOVE,
            button_zoom_factor: BUTTON_ZOOM_FACTOR,
            fit_content: FitParams::content(),
            fit_selection: FitParams::selection(),
            drag_threshold_px: DRAG_THRESHOLD_PX,
            touch_slop_px: TOUCH_SLOP_PX,
            long_press_ms: LONG_PRESS_MS,
            haptic_pulse_ms: HAPTIC_PULSE_MS,
            highlight_ms: HIGHLIGHT_MS,
            duplicate_offset: DUPLICATE_OFFSET,
            modal_z_base: MODAL_Z_BASE,
            modal_z_step: MODAL_Z_STEP,
        }
    }
}

impl CanvasConfig {
    /// Build a config from a JSON object of overrides.
    ///
    /// Missing keys keep their defaults. The result is validated before it
    /// is returned.
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would let the viewport math divide by zero or
    /// produce non-finite numbers.
    pub fn validate(&self) -> Result<(), CanvasError> {
        let floats = [
            ("card_width", self.card_width),
            ("card_height", self.card_height),
            ("zoom_min", self.zoom_min),
            ("zoom_max", self.zoom_max),
            ("wheel_step_slow", self.wheel_step_slow),
            ("wheel_step_normal", self.wheel_step_normal),
            ("wheel_step_fast", self.wheel_step_fast),
            ("wheel_slow_below", self.wheel_slow_below),
            ("wheel_fast_above", self.wheel_fast_above),
            ("button_zoom_factor", self.button_zoom_factor),
            ("drag_threshold_px", self.drag_threshold_px),
            ("touch_slop_px", self.touch_slop_px),
            ("duplicate_offset", self.duplicate_offset),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CanvasError::InvalidConfig(format!("{name} must be finite")));
        }
        if self.card_width <= 0.0 || self.card_height <= 0.0 {
            return Err(CanvasError::InvalidConfig("card size must be positive".into()));
        }
        if self.zoom_min <= 0.0 || self.zoom_min >= self.zoom_max {
            return Err(CanvasError::InvalidConfig(format!(
                "zoom range {}..{} is empty or non-positive",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.wheel_step_slow <= 0.0 || self.wheel_step_normal <= 0.0 || self.wheel_step_fast <= 0.0 {
            return Err(CanvasError::InvalidConfig("wheel steps must be positive".into()));
        }
        if self.button_zoom_factor <= 1.0 {
            return Err(CanvasError::InvalidConfig("button_zoom_factor must exceed 1.0".into()));
        }
        if self.drag_threshold_px < 0.0 || self.touch_slop_px < 0.0 {
            return Err(CanvasError::InvalidConfig("drag thresholds must not be negative".into()));
        }
        for (name, fit) in [("fit_content", &self.fit_content), ("fit_selection", &self.fit_selection)] {
            let values = [fit.padding, fit.max_zoom, fit.min_zoom, fit.degenerate_zoom];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(CanvasError::InvalidConfig(format!("{name} must be finite")));
            }
            if fit.padding < 0.0 || fit.min_zoom <= 0.0 || fit.min_zoom > fit.max_zoom || fit.degenerate_zoom <= 0.0 {
                return Err(CanvasError::InvalidConfig(format!("{name} has an invalid zoom range or padding")));
            }
        }
        Ok(())
    }

    /// The card footprint shared by group bounds and fit-to-view.
    #[must_use]
    pub fn card_size(&self) -> CardSize {
        CardSize { width: self.card_width, height: self.card_height }
    }

    /// Clamp `zoom` into the configured range.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }
}
