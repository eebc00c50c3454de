use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{LoupeError, Result};

/// Top-level engine configuration, serialized as TOML by the binaries.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewConfig {
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub confidence: ConfidenceBands,
}

impl ReviewConfig {
    /// Reject configurations the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        let z = &self.zoom;
        if !(z.min_zoom > 0.0 && z.min_zoom.is_finite() && z.max_zoom.is_finite()) {
            return Err(LoupeError::Config(format!(
                "zoom limits must be positive and finite (got {}..{})",
                z.min_zoom, z.max_zoom
            )));
        }
        if z.min_zoom > z.max_zoom {
            return Err(LoupeError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                z.min_zoom, z.max_zoom
            )));
        }
        if z.step <= 1.0 {
            return Err(LoupeError::Config(format!(
                "zoom step must be greater than 1.0 (got {})",
                z.step
            )));
        }
        if self.input.hold_step <= 1.0 {
            return Err(LoupeError::Config(format!(
                "hold step must be greater than 1.0 (got {})",
                self.input.hold_step
            )));
        }
        if self.input.tick_interval_ms == 0 {
            return Err(LoupeError::Config("tick interval must be non-zero".into()));
        }
        let l = &self.layout;
        if !(l.radius_step > 0.0 && l.angle_step_deg > 0.0 && l.angle_step_deg <= 360.0) {
            return Err(LoupeError::Config(format!(
                "label search steps must be positive (radius {}, angle {})",
                l.radius_step, l.angle_step_deg
            )));
        }
        if self.confidence.medium > self.confidence.high {
            return Err(LoupeError::Config(format!(
                "medium confidence band {} exceeds high band {}",
                self.confidence.medium, self.confidence.high
            )));
        }
        Ok(())
    }
}

/// Zoom limits and discrete step.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ZoomConfig {
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    /// Factor applied by one zoom-in/zoom-out command.
    #[serde(default = "default_zoom_step")]
    pub step: f64,
}

fn default_min_zoom() -> f64 {
    MIN_ZOOM
}
fn default_max_zoom() -> f64 {
    MAX_ZOOM
}
fn default_zoom_step() -> f64 {
    DEFAULT_ZOOM_STEP
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            step: DEFAULT_ZOOM_STEP,
        }
    }
}

impl ZoomConfig {
    /// Usable `(min, max)` limits. Non-positive or non-finite bounds fall
    /// back to the defaults and inverted bounds are swapped.
    pub fn bounds(&self) -> (f64, f64) {
        let usable = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let lo = usable(self.min_zoom, MIN_ZOOM);
        let hi = usable(self.max_zoom, MAX_ZOOM);
        if lo <= hi {
            (lo, hi)
        } else {
            (hi, lo)
        }
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        let (lo, hi) = self.bounds();
        if zoom.is_nan() {
            return lo;
        }
        zoom.clamp(lo, hi)
    }
}

/// Timing thresholds for the keyboard gesture recognizer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_hold_threshold_ms")]
    pub hold_threshold_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_double_tap_ms")]
    pub double_tap_ms: u64,
    /// Factor applied per tick while a zoom key is held.
    #[serde(default = "default_hold_step")]
    pub hold_step: f64,
}

fn default_hold_threshold_ms() -> u64 {
    DEFAULT_HOLD_THRESHOLD_MS
}
fn default_tick_interval_ms() -> u64 {
    DEFAULT_HOLD_TICK_MS
}
fn default_double_tap_ms() -> u64 {
    DEFAULT_DOUBLE_TAP_MS
}
fn default_hold_step() -> f64 {
    DEFAULT_HOLD_STEP
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            hold_threshold_ms: DEFAULT_HOLD_THRESHOLD_MS,
            tick_interval_ms: DEFAULT_HOLD_TICK_MS,
            double_tap_ms: DEFAULT_DOUBLE_TAP_MS,
            hold_step: DEFAULT_HOLD_STEP,
        }
    }
}

impl InputConfig {
    pub fn hold_threshold(&self) -> Duration {
        Duration::from_millis(self.hold_threshold_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms)
    }
}

/// Rate limits for the view synchronization channel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    #[serde(default = "default_scroll_throttle_ms")]
    pub scroll_throttle_ms: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

fn default_scroll_throttle_ms() -> u64 {
    DEFAULT_SCROLL_THROTTLE_MS
}
fn default_resize_debounce_ms() -> u64 {
    DEFAULT_RESIZE_DEBOUNCE_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

impl SyncConfig {
    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Parameters of the radial label search.
///
/// None of these values are tuned; they are exposed so that dense crowd
/// photos can trade search time against placement quality.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Gap between the face box's half-extent and the first ring.
    #[serde(default = "default_radius_margin")]
    pub radius_margin: f64,
    #[serde(default = "default_radius_step")]
    pub radius_step: f64,
    #[serde(default = "default_ring_count")]
    pub ring_count: usize,
    #[serde(default = "default_angle_step_deg")]
    pub angle_step_deg: f64,
    #[serde(default = "default_min_buffer_px")]
    pub min_buffer_px: f64,
    /// Buffer as a fraction of the displayed image width.
    #[serde(default = "default_buffer_ratio")]
    pub buffer_ratio: f64,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_fallback_gap")]
    pub fallback_gap: f64,
}

fn default_radius_margin() -> f64 {
    DEFAULT_LABEL_RADIUS_MARGIN
}
fn default_radius_step() -> f64 {
    DEFAULT_LABEL_RADIUS_STEP
}
fn default_ring_count() -> usize {
    DEFAULT_LABEL_RING_COUNT
}
fn default_angle_step_deg() -> f64 {
    DEFAULT_LABEL_ANGLE_STEP_DEG
}
fn default_min_buffer_px() -> f64 {
    DEFAULT_LABEL_MIN_BUFFER_PX
}
fn default_buffer_ratio() -> f64 {
    DEFAULT_LABEL_BUFFER_RATIO
}
fn default_padding() -> f64 {
    DEFAULT_LABEL_PADDING
}
fn default_fallback_gap() -> f64 {
    DEFAULT_LABEL_FALLBACK_GAP
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_margin: DEFAULT_LABEL_RADIUS_MARGIN,
            radius_step: DEFAULT_LABEL_RADIUS_STEP,
            ring_count: DEFAULT_LABEL_RING_COUNT,
            angle_step_deg: DEFAULT_LABEL_ANGLE_STEP_DEG,
            min_buffer_px: DEFAULT_LABEL_MIN_BUFFER_PX,
            buffer_ratio: DEFAULT_LABEL_BUFFER_RATIO,
            padding: DEFAULT_LABEL_PADDING,
            fallback_gap: DEFAULT_LABEL_FALLBACK_GAP,
        }
    }
}

/// Score thresholds separating the three confidence bands.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceBands {
    #[serde(default = "default_confidence_high")]
    pub high: f64,
    #[serde(default = "default_confidence_medium")]
    pub medium: f64,
}

fn default_confidence_high() -> f64 {
    DEFAULT_CONFIDENCE_HIGH
}
fn default_confidence_medium() -> f64 {
    DEFAULT_CONFIDENCE_MEDIUM
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            high: DEFAULT_CONFIDENCE_HIGH,
            medium: DEFAULT_CONFIDENCE_MEDIUM,
        }
    }
}
