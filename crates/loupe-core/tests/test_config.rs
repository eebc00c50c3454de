use loupe_core::config::{
    ConfidenceBands, InputConfig, LayoutConfig, ReviewConfig, SyncConfig, ZoomConfig,
};
use loupe_core::consts::*;
use loupe_core::error::LoupeError;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_default_zoom_limits() {
    let z = ZoomConfig::default();
    assert_eq!(z.min_zoom, MIN_ZOOM);
    assert_eq!(z.max_zoom, MAX_ZOOM);
    assert_eq!(z.step, 1.1);
    assert_eq!(z.clamp(100.0), MAX_ZOOM);
    assert_eq!(z.clamp(0.0), MIN_ZOOM);
    assert_eq!(z.clamp(2.5), 2.5);
}

#[test]
fn test_default_input_timings() {
    let i = InputConfig::default();
    assert_eq!(i.hold_threshold(), Duration::from_millis(200));
    assert_eq!(i.tick_interval(), Duration::from_millis(120));
    assert_eq!(i.double_tap_window(), Duration::from_millis(250));
    assert_eq!(i.hold_step, 1.012);
}

#[test]
fn test_default_sync_rates() {
    let s = SyncConfig::default();
    assert_eq!(s.scroll_throttle(), Duration::from_millis(16));
    assert_eq!(s.resize_debounce(), Duration::from_millis(100));
}

#[test]
fn test_default_layout_and_bands() {
    let l = LayoutConfig::default();
    assert_eq!(l.ring_count, DEFAULT_LABEL_RING_COUNT);
    assert_eq!(l.angle_step_deg, 15.0);
    assert_eq!(l.min_buffer_px, 4.0);

    let b = ConfidenceBands::default();
    assert_eq!(b.high, 0.8);
    assert_eq!(b.medium, 0.5);
}

#[test]
fn test_default_config_is_valid() {
    assert!(ReviewConfig::default().validate().is_ok());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_inverted_zoom_limits() {
    let mut config = ReviewConfig::default();
    config.zoom.min_zoom = 5.0;
    config.zoom.max_zoom = 2.0;
    assert!(matches!(config.validate(), Err(LoupeError::Config(_))));
}

#[test]
fn test_unvalidated_limits_clamp_without_panicking() {
    let inverted = ZoomConfig {
        min_zoom: 5.0,
        max_zoom: 1.0,
        step: 1.2,
    };
    assert_eq!(inverted.bounds(), (1.0, 5.0));
    assert_eq!(inverted.clamp(0.2), 1.0);
    assert_eq!(inverted.clamp(9.0), 5.0);

    let broken = ZoomConfig {
        min_zoom: f64::NAN,
        max_zoom: -3.0,
        step: 1.2,
    };
    assert_eq!(broken.bounds(), (MIN_ZOOM, MAX_ZOOM));
    assert_eq!(broken.clamp(2.0), 2.0);
    assert_eq!(broken.clamp(f64::NAN), MIN_ZOOM);
}

#[test]
fn test_validate_rejects_non_positive_min_zoom() {
    let mut config = ReviewConfig::default();
    config.zoom.min_zoom = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_shrinking_steps() {
    let mut config = ReviewConfig::default();
    config.zoom.step = 0.9;
    assert!(config.validate().is_err());

    let mut config = ReviewConfig::default();
    config.input.hold_step = 1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_tick_interval() {
    let mut config = ReviewConfig::default();
    config.input.tick_interval_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_search_steps() {
    let mut config = ReviewConfig::default();
    config.layout.angle_step_deg = 0.0;
    assert!(config.validate().is_err());

    let mut config = ReviewConfig::default();
    config.layout.angle_step_deg = f64::NAN;
    assert!(config.validate().is_err());

    let mut config = ReviewConfig::default();
    config.layout.radius_step = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_inverted_bands() {
    let mut config = ReviewConfig::default();
    config.confidence.medium = 0.9;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("medium confidence band"));
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn test_config_roundtrip() {
    let mut config = ReviewConfig::default();
    config.zoom.max_zoom = 8.0;
    config.input.double_tap_ms = 300;
    config.layout.ring_count = 12;

    let json = serde_json::to_string(&config).unwrap();
    let parsed: ReviewConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_config_fills_defaults() {
    let parsed: ReviewConfig =
        serde_json::from_str(r#"{"zoom":{"max_zoom":4.0},"sync":{}}"#).unwrap();
    assert_eq!(parsed.zoom.max_zoom, 4.0);
    assert_eq!(parsed.zoom.min_zoom, MIN_ZOOM);
    assert_eq!(parsed.sync, SyncConfig::default());
    assert_eq!(parsed.layout, LayoutConfig::default());
}

#[test]
fn test_empty_config_is_default() {
    let parsed: ReviewConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(parsed, ReviewConfig::default());
}
