#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_card_size_is_280_by_200() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.card_width, 280.0);
    assert_eq!(cfg.card_height, 200.0);
}

#[test]
fn default_zoom_range() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.zoom_min, 0.1);
    assert_eq!(cfg.zoom_max, 5.0);
}

#[test]
fn default_fit_params_differ_between_content_and_selection() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.fit_content.max_zoom, 2.0);
    assert_eq!(cfg.fit_content.min_zoom, 0.1);
    assert_eq!(cfg.fit_content.degenerate_zoom, 1.0);
    assert_eq!(cfg.fit_selection.max_zoom, 3.0);
    assert_eq!(cfg.fit_selection.min_zoom, 0.2);
    assert_eq!(cfg.fit_selection.degenerate_zoom, 1.5);
    assert!(cfg.fit_selection.padding < cfg.fit_content.padding);
}

#[test]
fn default_long_press_is_500ms() {
    assert_eq!(CanvasConfig::default().long_press_ms, 500);
}

#[test]
fn default_validates() {
    assert!(CanvasConfig::default().validate().is_ok());
}

// =============================================================
// from_json
// =============================================================

#[test]
fn from_json_empty_object_is_default() {
    let cfg = CanvasConfig::from_json("{}").unwrap();
    assert_eq!(cfg, CanvasConfig::default());
}

#[test]
fn from_json_partial_override_keeps_other_defaults() {
    let cfg = CanvasConfig::from_json(r#"{ "card_width": 300, "long_press_ms": 650 }"#).unwrap();
    assert_eq!(cfg.card_width, 300.0);
    assert_eq!(cfg.long_press_ms, 650);
    assert_eq!(cfg.card_height, 200.0);
    assert_eq!(cfg.zoom_max, 5.0);
}

#[test]
fn from_json_malformed_is_decode_error() {
    let err = CanvasConfig::from_json("{ nope").unwrap_err();
    assert!(matches!(err, CanvasError::Decode(_)));
}

#[test]
fn from_json_rejects_zero_card_width() {
    let err = CanvasConfig::from_json(r#"{ "card_width": 0 }"#).unwrap_err();
    assert!(matches!(err, CanvasError::InvalidConfig(_)));
}

#[test]
fn from_json_rejects_inverted_zoom_range() {
    let err = CanvasConfig::from_json(r#"{ "zoom_min": 4.0, "zoom_max": 2.0 }"#).unwrap_err();
    assert!(err.to_string().contains("zoom range"));
}

#[test]
fn validate_rejects_non_finite() {
    let cfg = CanvasConfig { card_height: f64::NAN, ..CanvasConfig::default() };
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("card_height"));
}

#[test]
fn validate_rejects_button_factor_at_or_below_one() {
    let cfg = CanvasConfig { button_zoom_factor: 1.0, ..CanvasConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_inverted_fit_range() {
    let mut cfg = CanvasConfig::default();
    cfg.fit_selection.min_zoom = 4.0;
    assert!(cfg.validate().is_err());
}

// =============================================================
// clamp_zoom
// =============================================================

#[test]
fn clamp_zoom_bounds() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.clamp_zoom(0.01), 0.1);
    assert_eq!(cfg.clamp_zoom(12.0), 5.0);
    assert_eq!(cfg.clamp_zoom(1.3), 1.3);
}
