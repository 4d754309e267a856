#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn canvas_approx_eq(a: CanvasPoint, b: CanvasPoint) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn screen_approx_eq(a: ScreenPoint, b: ScreenPoint) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point arithmetic ---

#[test]
fn screen_points_subtract_to_delta() {
    let d = ScreenPoint::new(10.0, 4.0) - ScreenPoint::new(3.0, 6.0);
    assert_eq!(d, ScreenDelta::new(7.0, -2.0));
}

#[test]
fn canvas_point_plus_delta() {
    let p = CanvasPoint::new(1.0, 2.0) + CanvasDelta::new(0.5, -1.0);
    assert_eq!(p, CanvasPoint::new(1.5, 1.0));
}

#[test]
fn canvas_point_add_assign() {
    let mut p = CanvasPoint::new(1.0, 2.0);
    p += CanvasDelta::new(3.0, 3.0);
    assert_eq!(p, CanvasPoint::new(4.0, 5.0));
}

#[test]
fn screen_delta_length() {
    assert!(approx_eq(ScreenDelta::new(3.0, 4.0).length(), 5.0));
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

// --- Free functions ---

#[test]
fn to_canvas_space_formula() {
    let p = to_canvas_space(ScreenPoint::new(120.0, 60.0), ScreenDelta::new(20.0, 10.0), 2.0);
    assert!(canvas_approx_eq(p, CanvasPoint::new(50.0, 25.0)));
}

#[test]
fn to_screen_space_formula() {
    let p = to_screen_space(CanvasPoint::new(5.0, 5.0), ScreenDelta::new(20.0, 10.0), 3.0);
    assert!(screen_approx_eq(p, ScreenPoint::new(35.0, 25.0)));
}

// --- screen_to_canvas ---

#[test]
fn screen_to_canvas_identity() {
    let cam = Camera::default();
    let p = cam.screen_to_canvas(ScreenPoint::new(50.0, 75.0));
    assert!(canvas_approx_eq(p, CanvasPoint::new(50.0, 75.0)));
}

#[test]
fn screen_to_canvas_with_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 4.0 };
    let p = cam.screen_to_canvas(ScreenPoint::new(40.0, 80.0));
    assert!(canvas_approx_eq(p, CanvasPoint::new(10.0, 20.0)));
}

#[test]
fn screen_to_canvas_with_pan() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 1.0 };
    let p = cam.screen_to_canvas(ScreenPoint::new(100.0, 50.0));
    assert!(canvas_approx_eq(p, CanvasPoint::new(0.0, 0.0)));
}

#[test]
fn screen_to_canvas_origin_with_pan_and_zoom() {
    let cam = Camera { pan_x: 50.0, pan_y: 30.0, zoom: 2.0 };
    let p = cam.screen_to_canvas(ScreenPoint::new(0.0, 0.0));
    assert!(canvas_approx_eq(p, CanvasPoint::new(-25.0, -15.0)));
}

// --- canvas_to_screen ---

#[test]
fn canvas_to_screen_with_zoom() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    let p = cam.canvas_to_screen(CanvasPoint::new(10.0, 20.0));
    assert!(screen_approx_eq(p, ScreenPoint::new(20.0, 40.0)));
}

#[test]
fn roundtrip_screen_canvas_screen() {
    let cam = Camera { pan_x: -37.5, pan_y: 12.25, zoom: 0.35 };
    let screen = ScreenPoint::new(412.0, 219.0);
    let back = cam.canvas_to_screen(cam.screen_to_canvas(screen));
    assert!(screen_approx_eq(screen, back));
}

// --- deltas and panning ---

#[test]
fn screen_delta_to_canvas_divides_by_zoom() {
    let cam = Camera { pan_x: 999.0, pan_y: -5.0, zoom: 2.5 };
    let d = cam.screen_delta_to_canvas(ScreenDelta::new(10.0, -5.0));
    assert!(approx_eq(d.dx, 4.0));
    assert!(approx_eq(d.dy, -2.0));
}

#[test]
fn pan_by_adds_raw_screen_delta() {
    let mut cam = Camera { pan_x: 10.0, pan_y: 10.0, zoom: 3.0 };
    cam.pan_by(ScreenDelta::new(5.0, -20.0));
    assert_eq!(cam.pan_x, 15.0);
    assert_eq!(cam.pan_y, -10.0);
    assert_eq!(cam.zoom, 3.0);
}
