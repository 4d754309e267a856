//! Coordinate spaces and the pan/zoom camera.
//!
//! Pointer events arrive in screen space (CSS pixels relative to the canvas
//! element); stored placements live in canvas space. Each space has its own
//! point and delta type so the compiler rejects accidental mixing. Handlers
//! convert screen to canvas exactly once, through [`Camera`].
//!
//! The relationship is `screen = canvas * zoom + pan`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A displacement in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenDelta {
    pub dx: f64,
    pub dy: f64,
}

impl ScreenDelta {
    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length in pixels.
    #[must_use]
    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// A displacement in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta {
    pub dx: f64,
    pub dy: f64,
}

impl CanvasDelta {
    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl Sub for ScreenPoint {
    type Output = ScreenDelta;

    fn sub(self, rhs: Self) -> ScreenDelta {
        ScreenDelta { dx: self.x - rhs.x, dy: self.y - rhs.y }
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, rhs: CanvasDelta) -> CanvasPoint {
        CanvasPoint { x: self.x + rhs.dx, y: self.y + rhs.dy }
    }
}

impl AddAssign<CanvasDelta> for CanvasPoint {
    fn add_assign(&mut self, rhs: CanvasDelta) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

/// `(screen - pan) / zoom`.
#[must_use]
pub fn to_canvas_space(screen: ScreenPoint, pan: ScreenDelta, zoom: f64) -> CanvasPoint {
    CanvasPoint { x: (screen.x - pan.dx) / zoom, y: (screen.y - pan.dy) / zoom }
}

/// `canvas * zoom + pan`.
#[must_use]
pub fn to_screen_space(canvas: CanvasPoint, pan: ScreenDelta, zoom: f64) -> ScreenPoint {
    ScreenPoint { x: canvas.x * zoom + pan.dx, y: canvas.y * zoom + pan.dy }
}

/// Camera state for pan/zoom on the canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels and applied before scaling.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn pan(&self) -> ScreenDelta {
        ScreenDelta::new(self.pan_x, self.pan_y)
    }

    /// Convert a screen-space point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: ScreenPoint) -> CanvasPoint {
        to_canvas_space(screen, self.pan(), self.zoom)
    }

    /// Convert a canvas-space point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: CanvasPoint) -> ScreenPoint {
        to_screen_space(canvas, self.pan(), self.zoom)
    }

    /// Un-scale a pointer displacement so dragging tracks the pointer 1:1.
    #[must_use]
    pub fn screen_delta_to_canvas(&self, delta: ScreenDelta) -> CanvasDelta {
        CanvasDelta { dx: delta.dx / self.zoom, dy: delta.dy / self.zoom }
    }

    /// Translate the camera by a raw screen displacement.
    pub fn pan_by(&mut self, delta: ScreenDelta) {
        self.pan_x += delta.dx;
        self.pan_y += delta.dy;
    }
}
