//! Viewport controller: zoom and pan solves over a [`Camera`].
//!
//! Every function here is pure: it takes the current camera and returns the
//! next one. The engine stores the result. Each zoom that names a focal point
//! solves for the pan that keeps that point's canvas position fixed on
//! screen, so rapid wheel events never drift.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CanvasPoint, ScreenPoint};
use crate::config::{CanvasConfig, FitParams};
use crate::doc::{CanvasEntity, CardSize};

/// Size of the canvas element in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }

    /// Centre of the visible canvas area to the right of a left sidebar.
    #[must_use]
    pub fn area_center(&self, sidebar_width: f64) -> ScreenPoint {
        let (sidebar, area) = self.area(sidebar_width);
        ScreenPoint::new(sidebar + area.width * 0.5, area.height * 0.5)
    }

    /// Sidebar width actually used, and the area left beside it.
    fn area(&self, sidebar_width: f64) -> (f64, ViewportSize) {
        let sidebar = if sidebar_width.is_finite() { sidebar_width.max(0.0) } else { 0.0 };
        (sidebar, ViewportSize::new((self.width - sidebar).max(0.0), self.height.max(0.0)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Replace non-finite camera fields and clamp zoom into range.
#[must_use]
pub fn sanitize(camera: Camera, cfg: &CanvasConfig) -> Camera {
    let zoom = if camera.zoom.is_finite() { cfg.clamp_zoom(camera.zoom) } else { 1.0 };
    let pan_x = if camera.pan_x.is_finite() { camera.pan_x } else { 0.0 };
    let pan_y = if camera.pan_y.is_finite() { camera.pan_y } else { 0.0 };
    Camera { pan_x, pan_y, zoom }
}

/// Wheel step for the current zoom: slower when zoomed out, faster when
/// zoomed far in.
#[must_use]
pub fn wheel_step(zoom: f64, cfg: &CanvasConfig) -> f64 {
    if zoom < cfg.wheel_slow_below {
        cfg.wheel_step_slow
    } else if zoom > cfg.wheel_fast_above {
        cfg.wheel_step_fast
    } else {
        cfg.wheel_step_normal
    }
}

/// Set the zoom to `new_zoom` (clamped) keeping `focal` fixed on screen.
#[must_use]
pub fn zoom_about(focal: ScreenPoint, new_zoom: f64, camera: Camera, cfg: &CanvasConfig) -> Camera {
    let camera = sanitize(camera, cfg);
    if !new_zoom.is_finite() || !focal.is_finite() {
        return camera;
    }
    let zoom = cfg.clamp_zoom(new_zoom);
    if (zoom - camera.zoom).abs() < f64::EPSILON {
        return camera;
    }
    let anchor = camera.screen_to_canvas(focal);
    Camera { pan_x: focal.x - anchor.x * zoom, pan_y: focal.y - anchor.y * zoom, zoom }
}

/// One wheel notch at the pointer, using the adaptive step.
///
/// Returns the camera unchanged when it already sits on the bound the
/// direction pushes against.
#[must_use]
pub fn zoom_at_point(focal: ScreenPoint, direction: ZoomDirection, camera: Camera, cfg: &CanvasConfig) -> Camera {
    let camera = sanitize(camera, cfg);
    let step = wheel_step(camera.zoom, cfg);
    let target = match direction {
        ZoomDirection::In => camera.zoom + step,
        ZoomDirection::Out => camera.zoom - step,
    };
    let clamped = cfg.clamp_zoom(target);
    if (clamped - camera.zoom).abs() < f64::EPSILON {
        return camera;
    }
    zoom_about(focal, clamped, camera, cfg)
}

/// Zoom in by the button factor around the centre of the area beside the
/// sidebar, the same point the fits centre on.
#[must_use]
pub fn zoom_in(camera: Camera, viewport: ViewportSize, sidebar_width: f64, cfg: &CanvasConfig) -> Camera {
    let camera = sanitize(camera, cfg);
    zoom_about(viewport.area_center(sidebar_width), camera.zoom * cfg.button_zoom_factor, camera, cfg)
}

/// Zoom out by the button factor around the same point as [`zoom_in`].
#[must_use]
pub fn zoom_out(camera: Camera, viewport: ViewportSize, sidebar_width: f64, cfg: &CanvasConfig) -> Camera {
    let camera = sanitize(camera, cfg);
    zoom_about(viewport.area_center(sidebar_width), camera.zoom / cfg.button_zoom_factor, camera, cfg)
}

/// Zoom 1, no pan.
#[must_use]
pub fn reset_view() -> Camera {
    Camera::default()
}

/// Fit every placement into the area right of the sidebar.
///
/// An empty list leaves the camera unchanged.
#[must_use]
pub fn fit_to_content(
    entities: &[&CanvasEntity],
    viewport: ViewportSize,
    sidebar_width: f64,
    camera: Camera,
    cfg: &CanvasConfig,
) -> Camera {
    fit(entities, viewport, sidebar_width, camera, cfg, &cfg.fit_content)
}

/// Fit the selected placements, with tighter padding and a closer ceiling.
#[must_use]
pub fn fit_to_selection(
    selected: &[&CanvasEntity],
    viewport: ViewportSize,
    sidebar_width: f64,
    camera: Camera,
    cfg: &CanvasConfig,
) -> Camera {
    fit(selected, viewport, sidebar_width, camera, cfg, &cfg.fit_selection)
}

/// Extent of the placements' top-left corners: `(min, max)`.
fn position_extent(entities: &[&CanvasEntity]) -> Option<(CanvasPoint, CanvasPoint)> {
    let (first, rest) = entities.split_first()?;
    let mut min = first.position;
    let mut max = first.position;
    for e in rest {
        min.x = min.x.min(e.position.x);
        min.y = min.y.min(e.position.y);
        max.x = max.x.max(e.position.x);
        max.y = max.y.max(e.position.y);
    }
    Some((min, max))
}

fn fit(
    entities: &[&CanvasEntity],
    viewport: ViewportSize,
    sidebar_width: f64,
    camera: Camera,
    cfg: &CanvasConfig,
    params: &FitParams,
) -> Camera {
    let Some((min, max)) = position_extent(entities) else {
        return camera;
    };
    if !(min.is_finite() && max.is_finite()) {
        return camera;
    }
    let (_, area) = viewport.area(sidebar_width);
    let area_center = viewport.area_center(sidebar_width);

    // One placement, or all of them stacked on the same spot.
    let degenerate = (max.x - min.x).abs() < f64::EPSILON && (max.y - min.y).abs() < f64::EPSILON;
    if degenerate {
        let focus = CanvasPoint::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5);
        let zoom = cfg.clamp_zoom(params.degenerate_zoom);
        return center_on(focus, zoom, area_center);
    }

    let card: CardSize = cfg.card_size();
    let box_width = max.x + card.width - min.x;
    let box_height = max.y + card.height - min.y;
    let avail_width = area.width - params.padding * 2.0;
    let avail_height = area.height - params.padding * 2.0;
    let fitted = if avail_width > 0.0 && avail_height > 0.0 {
        (avail_width / box_width).min(avail_height / box_height)
    } else {
        params.min_zoom
    };
    let zoom = cfg.clamp_zoom(fitted.clamp(params.min_zoom, params.max_zoom));
    let focus = CanvasPoint::new(min.x + box_width * 0.5, min.y + box_height * 0.5);
    center_on(focus, zoom, area_center)
}

/// Camera that shows canvas point `focus` at screen point `at` with `zoom`.
#[must_use]
pub fn center_on(focus: CanvasPoint, zoom: f64, at: ScreenPoint) -> Camera {
    Camera { pan_x: at.x - focus.x * zoom, pan_y: at.y - focus.y * zoom, zoom }
}
