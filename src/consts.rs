//! Shared numeric constants for the canvas crate.
//!
//! These are the defaults behind [`crate::config::CanvasConfig`]; code reads
//! the config, not these constants, so a host can override any of them.

// ── Cards ───────────────────────────────────────────────────────

/// Width of an actor card footprint in canvas units.
pub const CARD_WIDTH: f64 = 280.0;

/// Height of an actor card footprint in canvas units.
pub const CARD_HEIGHT: f64 = 200.0;

/// Offset applied to a duplicated placement, in canvas units.
pub const DUPLICATE_OFFSET: f64 = 30.0;

/// Gap between cards when a batch of actors is laid out in a grid.
pub const GRID_GAP: f64 = 40.0;

/// Number of columns used when a batch of actors is laid out in a grid.
pub const GRID_COLUMNS: usize = 4;

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound enforced at every mutation site.
pub const ZOOM_MIN: f64 = 0.1;

/// Upper zoom bound enforced at every mutation site.
pub const ZOOM_MAX: f64 = 5.0;

/// Wheel zoom step while zoomed out below [`WHEEL_SLOW_BELOW`].
pub const WHEEL_STEP_SLOW: f64 = 0.05;

/// Wheel zoom step between the two breakpoints.
pub const WHEEL_STEP_NORMAL: f64 = 0.1;

/// Wheel zoom step while zoomed in above [`WHEEL_FAST_ABOVE`].
pub const WHEEL_STEP_FAST: f64 = 0.15;

/// Zoom level below which the wheel step slows down.
pub const WHEEL_SLOW_BELOW: f64 = 1.0;

/// Zoom level above which the wheel step speeds up.
pub const WHEEL_FAST_ABOVE: f64 = 2.0;

/// Multiplicative factor for the zoom-in / zoom-out buttons (20%).
pub const BUTTON_ZOOM_FACTOR: f64 = 1.2;

// ── Fit ─────────────────────────────────────────────────────────

/// Screen padding around content for fit-to-content, in pixels.
pub const FIT_CONTENT_PADDING: f64 = 100.0;

/// Fit-to-content zoom ceiling.
pub const FIT_CONTENT_MAX_ZOOM: f64 = 2.0;

/// Fit-to-content zoom floor.
pub const FIT_CONTENT_MIN_ZOOM: f64 = 0.1;

/// Fit-to-content zoom when the content box is degenerate.
pub const FIT_CONTENT_DEGENERATE_ZOOM: f64 = 1.0;

/// Screen padding around the selection for fit-to-selection, in pixels.
pub const FIT_SELECTION_PADDING: f64 = 50.0;

/// Fit-to-selection zoom ceiling.
pub const FIT_SELECTION_MAX_ZOOM: f64 = 3.0;

/// Fit-to-selection zoom floor.
pub const FIT_SELECTION_MIN_ZOOM: f64 = 0.2;

/// Fit-to-selection zoom when the selection box is degenerate (a close-up).
pub const FIT_SELECTION_DEGENERATE_ZOOM: f64 = 1.5;

// ── Gestures ────────────────────────────────────────────────────

/// Screen distance a mouse press must travel before it becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Screen distance a touch press must travel before it becomes a drag.
pub const TOUCH_SLOP_PX: f64 = 5.0;

/// Hold time that promotes a still touch press to a long-press.
pub const LONG_PRESS_MS: u32 = 500;

/// Length of the haptic pulse requested on long-press.
pub const HAPTIC_PULSE_MS: u32 = 50;

/// How long a placement stays highlighted after a vote is cast.
pub const HIGHLIGHT_MS: u32 = 1500;

// ── Modals ──────────────────────────────────────────────────────

/// z-index of the bottom modal in the stack.
pub const MODAL_Z_BASE: i32 = 1000;

/// z-index increment between stacked modals.
pub const MODAL_Z_STEP: i32 = 10;

// ── Groups ──────────────────────────────────────────────────────

/// Name shown for a group whose stored name is empty.
pub const UNTITLED_GROUP: &str = "Untitled Group";
