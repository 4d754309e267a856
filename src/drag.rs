//! Gesture state machine for cards, group headers, and the background.
//!
//! ```text
//! Idle --press--> Pressed --move past threshold--> Dragging --release--> Idle
//!                    |  \--release--------------------------------------> Idle   (click)
//!                    \--long-press timer (touch, still)--> LongPressed --release--> Idle
//! ```
//!
//! The controller never touches the document. Each transition returns
//! [`DragEffect`]s that the engine applies, which keeps the transitions and
//! their guards testable on their own. Movement is reported as raw screen
//! deltas against the previous pointer position; the engine un-scales them
//! by the zoom.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use tracing::{debug, trace};

use crate::camera::{ScreenDelta, ScreenPoint};
use crate::config::CanvasConfig;
use crate::doc::{EntityId, GroupId};
use crate::input::{Button, HitTarget, PointerInput, PointerKind};
use crate::timers::{TimerId, TimerKind, Timers};

/// What a gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSubject {
    Entity(EntityId),
    Group(GroupId),
    /// Empty canvas; dragging it pans the viewport.
    Background,
}

/// The active gesture, carrying what later events need.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer is down but has not travelled past the threshold.
    Pressed {
        subject: DragSubject,
        kind: PointerKind,
        /// Where the press started, for the threshold check.
        start: ScreenPoint,
        /// Pending long-press timer (touch on a card only).
        long_press: Option<TimerId>,
        /// Whether a click should leave the selection as the press left it.
        keep_selection: bool,
    },
    /// Pointer is moving the subject.
    Dragging {
        subject: DragSubject,
        /// Pointer position at the previous move event.
        last: ScreenPoint,
    },
    /// A long-press already toggled selection; the rest of the touch is inert.
    LongPressed { id: EntityId },
}

/// A state change the engine must apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    /// Press-time selection on a card. `multi` toggles; otherwise the card
    /// becomes the selection unless it is already part of it.
    Select { id: EntityId, multi: bool },
    /// Click on a card: it alone becomes the selection.
    SelectOnly { id: EntityId },
    /// Long-press multi-select toggle.
    ToggleSelect { id: EntityId },
    ClearSelection,
    MoveEntity { id: EntityId, delta: ScreenDelta },
    MoveGroup { id: GroupId, delta: ScreenDelta },
    Pan { delta: ScreenDelta },
    /// Short vibration confirming a long-press.
    Haptic,
    OpenContextMenu { id: EntityId, at: ScreenPoint },
}

/// Owns the current [`Gesture`].
#[derive(Debug, Default)]
pub struct DragController {
    gesture: Gesture,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Pointer-down. A press while another gesture is live supersedes it.
    pub fn press(&mut self, input: &PointerInput, timers: &mut Timers, cfg: &CanvasConfig) -> Vec<DragEffect> {
        self.cancel(timers);
        if input.target.is_excluded() {
            trace!(hit = ?input.target, "press on interactive region ignored");
            return Vec::new();
        }
        match (input.button, input.target) {
            (Button::Secondary, HitTarget::Entity { id, .. }) => {
                vec![DragEffect::OpenContextMenu { id, at: input.point }]
            }
            (Button::Secondary, _) => Vec::new(),
            (Button::Middle, _) => {
                self.gesture = Gesture::Pressed {
                    subject: DragSubject::Background,
                    kind: input.kind,
                    start: input.point,
                    long_press: None,
                    keep_selection: true,
                };
                Vec::new()
            }
            (Button::Primary, HitTarget::Entity { id, .. }) => {
                if input.kind == PointerKind::Touch {
                    let timer = timers.schedule(TimerKind::LongPress, cfg.long_press_ms);
                    self.gesture = Gesture::Pressed {
                        subject: DragSubject::Entity(id),
                        kind: input.kind,
                        start: input.point,
                        long_press: Some(timer),
                        keep_selection: false,
                    };
                    Vec::new()
                } else {
                    let multi = input.modifiers.is_multi();
                    self.gesture = Gesture::Pressed {
                        subject: DragSubject::Entity(id),
                        kind: input.kind,
                        start: input.point,
                        long_press: None,
                        keep_selection: multi,
                    };
                    vec![DragEffect::Select { id, multi }]
                }
            }
            (Button::Primary, HitTarget::GroupHeader { id, .. }) => {
                self.gesture = Gesture::Pressed {
                    subject: DragSubject::Group(id),
                    kind: input.kind,
                    start: input.point,
                    long_press: None,
                    keep_selection: true,
                };
                Vec::new()
            }
            (Button::Primary, HitTarget::Background) => {
                self.gesture = Gesture::Pressed {
                    subject: DragSubject::Background,
                    kind: input.kind,
                    start: input.point,
                    long_press: None,
                    keep_selection: input.modifiers.is_multi(),
                };
                Vec::new()
            }
        }
    }

    /// Pointer-move. Deltas are always measured from the previous position.
    pub fn move_to(&mut self, point: ScreenPoint, timers: &mut Timers, cfg: &CanvasConfig) -> Vec<DragEffect> {
        match self.gesture {
            Gesture::Idle | Gesture::LongPressed { .. } => Vec::new(),
            Gesture::Pressed { subject, kind, start, long_press, .. } => {
                let threshold = if kind == PointerKind::Touch { cfg.touch_slop_px } else { cfg.drag_threshold_px };
                if (point - start).length() <= threshold {
                    return Vec::new();
                }
                if let Some(timer) = long_press {
                    timers.cancel(timer);
                }
                debug!(?subject, "press promoted to drag");
                self.gesture = Gesture::Dragging { subject, last: point };
                let mut effects = Vec::new();
                if let (DragSubject::Entity(id), PointerKind::Touch) = (subject, kind) {
                    effects.push(DragEffect::Select { id, multi: false });
                }
                effects.push(movement(subject, point - start));
                effects
            }
            Gesture::Dragging { subject, last } => {
                self.gesture = Gesture::Dragging { subject, last: point };
                vec![movement(subject, point - last)]
            }
        }
    }

    /// Pointer-up. A release without a drag is a click, which narrows the
    /// selection to the clicked card unless a modifier was held.
    pub fn release(&mut self, timers: &mut Timers) -> Vec<DragEffect> {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle | Gesture::LongPressed { .. } => Vec::new(),
            Gesture::Dragging { subject, .. } => {
                debug!(?subject, "drag finished");
                Vec::new()
            }
            Gesture::Pressed { subject, kind, long_press, keep_selection, .. } => {
                if let Some(timer) = long_press {
                    timers.cancel(timer);
                }
                match subject {
                    DragSubject::Entity(id) if !keep_selection => {
                        trace!(%id, ?kind, "click on card");
                        vec![DragEffect::SelectOnly { id }]
                    }
                    DragSubject::Background if !keep_selection => vec![DragEffect::ClearSelection],
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Long-press timer expiry. Only the timer armed by the current press
    /// counts; anything else is stale.
    pub fn long_press_fired(&mut self, timer: TimerId) -> Vec<DragEffect> {
        let Gesture::Pressed { subject: DragSubject::Entity(id), long_press: Some(armed), .. } = self.gesture else {
            return Vec::new();
        };
        if armed != timer {
            return Vec::new();
        }
        debug!(%id, "long-press toggles selection");
        self.gesture = Gesture::LongPressed { id };
        vec![DragEffect::ToggleSelect { id }, DragEffect::Haptic]
    }

    /// Abandon the current gesture (pointer-cancel, unmount, superseding press).
    pub fn cancel(&mut self, timers: &mut Timers) {
        if let Gesture::Pressed { long_press: Some(timer), .. } = self.gesture {
            timers.cancel(timer);
        }
        self.gesture = Gesture::Idle;
    }

    /// Forget a gesture whose subject was removed by another interaction.
    pub fn forget_entity(&mut self, id: &EntityId, timers: &mut Timers) {
        let subject = match self.gesture {
            Gesture::Pressed { subject, .. } | Gesture::Dragging { subject, .. } => subject,
            Gesture::LongPressed { id } => DragSubject::Entity(id),
            Gesture::Idle => return,
        };
        if subject == DragSubject::Entity(*id) {
            self.cancel(timers);
        }
    }

    /// Forget a gesture on a group that was deleted.
    pub fn forget_group(&mut self, id: &GroupId, timers: &mut Timers) {
        let subject = match self.gesture {
            Gesture::Pressed { subject, .. } | Gesture::Dragging { subject, .. } => subject,
            Gesture::LongPressed { .. } | Gesture::Idle => return,
        };
        if subject == DragSubject::Group(*id) {
            self.cancel(timers);
        }
    }
}

fn movement(subject: DragSubject, delta: ScreenDelta) -> DragEffect {
    match subject {
        DragSubject::Entity(id) => DragEffect::MoveEntity { id, delta },
        DragSubject::Group(id) => DragEffect::MoveGroup { id, delta },
        DragSubject::Background => DragEffect::Pan { delta },
    }
}
