//! Input model: modifier keys, pointer kinds, and what a pointer landed on.
//!
//! The host reports the DOM target of every press as a [`HitTarget`]. Cards
//! and group headers contain interactive sub-regions (checkboxes, vote
//! buttons, image arrows, text fields) that own their own clicks; a press on
//! one of those never starts a drag or changes the selection.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::ScreenPoint;
use crate::doc::{EntityId, GroupId};

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Cmd: the multi-select modifier.
    #[must_use]
    pub fn is_multi(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button or a single-finger touch.
    #[default]
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// The device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Part of a card or group header under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Anywhere not claimed by a control.
    #[default]
    Body,
    Checkbox,
    VoteButton,
    ImageNav,
    TextEdit,
}

impl Region {
    /// Whether this region handles its own clicks.
    #[must_use]
    pub fn is_interactive(self) -> bool {
        !matches!(self, Self::Body)
    }
}

/// What a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitTarget {
    /// Empty canvas.
    #[default]
    Background,
    /// An actor card.
    Entity {
        id: EntityId,
        #[serde(default)]
        region: Region,
    },
    /// A group's header bar.
    GroupHeader {
        id: GroupId,
        #[serde(default)]
        region: Region,
    },
}

impl HitTarget {
    /// Whether the press belongs to a sub-control rather than the canvas.
    #[must_use]
    pub fn is_excluded(self) -> bool {
        match self {
            Self::Background => false,
            Self::Entity { region, .. } | Self::GroupHeader { region, .. } => region.is_interactive(),
        }
    }
}

/// A pointer-down as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerInput {
    /// Position relative to the canvas element, in CSS pixels.
    pub point: ScreenPoint,
    pub button: Button,
    pub kind: PointerKind,
    pub modifiers: Modifiers,
    pub target: HitTarget,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    pub dx: f64,
    /// Vertical scroll amount (positive = down, which zooms out).
    pub dy: f64,
}

/// A keyboard key name as reported by the browser (e.g. `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
