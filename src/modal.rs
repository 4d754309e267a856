//! LIFO stack of open dialogs.
//!
//! DESIGN
//! ======
//! The stack is an ordinary value owned by the canvas session and handed the
//! three commands `open`, `close`, and `close_all`. It knows nothing about
//! what a dialog renders. It owns ordering, identity, and the stacking
//! metadata the view layer needs: a z-index per entry and whether the
//! backdrop under that entry is dark or light.

#[cfg(test)]
#[path = "modal_test.rs"]
mod modal_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doc::{EntityId, GroupId};

/// A dialog discriminator usable on a [`ModalStack`].
pub trait ModalKind {
    /// Full-screen dialogs that dim the page themselves. A dialog opened on
    /// top of one of these gets the dark backdrop again.
    fn self_backdrop(&self) -> bool {
        false
    }
}

/// One open dialog: which one, plus an opaque payload for its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalEntry<K> {
    pub kind: K,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Backdrop strength under a stacked dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backdrop {
    Dark,
    /// Lets the dialog underneath stay visible.
    Light,
}

/// Rendering metadata for the entry at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalLayer {
    pub index: usize,
    pub z_index: i32,
    pub backdrop: Backdrop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalStack<K> {
    entries: Vec<ModalEntry<K>>,
}

impl<K> Default for ModalStack<K> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: ModalKind> ModalStack<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a dialog on top.
    pub fn open(&mut self, kind: K, data: serde_json::Value) {
        self.entries.push(ModalEntry { kind, data });
        debug!(depth = self.entries.len(), "modal opened");
    }

    /// Pop the top dialog only. Empty stack is a no-op.
    pub fn close(&mut self) -> Option<ModalEntry<K>> {
        let closed = self.entries.pop();
        if closed.is_some() {
            debug!(depth = self.entries.len(), "modal closed");
        }
        closed
    }

    /// Dismiss everything, as when the surrounding context closes.
    pub fn close_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        if n > 0 {
            debug!(closed = n, "all modals closed");
        }
        n
    }

    #[must_use]
    pub fn top(&self) -> Option<&ModalEntry<K>> {
        self.entries.last()
    }

    #[must_use]
    pub fn entries(&self) -> &[ModalEntry<K>] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stacking metadata, bottom first. Entry `i` sits at
    /// `base + i * step`; its backdrop is dark when it is the bottom entry
    /// or the entry below dims the page itself.
    #[must_use]
    pub fn layers(&self, base: i32, step: i32) -> Vec<ModalLayer> {
        let mut z_index = base;
        let mut out = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let dark = match index.checked_sub(1) {
                None => true,
                Some(below) => self.entries[below].kind.self_backdrop(),
            };
            out.push(ModalLayer { index, z_index, backdrop: if dark { Backdrop::Dark } else { Backdrop::Light } });
            z_index = z_index.saturating_add(step);
        }
        out
    }
}

/// Dialogs the canvas itself opens or hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasModal {
    /// The canvas workspace shown as a full-screen overlay.
    Canvas,
    /// Headshot gallery; dims the page itself.
    ImageViewer { entity_id: EntityId },
    EditActor { entity_id: EntityId },
    ConfirmDelete { count: usize },
    /// Name and colour prompt for grouping the current selection.
    CreateGroup,
    /// Pick a different actor for an existing placement.
    MoveActor { entity_id: EntityId },
    /// Rename or recolour an existing group.
    EditGroup { group_id: GroupId },
    AddFromDatabase,
}

impl ModalKind for CanvasModal {
    fn self_backdrop(&self) -> bool {
        matches!(self, Self::Canvas | Self::ImageViewer { .. })
    }
}
