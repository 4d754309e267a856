//! Snapshot format and the storage adapter seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host decides where canvas state lives (local storage, a project
//! file, a server). The core only promises that its full state round-trips
//! through [`CanvasSnapshot`] as flat JSON, and that loading tolerates
//! partial or legacy saves: missing fields take defaults, records that do
//! not decode are skipped, and the engine prunes dangling references.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::camera::Camera;
use crate::config::CanvasConfig;
use crate::doc::{CanvasEntity, Group};
use crate::error::CanvasError;
use crate::viewport;

/// Presentation toggles persisted with the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayOptions {
    pub show_labels: bool,
    pub show_votes: bool,
    pub show_group_bounds: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { show_labels: true, show_votes: true, show_group_bounds: true }
    }
}

/// Saved pan offset in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

/// Everything needed to restore a canvas session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasSnapshot {
    pub entities: Vec<CanvasEntity>,
    pub groups: Vec<Group>,
    pub zoom: f64,
    pub pan: PanOffset,
    pub display: DisplayOptions,
}

impl Default for CanvasSnapshot {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            groups: Vec::new(),
            zoom: 1.0,
            pan: PanOffset::default(),
            display: DisplayOptions::default(),
        }
    }
}

impl CanvasSnapshot {
    /// The saved camera, with non-finite values replaced and zoom clamped.
    #[must_use]
    pub fn camera(&self, cfg: &CanvasConfig) -> Camera {
        viewport::sanitize(Camera { pan_x: self.pan.x, pan_y: self.pan.y, zoom: self.zoom }, cfg)
    }

    /// Older saves recorded membership only on the group. Copy it onto
    /// ungrouped entities the group lists, so it survives the load.
    /// Returns how many entities were adopted.
    pub fn adopt_listed_members(&mut self) -> usize {
        let mut adopted = 0;
        for group in &self.groups {
            for member in &group.member_ids {
                if let Some(e) = self.entities.iter_mut().find(|e| e.id == *member && e.group_id.is_none()) {
                    e.group_id = Some(group.id);
                    adopted += 1;
                }
            }
        }
        adopted
    }

    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSnapshot {
    entities: Vec<Value>,
    groups: Vec<Value>,
    zoom: Option<f64>,
    pan: Option<PanOffset>,
    display: Option<DisplayOptions>,
}

/// Decode a saved canvas.
///
/// Only malformed JSON at the top level is an error. Entities and groups
/// that fail to decode are skipped with a warning; `null` or missing
/// scalars take their defaults.
pub fn snapshot_from_json(raw: &str) -> Result<CanvasSnapshot, CanvasError> {
    let raw: RawSnapshot = serde_json::from_str(raw)?;
    let entities = decode_records::<CanvasEntity>(raw.entities, "entity");
    let groups = decode_records::<Group>(raw.groups, "group");
    let snapshot = CanvasSnapshot {
        entities,
        groups,
        zoom: raw.zoom.unwrap_or(1.0),
        pan: raw.pan.unwrap_or_default(),
        display: raw.display.unwrap_or_default(),
    };
    debug!(entities = snapshot.entities.len(), groups = snapshot.groups.len(), "snapshot decoded");
    Ok(snapshot)
}

fn decode_records<T: serde::de::DeserializeOwned>(values: Vec<Value>, what: &str) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value(value) {
            Ok(record) => out.push(record),
            Err(e) => warn!(error = %e, record = what, "skipping undecodable record"),
        }
    }
    out
}

/// Where snapshots are kept.
pub trait SnapshotStore {
    /// The last saved snapshot, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<CanvasSnapshot>, CanvasError>;

    fn save(&mut self, snapshot: &CanvasSnapshot) -> Result<(), CanvasError>;
}

/// Store that keeps the encoded snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Option<String>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw JSON, as if written by an earlier build.
    #[must_use]
    pub fn with_json(raw: impl Into<String>) -> Self {
        Self { saved: Some(raw.into()), read_only: false }
    }

    /// Store that rejects every save.
    #[must_use]
    pub fn read_only() -> Self {
        Self { saved: None, read_only: true }
    }

    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.saved.as_deref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<CanvasSnapshot>, CanvasError> {
        self.saved.as_deref().map(snapshot_from_json).transpose()
    }

    fn save(&mut self, snapshot: &CanvasSnapshot) -> Result<(), CanvasError> {
        if self.read_only {
            return Err(CanvasError::Storage("store is read-only".into()));
        }
        self.saved = Some(snapshot.to_json()?);
        Ok(())
    }
}
