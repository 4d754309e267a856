//! Document model: actor placements, groups, and the in-memory store.
//!
//! A [`CanvasEntity`] places one actor card on the canvas. A [`Group`] is a
//! named, coloured collection of placements whose bounds are derived from its
//! members' card rectangles. Membership is authoritative on the entity
//! (`group_id`); a group's `member_ids` and `bounds` are recomputed by
//! [`DocStore`] after every mutation, so no caller can forget to refresh them.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actors::ActorId;
use crate::camera::{CanvasDelta, CanvasPoint};
use crate::consts::UNTITLED_GROUP;

/// Unique identifier for a placement. Distinct from the actor it shows.
pub type EntityId = Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// Footprint of one actor card in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSize {
    pub width: f64,
    pub height: f64,
}

/// An actor card placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEntity {
    pub id: EntityId,
    /// The actor record this card shows; read-only from the canvas.
    pub actor_ref: ActorId,
    /// Top-left corner of the card in canvas space.
    pub position: CanvasPoint,
    /// Free-text label (usually the character name) shown on the card.
    #[serde(default)]
    pub label: String,
    /// Weak reference to the owning group; `None` means ungrouped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl CanvasEntity {
    #[must_use]
    pub fn new(actor_ref: impl Into<ActorId>, position: CanvasPoint) -> Self {
        Self { id: Uuid::new_v4(), actor_ref: actor_ref.into(), position, label: String::new(), group_id: None }
    }
}

/// Colour tag of a group. The presentation layer maps it to concrete styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Pink,
    Yellow,
    Teal,
    /// Also used for tags this build does not recognise.
    #[serde(other)]
    Gray,
}

/// Axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Bounding box of the card rectangles of `members`.
///
/// An empty member set yields a zero-sized box at the origin.
#[must_use]
pub fn calculate_bounds<'a>(members: impl IntoIterator<Item = &'a CanvasEntity>, card: CardSize) -> Bounds {
    let mut iter = members.into_iter();
    let Some(first) = iter.next() else {
        return Bounds::default();
    };
    let mut min_x = first.position.x;
    let mut min_y = first.position.y;
    let mut max_x = first.position.x + card.width;
    let mut max_y = first.position.y + card.height;
    for e in iter {
        min_x = min_x.min(e.position.x);
        min_y = min_y.min(e.position.y);
        max_x = max_x.max(e.position.x + card.width);
        max_y = max_y.max(e.position.y + card.height);
    }
    Bounds { x: min_x, y: min_y, width: max_x - min_x, height: max_y - min_y }
}

/// A named, coloured collection of placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: GroupColor,
    /// Derived from members; overwritten on every store mutation.
    #[serde(default)]
    pub bounds: Bounds,
    /// Derived from the members' `group_id`; overwritten on every store mutation.
    #[serde(default)]
    pub member_ids: Vec<EntityId>,
    /// Creation order proxy used by the "created" sort.
    #[serde(default)]
    pub created_seq: u64,
}

impl Group {
    /// The stored name, or the placeholder when it is blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() { UNTITLED_GROUP } else { &self.name }
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }
}

/// Counts of dangling references dropped by [`DocStore::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub dangling_group_refs: usize,
    pub duplicate_entities: usize,
    pub duplicate_groups: usize,
}

/// In-memory store of placements and groups.
///
/// Both collections keep insertion order: entities render in that order and
/// groups list in it unless a sort view is applied.
#[derive(Debug, Clone)]
pub struct DocStore {
    entities: Vec<CanvasEntity>,
    groups: Vec<Group>,
    card: CardSize,
    next_seq: u64,
}

impl DocStore {
    /// Create an empty store using `card` as every placement's footprint.
    #[must_use]
    pub fn new(card: CardSize) -> Self {
        Self { entities: Vec::new(), groups: Vec::new(), card, next_seq: 0 }
    }

    #[must_use]
    pub fn card_size(&self) -> CardSize {
        self.card
    }

    // --- Queries ---

    #[must_use]
    pub fn entities(&self) -> &[CanvasEntity] {
        &self.entities
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&CanvasEntity> {
        self.entities.iter().find(|e| e.id == *id)
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == *id)
    }

    #[must_use]
    pub fn contains_entity(&self, id: &EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Placements currently assigned to `group_id`, in store order.
    #[must_use]
    pub fn members_of(&self, group_id: &GroupId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.group_id.as_ref() == Some(group_id))
            .map(|e| e.id)
            .collect()
    }

    /// Placements found for `ids`, skipping ids that no longer exist.
    #[must_use]
    pub fn entities_by_ids<'a, 'b>(&'a self, ids: impl IntoIterator<Item = &'b EntityId>) -> Vec<&'a CanvasEntity> {
        ids.into_iter().filter_map(|id| self.entity(id)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // --- Entity mutations ---

    /// Insert a placement, replacing any placement with the same id.
    pub fn insert_entity(&mut self, mut entity: CanvasEntity) {
        if entity.group_id.is_some_and(|g| self.group(&g).is_none()) {
            entity.group_id = None;
        }
        if let Some(slot) = self.entities.iter_mut().find(|e| e.id == entity.id) {
            *slot = entity;
        } else {
            self.entities.push(entity);
        }
        self.refresh_groups();
    }

    /// Remove a placement, returning it if it was present.
    pub fn remove_entity(&mut self, id: &EntityId) -> Option<CanvasEntity> {
        let idx = self.entities.iter().position(|e| e.id == *id)?;
        let removed = self.entities.remove(idx);
        self.refresh_groups();
        Some(removed)
    }

    /// Remove every placement in `ids`, returning the ones that existed.
    pub fn remove_entities(&mut self, ids: &[EntityId]) -> Vec<CanvasEntity> {
        let mut removed = Vec::new();
        self.entities.retain(|e| {
            if ids.contains(&e.id) {
                removed.push(e.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            self.refresh_groups();
        }
        removed
    }

    /// Copy a placement under a new id, shifted by `offset` and ungrouped.
    pub fn duplicate_entity(&mut self, id: &EntityId, offset: CanvasDelta) -> Option<EntityId> {
        let source = self.entity(id)?;
        let copy = CanvasEntity {
            id: Uuid::new_v4(),
            actor_ref: source.actor_ref.clone(),
            position: source.position + offset,
            label: source.label.clone(),
            group_id: None,
        };
        let new_id = copy.id;
        self.entities.push(copy);
        self.refresh_groups();
        Some(new_id)
    }

    /// Shift every listed placement by `delta`. Missing ids are skipped.
    ///
    /// Returns the number of placements moved.
    pub fn translate_entities(&mut self, ids: &[EntityId], delta: CanvasDelta) -> usize {
        let mut moved = 0;
        for e in self.entities.iter_mut().filter(|e| ids.contains(&e.id)) {
            e.position += delta;
            moved += 1;
        }
        if moved > 0 {
            self.refresh_groups();
        }
        moved
    }

    /// Move one placement to an absolute position.
    pub fn set_position(&mut self, id: &EntityId, position: CanvasPoint) -> bool {
        let Some(e) = self.entities.iter_mut().find(|e| e.id == *id) else {
            return false;
        };
        e.position = position;
        self.refresh_groups();
        true
    }

    pub fn set_label(&mut self, id: &EntityId, label: &str) -> bool {
        let Some(e) = self.entities.iter_mut().find(|e| e.id == *id) else {
            return false;
        };
        label.clone_into(&mut e.label);
        true
    }

    // --- Group mutations ---

    /// Create a group from the listed placements. Missing ids are skipped.
    ///
    /// Returns `None` (and creates nothing) when no listed placement exists.
    pub fn create_group(&mut self, name: &str, color: GroupColor, members: &[EntityId]) -> Option<GroupId> {
        if !members.iter().any(|id| self.contains_entity(id)) {
            return None;
        }
        let group = Group {
            id: Uuid::new_v4(),
            name: name.trim().to_owned(),
            color,
            bounds: Bounds::default(),
            member_ids: Vec::new(),
            created_seq: self.next_seq,
        };
        self.next_seq += 1;
        let group_id = group.id;
        self.groups.push(group);
        for e in self.entities.iter_mut().filter(|e| members.contains(&e.id)) {
            e.group_id = Some(group_id);
        }
        self.refresh_groups();
        Some(group_id)
    }

    /// Delete a group and ungroup its members. Positions are untouched.
    pub fn delete_group(&mut self, id: &GroupId) -> bool {
        let Some(idx) = self.groups.iter().position(|g| g.id == *id) else {
            return false;
        };
        self.groups.remove(idx);
        for e in self.entities.iter_mut().filter(|e| e.group_id.as_ref() == Some(id)) {
            e.group_id = None;
        }
        self.refresh_groups();
        true
    }

    pub fn rename_group(&mut self, id: &GroupId, name: &str) -> bool {
        let Some(g) = self.groups.iter_mut().find(|g| g.id == *id) else {
            return false;
        };
        name.trim().clone_into(&mut g.name);
        true
    }

    pub fn set_group_color(&mut self, id: &GroupId, color: GroupColor) -> bool {
        let Some(g) = self.groups.iter_mut().find(|g| g.id == *id) else {
            return false;
        };
        g.color = color;
        true
    }

    /// Assign a placement to a group, moving it out of any previous group.
    pub fn add_entity_to_group(&mut self, entity_id: &EntityId, group_id: &GroupId) -> bool {
        if self.group(group_id).is_none() {
            return false;
        }
        let Some(e) = self.entities.iter_mut().find(|e| e.id == *entity_id) else {
            return false;
        };
        e.group_id = Some(*group_id);
        self.refresh_groups();
        true
    }

    /// Clear a placement's group membership.
    pub fn remove_entity_from_group(&mut self, entity_id: &EntityId) -> bool {
        let Some(e) = self.entities.iter_mut().find(|e| e.id == *entity_id) else {
            return false;
        };
        if e.group_id.take().is_none() {
            return false;
        }
        self.refresh_groups();
        true
    }

    // --- Bulk ---

    /// Replace all content with a loaded snapshot.
    ///
    /// Duplicate ids keep their first occurrence and group references to
    /// unknown groups are cleared. Stored bounds and member lists are
    /// discarded and recomputed.
    pub fn load(&mut self, entities: Vec<CanvasEntity>, groups: Vec<Group>) -> LoadReport {
        let mut report = LoadReport::default();
        self.groups.clear();
        for g in groups {
            if self.groups.iter().any(|existing| existing.id == g.id) {
                report.duplicate_groups += 1;
                continue;
            }
            self.groups.push(g);
        }
        self.entities.clear();
        for mut e in entities {
            if self.entities.iter().any(|existing| existing.id == e.id) {
                report.duplicate_entities += 1;
                continue;
            }
            if e.group_id.is_some_and(|gid| !self.groups.iter().any(|g| g.id == gid)) {
                e.group_id = None;
                report.dangling_group_refs += 1;
            }
            self.entities.push(e);
        }
        self.next_seq = self.groups.iter().map(|g| g.created_seq + 1).max().unwrap_or(0);
        self.refresh_groups();
        report
    }

    /// Recompute every group's member list and bounds from the placements.
    fn refresh_groups(&mut self) {
        let card = self.card;
        for g in &mut self.groups {
            let members: Vec<&CanvasEntity> =
                self.entities.iter().filter(|e| e.group_id == Some(g.id)).collect();
            g.member_ids = members.iter().map(|e| e.id).collect();
            g.bounds = calculate_bounds(members, card);
        }
    }
}
