//! The set of selected placements.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::HashSet;

use crate::doc::EntityId;

/// Order-irrelevant set of selected placement ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<EntityId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `multi == false` replaces the selection with `{id}`; `multi == true`
    /// toggles `id`'s membership.
    pub fn select(&mut self, id: EntityId, multi: bool) {
        if multi {
            self.toggle(id);
        } else {
            self.ids.clear();
            self.ids.insert(id);
        }
    }

    /// Flip `id`'s membership. Returns whether it is now selected.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with `ids`.
    pub fn set(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn remove(&mut self, id: &EntityId) -> bool {
        self.ids.remove(id)
    }

    /// Drop every id for which `keep` returns false.
    pub fn retain(&mut self, keep: impl Fn(&EntityId) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.ids.iter()
    }

    /// Selected ids in a stable order, for serialization and batch edits.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
