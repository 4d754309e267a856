//! Presentation-only orderings of the group list.
//!
//! Sorting returns a view; the store's own group order is never changed.

#[cfg(test)]
#[path = "sort_test.rs"]
mod sort_test;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::doc::Group;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSortKey {
    /// Display name, case-insensitive.
    Name,
    /// Creation order.
    #[default]
    Created,
    /// Live member count.
    MemberCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Groups ordered by `key` in `direction`. Ties keep stored order.
#[must_use]
pub fn sorted_groups(groups: &[Group], key: GroupSortKey, direction: SortDirection) -> Vec<&Group> {
    let mut view: Vec<&Group> = groups.iter().collect();
    view.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    view
}

fn compare(a: &Group, b: &Group, key: GroupSortKey) -> Ordering {
    match key {
        GroupSortKey::Name => a
            .display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase()),
        GroupSortKey::Created => a.created_seq.cmp(&b.created_seq),
        GroupSortKey::MemberCount => a.member_count().cmp(&b.member_count()),
    }
}
