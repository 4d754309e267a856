//! Read-only view of the actor records owned by the host application.
//!
//! The canvas never mutates an actor. It looks actors up by id to validate
//! drops and to assemble what a card shows; votes are sent back out as
//! intents (see [`crate::engine::Action::VoteIntent`]).

#[cfg(test)]
#[path = "actors_test.rs"]
mod actors_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier of an actor record, as delivered by drag-and-drop payloads.
pub type ActorId = String;

/// A team member's vote on an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
    Maybe,
}

/// The fields of an actor record the canvas reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    pub id: ActorId,
    pub name: String,
    #[serde(default)]
    pub headshot_urls: Vec<String>,
    #[serde(default)]
    pub votes_by_user: HashMap<String, VoteChoice>,
}

impl ActorSummary {
    /// The first headshot, shown on the card face.
    #[must_use]
    pub fn primary_headshot(&self) -> Option<&str> {
        self.headshot_urls.first().map(String::as_str)
    }

    #[must_use]
    pub fn tally(&self) -> VoteTally {
        let mut tally = VoteTally::default();
        for choice in self.votes_by_user.values() {
            match choice {
                VoteChoice::Yes => tally.yes += 1,
                VoteChoice::No => tally.no += 1,
                VoteChoice::Maybe => tally.maybe += 1,
            }
        }
        tally
    }
}

/// Vote counts for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: usize,
    pub no: usize,
    pub maybe: usize,
}

/// Lookup of actor records by id.
pub trait ActorDirectory {
    fn actor(&self, id: &str) -> Option<&ActorSummary>;
}

/// Directory backed by a plain map, used for host-supplied lists and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    actors: HashMap<ActorId, ActorSummary>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: ActorSummary) {
        self.actors.insert(actor.id.clone(), actor);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl FromIterator<ActorSummary> for MemoryDirectory {
    fn from_iter<I: IntoIterator<Item = ActorSummary>>(iter: I) -> Self {
        let mut dir = Self::new();
        for actor in iter {
            dir.insert(actor);
        }
        dir
    }
}

impl ActorDirectory for MemoryDirectory {
    fn actor(&self, id: &str) -> Option<&ActorSummary> {
        self.actors.get(id)
    }
}
