//! Cancellable, host-driven timers.
//!
//! The core never sleeps. Scheduling a timer queues a [`TimerRequest`] that
//! the engine hands to the host as an action; the host calls back with the
//! id when the delay elapses. A callback for an id that was cancelled or
//! superseded in the meantime is stale and ignored.

#[cfg(test)]
#[path = "timers_test.rs"]
mod timers_test;

use serde::{Deserialize, Serialize};

/// Opaque handle for one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Promotes a still touch press to a long-press.
    LongPress,
    /// Clears the post-vote highlight on a card.
    Highlight,
}

/// Work the host must do with its own timer facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    Schedule { id: TimerId, delay_ms: u32 },
    Cancel { id: TimerId },
}

/// Registry of live timers plus the queue of pending host requests.
#[derive(Debug, Default)]
pub struct Timers {
    next_id: u64,
    live: Vec<(TimerId, TimerKind)>,
    requests: Vec<TimerRequest>,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer and queue its schedule request.
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u32) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.live.push((id, kind));
        self.requests.push(TimerRequest::Schedule { id, delay_ms });
        id
    }

    /// Cancel a live timer. Returns false for unknown or already-fired ids.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(idx) = self.live.iter().position(|(live, _)| *live == id) else {
            return false;
        };
        self.live.remove(idx);
        self.requests.push(TimerRequest::Cancel { id });
        true
    }

    /// Cancel every live timer of `kind`.
    pub fn cancel_kind(&mut self, kind: TimerKind) {
        let doomed: Vec<TimerId> = self.live.iter().filter(|(_, k)| *k == kind).map(|(id, _)| *id).collect();
        for id in doomed {
            self.cancel(id);
        }
    }

    /// Cancel everything, as on unmount.
    pub fn cancel_all(&mut self) {
        for (id, _) in self.live.drain(..) {
            self.requests.push(TimerRequest::Cancel { id });
        }
    }

    /// Consume an expiry. Returns the timer's kind, or `None` if stale.
    pub fn fire(&mut self, id: TimerId) -> Option<TimerKind> {
        let idx = self.live.iter().position(|(live, _)| *live == id)?;
        Some(self.live.remove(idx).1)
    }

    #[must_use]
    pub fn is_live(&self, id: TimerId) -> bool {
        self.live.iter().any(|(live, _)| *live == id)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Take the queued host requests, oldest first.
    pub fn drain_requests(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.requests)
    }
}
