//! Deferred one-shot actions on a virtual clock
//!
//! The engine never sleeps. Anything that happens "later" (error recovery,
//! hiding the startup loader) is queued here and released when the host
//! advances the clock. Hosts with a real clock pass elapsed wall time; tests
//! pass whatever they like.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Work the engine runs once its delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Clear the error message and reset the entry to `"0"`
    RecoverFromError,
    /// Hide the startup loader
    HideLoader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    action: DeferredAction,
}

/// Virtual-clock queue of deferred actions
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    /// Creates an empty scheduler at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of actions not yet released
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is queued
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time until the next action is due, if any
    #[must_use]
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|s| s.due.saturating_sub(self.now))
            .min()
    }

    /// Queues `action` to run `delay` from now
    pub fn schedule(&mut self, delay: Duration, action: DeferredAction) {
        let entry = Scheduled {
            due: self.now + delay,
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;
        self.pending.push(entry);
    }

    /// Moves the clock forward and returns every action that became due,
    /// earliest first. Actions due at the same instant keep scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<DeferredAction> {
        self.now += elapsed;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = waiting;

        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.action).collect()
    }
}
