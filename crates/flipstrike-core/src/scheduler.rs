//! Simulation clock and deferred single-shot tasks.
//!
//! Everything that happens "some time later" (the end of a knockback
//! cooldown, fading a damage flash, removing a dead adversary) is a
//! [`Deferred`] task queued here by due time. The world polls the queue once
//! per tick, before input is classified.
//!
//! Tasks are never cancelled. A task always fires once its due time has
//! passed, whatever happened in between; consumers must tolerate that (a
//! cooldown clear after death is harmless because death guards damage on its
//! own).
//!
//! # Ordering
//!
//! Due tasks fire in due-time order. Tasks sharing a due time fire in the
//! order they were scheduled.
//!
//! # Example
//!
//! ```
//! use flipstrike_core::entity::Handle;
//! use flipstrike_core::scheduler::{Deferred, Scheduler};
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.after(0.5, Deferred::Remove(Handle::new(3)));
//! scheduler.after(0.1, Deferred::ClearKnockback);
//!
//! scheduler.advance(0.2);
//! assert_eq!(scheduler.drain_due(), vec![Deferred::ClearKnockback]);
//!
//! scheduler.advance(0.3);
//! assert_eq!(scheduler.drain_due(), vec![Deferred::Remove(Handle::new(3))]);
//! assert!(scheduler.is_empty());
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::entity::Handle;

/// A task waiting for its due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deferred {
    /// The player's knockback cooldown has elapsed.
    ClearKnockback,
    /// The damage tint of a body should fade back to its base color.
    ResetFlash(Handle),
    /// A dead adversary should leave the world.
    Remove(Handle),
}

/// Identifier of a scheduled task, in scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Returns the raw sequence number.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: f64,
    id: TaskId,
    task: Deferred,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Monotonic simulation clock plus the due-time task queue.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    next_id: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
}

impl Scheduler {
    /// Creates a scheduler at time zero with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in seconds.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Moves the clock forward. Negative steps are ignored so time never runs backward.
    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.now += dt;
        }
    }

    /// Queues `task` to fire `delay` seconds from now.
    ///
    /// # Returns
    ///
    /// The identifier of the scheduled task.
    pub fn after(&mut self, delay: f64, task: Deferred) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(Scheduled {
            due: self.now + delay.max(0.0),
            id,
            task,
        }));
        id
    }

    /// Removes and returns every task whose due time has passed, in firing order.
    pub fn drain_due(&mut self) -> Vec<Deferred> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due > self.now {
                break;
            }
            if let Some(Reverse(scheduled)) = self.queue.pop() {
                due.push(scheduled.task);
            }
        }
        due
    }

    /// Number of tasks still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued task. The clock keeps its time.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
