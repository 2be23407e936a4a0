//! Per-tick context.
//!
//! A [`Frame`] bundles the mutable collaborators that character and
//! adversary operations reach into: the host, the scheduler (and with it the
//! clock), the event log and the session. The world builds one from its own
//! fields for each step, so no component ever holds a reference to another
//! between ticks.

use crate::events::{EventLog, GameEvent};
use crate::scheduler::{Deferred, Scheduler, TaskId};
use crate::session::SessionTracker;

/// Borrowed collaborators for one tick.
#[derive(Debug)]
pub struct Frame<'a, H> {
    /// Physics, visuals and lifecycle.
    pub host: &'a mut H,
    /// Clock and deferred tasks.
    pub scheduler: &'a mut Scheduler,
    /// Published events.
    pub events: &'a mut EventLog,
    /// Session state, score and target speed.
    pub session: &'a mut SessionTracker,
}

impl<'a, H> Frame<'a, H> {
    /// Bundles the collaborators.
    pub fn new(
        host: &'a mut H,
        scheduler: &'a mut Scheduler,
        events: &'a mut EventLog,
        session: &'a mut SessionTracker,
    ) -> Self {
        Self {
            host,
            scheduler,
            events,
            session,
        }
    }

    /// Current simulation time.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Queues a deferred task `delay` seconds from now.
    pub fn after(&mut self, delay: f64, task: Deferred) -> TaskId {
        self.scheduler.after(delay, task)
    }

    /// Publishes an event.
    pub fn publish(&mut self, event: GameEvent) {
        self.events.record(event);
    }
}
