//! Published gameplay events.
//!
//! The core publishes what happened during a tick by appending
//! [`GameEvent`]s to an [`EventLog`]. Nothing in the core reads the log back;
//! the host drains it with [`EventLog::take_events`], typically once per
//! tick, to drive UI, audio or telemetry.
//!
//! Events are recorded in the order they occurred, so damage recorded in a
//! tick always precedes the death it caused.

use serde::{Deserialize, Serialize};

use crate::adversary::AdversaryKind;
use crate::entity::Handle;
use crate::input::GestureEvent;
use crate::session::SessionState;

/// Something the core announces to its listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The classifier recognized a gesture.
    GestureRecognized(GestureEvent),
    /// The player's health changed.
    HealthChanged {
        /// Health after the change.
        current: i32,
        /// Maximum health.
        max: i32,
    },
    /// The player died. Published exactly once per life.
    PlayerDied,
    /// An adversary died. Published exactly once per adversary.
    AdversaryDied {
        /// Body of the adversary.
        handle: Handle,
        /// Its kind.
        kind: AdversaryKind,
    },
    /// The session moved to a new state.
    SessionStateChanged(SessionState),
    /// The score changed.
    ScoreChanged(f32),
}

impl GameEvent {
    /// Returns true for events that end a life or a body.
    #[must_use]
    pub const fn is_death(&self) -> bool {
        matches!(self, Self::PlayerDied | Self::AdversaryDied { .. })
    }
}

/// Ordered record of published events.
///
/// # Example
///
/// ```
/// use flipstrike_core::events::{EventLog, GameEvent};
///
/// let mut log = EventLog::new();
/// log.record(GameEvent::PlayerDied);
/// assert_eq!(log.event_count(), 1);
///
/// let events = log.take_events();
/// assert_eq!(events, vec![GameEvent::PlayerDied]);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event.
    pub fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in the order they were recorded.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the recorded events without draining them.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Returns the number of events currently in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clears all events without returning them.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
