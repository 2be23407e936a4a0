//! Session-level state, score and scroll speed.
//!
//! The tracker is deliberately small: a four-state machine, a score that
//! only grows while playing, and a time scale the world applies to its tick.
//! The target scroll speed is derived from the score on every read and never
//! stored.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SessionTuning;
use crate::events::{EventLog, GameEvent};

/// Coarse state of a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Not started yet.
    #[default]
    Menu,
    /// Running.
    Playing,
    /// Frozen by the player.
    Paused,
    /// The player died.
    GameOver,
}

/// Tracks the session state machine and score.
///
/// Every transition and score change is published to the [`EventLog`] passed
/// in by the caller.
///
/// # Example
///
/// ```
/// use flipstrike_core::config::SessionTuning;
/// use flipstrike_core::events::EventLog;
/// use flipstrike_core::session::{SessionState, SessionTracker};
///
/// let mut events = EventLog::new();
/// let mut session = SessionTracker::new(SessionTuning { base_speed: 5.0, speed_rate: 0.1 });
///
/// session.start_game(&mut events);
/// session.add_score(10.0, &mut events);
///
/// assert_eq!(session.state(), SessionState::Playing);
/// assert!((session.target_speed() - 6.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct SessionTracker {
    tuning: SessionTuning,
    state: SessionState,
    score: f32,
    time_scale: f32,
}

impl SessionTracker {
    /// Creates a tracker in the menu with zero score.
    #[must_use]
    pub fn new(tuning: SessionTuning) -> Self {
        Self {
            tuning,
            state: SessionState::Menu,
            score: 0.0,
            time_scale: 1.0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true while the session is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> f32 {
        self.score
    }

    /// Multiplier applied to the simulation tick: 1 while running, 0 while paused.
    #[must_use]
    pub const fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Scroll speed the runner accelerates toward: `base_speed + score * speed_rate`.
    #[must_use]
    pub fn target_speed(&self) -> f32 {
        self.tuning.base_speed + self.score * self.tuning.speed_rate
    }

    /// Resets the score and starts playing.
    pub fn start_game(&mut self, events: &mut EventLog) {
        self.set_score(0.0, events);
        self.transition(SessionState::Playing, events);
    }

    /// Freezes a running session. No-op outside `Playing`.
    pub fn pause_game(&mut self, events: &mut EventLog) {
        if self.state != SessionState::Playing {
            debug!(state = ?self.state, "pause ignored");
            return;
        }
        self.time_scale = 0.0;
        self.transition(SessionState::Paused, events);
    }

    /// Resumes a paused session. No-op outside `Paused`.
    pub fn resume_game(&mut self, events: &mut EventLog) {
        if self.state != SessionState::Paused {
            debug!(state = ?self.state, "resume ignored");
            return;
        }
        self.time_scale = 1.0;
        self.transition(SessionState::Playing, events);
    }

    /// Ends the session.
    pub fn game_over(&mut self, events: &mut EventLog) {
        if self.state == SessionState::GameOver {
            return;
        }
        info!(score = self.score, "game over");
        self.transition(SessionState::GameOver, events);
    }

    /// Restores normal time flow, then starts a new game.
    pub fn restart_game(&mut self, events: &mut EventLog) {
        self.time_scale = 1.0;
        self.start_game(events);
    }

    /// Accrues score for `dt` seconds of play. No-op outside `Playing`.
    pub fn tick(&mut self, dt: f32, events: &mut EventLog) {
        if self.state != SessionState::Playing || dt <= 0.0 {
            return;
        }
        self.set_score(self.score + dt, events);
    }

    /// Awards bonus points. Negative points are ignored so the score never decreases.
    pub fn add_score(&mut self, points: f32, events: &mut EventLog) {
        if points <= 0.0 {
            return;
        }
        self.set_score(self.score + points, events);
    }

    fn set_score(&mut self, score: f32, events: &mut EventLog) {
        if (score - self.score).abs() > 0.0 {
            self.score = score;
            events.record(GameEvent::ScoreChanged(score));
        }
    }

    fn transition(&mut self, next: SessionState, events: &mut EventLog) {
        info!(from = ?self.state, to = ?next, "session state changed");
        self.state = next;
        events.record(GameEvent::SessionStateChanged(next));
    }
}
