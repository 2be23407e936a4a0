//! The world: one character, its adversaries and the fixed tick that drives
//! them.
//!
//! [`World`] owns every gameplay component and the host. Each call to
//! [`World::step`] runs one fixed logic tick:
//!
//! 1. **CLOCK**: advance by `fixed_dt * time_scale`; stop unless playing
//! 2. **DEFERRED**: fire due tasks (cooldown clears, flash resets, removals)
//! 3. **INPUT**: classify the button edges and dispatch gestures; attacks
//!    resolve against the roster right away
//! 4. **CHARACTER**: ground probe, acceleration, knockback slide
//! 5. **ADVERSARIES**: movement
//! 6. **CONTACT**: overlapping live adversaries damage the character
//! 7. **INTEGRATE**: the host integrates velocities
//! 8. **SCORE**: the session accrues score
//!
//! [`World::present`] is the separate variable-rate presentation tick; it
//! only eases flash colors and never changes gameplay state.
//!
//! # Determinism
//!
//! Given the same seed, config, spawns and button stream, two worlds publish
//! identical event streams: adversaries are visited in handle order, deferred
//! tasks fire in due order with ties broken by scheduling order, and random
//! streams are seeded per adversary.
//!
//! # Example
//!
//! ```
//! use flipstrike_core::adversary::AdversaryKind;
//! use flipstrike_core::arena::Arena;
//! use flipstrike_core::input::ButtonEdges;
//! use flipstrike_core::world::World;
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn_player(Vec2::ZERO);
//! let mut world = World::builder().host(arena).player(player).build().unwrap();
//!
//! world.start();
//! world.spawn_adversary(AdversaryKind::Basic, Vec2::new(1.0, 0.0), false);
//! world.step(ButtonEdges::PRESS);
//! world.step(ButtonEdges::RELEASE);
//!
//! assert_eq!(world.roster().live_count(), 0);
//! ```

use glam::Vec2;
use tracing::{debug, trace};

use crate::adversary::{Adversary, AdversaryKind, Roster};
use crate::character::Character;
use crate::config::GameConfig;
use crate::entity::{BodyTag, Handle};
use crate::error::WiringError;
use crate::events::{EventLog, GameEvent};
use crate::frame::Frame;
use crate::host::Host;
use crate::input::{ButtonEdges, InputClassifier};
use crate::scheduler::{Deferred, Scheduler};
use crate::session::SessionTracker;

// =============================================================================
// WorldBuilder
// =============================================================================

/// Wires a [`World`] to its host.
///
/// Capabilities are checked by the type system (`H: Host`); `build` checks the
/// rest: a host and a player body were supplied, the host knows the player
/// body, and the config validates.
#[derive(Debug)]
pub struct WorldBuilder<H> {
    host: Option<H>,
    player: Option<Handle>,
    config: GameConfig,
}

impl<H> Default for WorldBuilder<H> {
    fn default() -> Self {
        Self {
            host: None,
            player: None,
            config: GameConfig::default(),
        }
    }
}

impl<H: Host> WorldBuilder<H> {
    /// Starts with no host, no player and the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    #[must_use]
    pub fn host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Names the body the character drives.
    #[must_use]
    pub fn player(mut self, handle: Handle) -> Self {
        self.player = Some(handle);
        self
    }

    /// Replaces the default config.
    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the world.
    ///
    /// # Errors
    ///
    /// Returns a [`WiringError`] if the host or player is missing, the player
    /// body is unknown to the host, or the config is invalid.
    pub fn build(self) -> Result<World<H>, WiringError> {
        let host = self.host.ok_or(WiringError::MissingHost)?;
        let player = self.player.ok_or(WiringError::MissingPlayer)?;
        if !host.contains(player) {
            return Err(WiringError::UnknownPlayerBody(player));
        }
        self.config.validate()?;

        debug!(%player, seed = self.config.seed, "world wired");
        Ok(World {
            character: Character::new(player, self.config.character.clone()),
            classifier: InputClassifier::new(self.config.input.clone()),
            session: SessionTracker::new(self.config.session.clone()),
            scheduler: Scheduler::new(),
            roster: Roster::new(),
            events: EventLog::new(),
            button_down: false,
            tick: 0,
            host,
            config: self.config,
        })
    }
}

// =============================================================================
// World
// =============================================================================

/// The gameplay core bound to a host.
#[derive(Debug)]
pub struct World<H> {
    host: H,
    config: GameConfig,
    scheduler: Scheduler,
    classifier: InputClassifier,
    character: Character,
    roster: Roster,
    session: SessionTracker,
    events: EventLog,
    button_down: bool,
    tick: u64,
}

impl<H: Host> World<H> {
    /// Starts wiring a world.
    #[must_use]
    pub fn builder() -> WorldBuilder<H> {
        WorldBuilder::new()
    }

    // ========================================================================
    // Session control
    // ========================================================================

    /// Starts a game from the menu (or after game over, without resetting
    /// the character; use [`restart`](Self::restart) for that).
    pub fn start(&mut self) {
        self.session.start_game(&mut self.events);
    }

    /// Pauses a running game.
    pub fn pause(&mut self) {
        self.session.pause_game(&mut self.events);
    }

    /// Resumes a paused game.
    pub fn resume(&mut self) {
        self.session.resume_game(&mut self.events);
    }

    /// Full restart: character, classifier, roster and pending tasks are
    /// reset, then a new game starts.
    pub fn restart(&mut self) {
        for handle in self.roster.drain() {
            self.host.remove(handle);
        }
        self.scheduler.clear();
        self.classifier.reset();
        self.button_down = false;

        let player = self.character.handle();
        self.host.set_velocity(player, Vec2::ZERO);

        let mut frame = Frame::new(
            &mut self.host,
            &mut self.scheduler,
            &mut self.events,
            &mut self.session,
        );
        self.character.reset(&mut frame);
        frame.session.restart_game(frame.events);
        debug!(tick = self.tick, "world restarted");
    }

    /// Spawns an adversary through the host and adds it to the roster.
    pub fn spawn_adversary(
        &mut self,
        kind: AdversaryKind,
        position: Vec2,
        flipped: bool,
    ) -> Handle {
        let handle = self.host.spawn(kind, position, flipped);
        self.roster.insert(Adversary::new(
            handle,
            kind,
            &self.config.adversaries,
            self.config.seed,
            flipped,
        ));
        trace!(%handle, %kind, flipped, "adversary spawned");
        handle
    }

    // ========================================================================
    // Ticks
    // ========================================================================

    /// Runs one fixed logic tick with explicit button edges.
    pub fn step(&mut self, edges: ButtonEdges) {
        self.tick += 1;
        let dt = self.config.fixed_dt * self.session.time_scale();
        self.scheduler.advance(f64::from(dt));
        if !self.session.is_playing() {
            return;
        }

        let Self {
            host,
            scheduler,
            classifier,
            character,
            roster,
            session,
            events,
            ..
        } = self;
        let mut frame = Frame::new(host, scheduler, events, session);

        for task in frame.scheduler.drain_due() {
            run_deferred(task, character, roster, frame.host);
        }

        let now = frame.now();
        for gesture in classifier.update(edges, now) {
            frame.publish(GameEvent::GestureRecognized(gesture));
            character.handle_gesture(gesture, roster, &mut frame);
        }

        character.sense_ground(&frame);
        character.advance_movement(dt, &mut frame);
        character.resume_knockback(dt, &mut frame);

        for adversary in roster.iter_mut() {
            adversary.advance(dt, frame.host);
        }

        apply_contacts(character, roster, &mut frame);

        frame.host.integrate(dt);
        frame.session.tick(dt, frame.events);
    }

    /// Runs one fixed logic tick from the raw button level, deriving edges
    /// from the previous level.
    ///
    /// The level is only tracked on playing ticks, so a release that happens
    /// while paused is still seen as a release on the first tick after resume.
    pub fn step_level(&mut self, is_down: bool) {
        let edges = ButtonEdges::from_levels(self.button_down, is_down);
        if self.session.is_playing() {
            self.button_down = is_down;
        }
        self.step(edges);
    }

    /// Runs one presentation frame: eases flash colors toward their targets.
    pub fn present(&mut self, dt: f32) {
        if let Some(tint) = self.character.present(dt) {
            self.host.set_tint(self.character.handle(), tint);
        }
        for adversary in self.roster.iter_mut() {
            if let Some(tint) = adversary.present(dt) {
                self.host.set_tint(adversary.handle(), tint);
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The player character.
    #[must_use]
    pub const fn character(&self) -> &Character {
        &self.character
    }

    /// The adversaries, dead ones awaiting removal included.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Looks up an adversary.
    #[must_use]
    pub fn adversary(&self, handle: Handle) -> Option<&Adversary> {
        self.roster.get(handle)
    }

    /// Session state and score.
    #[must_use]
    pub const fn session(&self) -> &SessionTracker {
        &self.session
    }

    /// The input classifier.
    #[must_use]
    pub const fn classifier(&self) -> &InputClassifier {
        &self.classifier
    }

    /// The host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Simulation time in seconds.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Number of fixed ticks stepped, paused ones included.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Deferred tasks not yet fired.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Events published since the last drain.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        self.events.events()
    }

    /// Drains the published events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.take_events()
    }
}

fn run_deferred<H: Host>(
    task: Deferred,
    character: &mut Character,
    roster: &mut Roster,
    host: &mut H,
) {
    trace!(?task, "deferred task due");
    match task {
        Deferred::ClearKnockback => character.clear_knockback(),
        Deferred::ResetFlash(handle) if handle == character.handle() => character.release_flash(),
        Deferred::ResetFlash(handle) => {
            if let Some(adversary) = roster.get_mut(handle) {
                adversary.release_flash();
            }
        }
        Deferred::Remove(handle) => {
            roster.remove(handle);
            host.remove(handle);
        }
    }
}

fn apply_contacts<H: Host>(character: &mut Character, roster: &Roster, frame: &mut Frame<'_, H>) {
    let Some(player) = frame.host.position(character.handle()) else {
        return;
    };
    let radius = character.tuning().contact_radius;
    for handle in frame.host.area_query(player, radius, BodyTag::Adversary) {
        let Some(adversary) = roster.get(handle) else {
            continue;
        };
        if adversary.is_dead() {
            continue;
        }
        let from = frame.host.position(handle).unwrap_or(player);
        let direction = (player - from).normalize_or_zero();
        character.apply_damage(adversary.damage(), direction, frame);
    }
}
