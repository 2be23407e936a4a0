//! Adversaries.
//!
//! Adversaries travel toward the player (negative x) and are damaged by the
//! character's attacks. The three kinds share one struct and differ in their
//! stat row and [`Movement`] policy:
//!
//! | Kind         | Movement                          | Immune to light hits |
//! |--------------|-----------------------------------|----------------------|
//! | `Basic`      | constant base speed               | no                   |
//! | `Medium`     | base speed plus a sine wobble     | no                   |
//! | `Unexpected` | random speed, redrawn on interval | yes                  |
//!
//! Live adversaries are kept in a [`Roster`] ordered by handle so every
//! iteration over them is deterministic.

mod movement;

pub use movement::Movement;

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::AdversaryTuning;
use crate::entity::Handle;
use crate::events::GameEvent;
use crate::frame::Frame;
use crate::host::Host;
use crate::scheduler::Deferred;
use crate::visual::{FlashFx, Tint};

/// Adversary variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryKind {
    /// Dies to a single light hit.
    Basic,
    /// Tougher, with oscillating speed.
    Medium,
    /// Shrugs off light hits and moves erratically.
    Unexpected,
}

impl AdversaryKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Medium, Self::Unexpected];
}

impl std::fmt::Display for AdversaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Medium => write!(f, "medium"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// What a single hit did to an adversary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The adversary was already dead.
    Ignored,
    /// The hit was absorbed by an immunity.
    Blocked,
    /// Health went down but stayed positive.
    Damaged,
    /// Health reached zero.
    Killed,
}

/// A single adversary.
#[derive(Debug, Clone)]
pub struct Adversary {
    handle: Handle,
    kind: AdversaryKind,
    health: i32,
    is_dead: bool,
    immune_to_light: bool,
    damage: i32,
    move_speed: f32,
    score_value: f32,
    flipped: bool,
    age: f64,
    flash_duration: f64,
    removal_delay: f64,
    movement: Movement,
    flash: FlashFx,
}

impl Adversary {
    /// Creates an adversary from its kind's stat row.
    ///
    /// # Arguments
    ///
    /// * `handle` - Body handle returned by the host
    /// * `kind` - Variant to build
    /// * `tuning` - Stat table and movement parameters
    /// * `seed` - World seed; erratic movers derive their random stream from it
    /// * `flipped` - Whether the body travels on the ceiling
    #[must_use]
    pub fn new(
        handle: Handle,
        kind: AdversaryKind,
        tuning: &AdversaryTuning,
        seed: u64,
        flipped: bool,
    ) -> Self {
        let stats = tuning.stats_for(kind);
        Self {
            handle,
            kind,
            health: stats.health,
            is_dead: false,
            immune_to_light: stats.immune_to_light,
            damage: stats.damage,
            move_speed: stats.move_speed,
            score_value: stats.score_value,
            flipped,
            age: 0.0,
            flash_duration: tuning.flash_duration,
            removal_delay: tuning.removal_delay,
            movement: Movement::for_kind(kind, tuning, seed, handle),
            flash: FlashFx::default(),
        }
    }

    /// Body handle.
    #[must_use]
    pub const fn handle(&self) -> Handle {
        self.handle
    }

    /// Variant.
    #[must_use]
    pub const fn kind(&self) -> AdversaryKind {
        self.kind
    }

    /// Remaining health; never negative.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Returns true once health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Returns true if uncharged hits are blocked.
    #[must_use]
    pub const fn immune_to_light(&self) -> bool {
        self.immune_to_light
    }

    /// Contact damage dealt to the player.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Score awarded on death.
    #[must_use]
    pub const fn score_value(&self) -> f32 {
        self.score_value
    }

    /// Returns true if the body travels on the ceiling.
    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Seconds of movement since spawn.
    #[must_use]
    pub const fn age(&self) -> f64 {
        self.age
    }

    /// Flash state.
    #[must_use]
    pub const fn flash(&self) -> &FlashFx {
        &self.flash
    }

    /// Advances the movement policy and drives the body toward the player.
    ///
    /// Horizontal velocity becomes `-speed`; vertical velocity is left to
    /// gravity. Dead adversaries do not move.
    pub fn advance<H: Host>(&mut self, dt: f32, host: &mut H) {
        if self.is_dead {
            return;
        }
        let speed = self.movement.speed(self.move_speed, self.age);
        self.age += f64::from(dt.max(0.0));

        let vy = host.velocity(self.handle).map_or(0.0, |v| v.y);
        host.set_velocity(self.handle, Vec2::new(-speed, vy));
    }

    /// Applies one hit.
    ///
    /// Uncharged hits on a light-immune adversary are blocked: a blocked flash
    /// plays and the movement policy reacts (erratic movers jump to top
    /// speed). Any other hit subtracts `amount` from health and flashes; at
    /// zero health the adversary dies.
    ///
    /// # Returns
    ///
    /// What the hit did, for the attacker's report.
    pub fn take_damage<H: Host>(
        &mut self,
        amount: i32,
        is_charged: bool,
        frame: &mut Frame<'_, H>,
    ) -> HitOutcome {
        if self.is_dead {
            trace!(handle = %self.handle, "hit on dead adversary ignored");
            return HitOutcome::Ignored;
        }

        if self.immune_to_light && !is_charged {
            debug!(handle = %self.handle, kind = %self.kind, "light hit blocked");
            self.show_flash(Tint::BLOCKED, frame);
            self.movement.punish();
            return HitOutcome::Blocked;
        }

        self.health = (self.health - amount.max(0)).max(0);
        debug!(handle = %self.handle, amount, health = self.health, is_charged, "adversary hit");
        self.show_flash(Tint::DAMAGE, frame);

        if self.health == 0 {
            self.die(frame);
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged
        }
    }

    /// Lets a held flash start fading.
    pub fn release_flash(&mut self) {
        self.flash.release();
    }

    /// Advances the flash fade; returns the tint to push if it changed.
    pub fn present(&mut self, dt: f32) -> Option<Tint> {
        self.flash.present(dt)
    }

    fn show_flash<H: Host>(&mut self, color: Tint, frame: &mut Frame<'_, H>) {
        let tint = self.flash.flash(color);
        frame.host.set_tint(self.handle, tint);
        frame.after(self.flash_duration, Deferred::ResetFlash(self.handle));
    }

    fn die<H: Host>(&mut self, frame: &mut Frame<'_, H>) {
        self.is_dead = true;
        frame.host.set_velocity(self.handle, Vec2::ZERO);
        frame.host.set_gravity_scale(self.handle, 0.0);

        info!(handle = %self.handle, kind = %self.kind, score = self.score_value, "adversary died");
        frame.publish(GameEvent::AdversaryDied {
            handle: self.handle,
            kind: self.kind,
        });
        frame.session.add_score(self.score_value, frame.events);
        frame.after(self.removal_delay, Deferred::Remove(self.handle));
    }
}

/// Live adversaries keyed by handle.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    adversaries: BTreeMap<Handle, Adversary>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an adversary, replacing any previous one with the same handle.
    pub fn insert(&mut self, adversary: Adversary) {
        self.adversaries.insert(adversary.handle(), adversary);
    }

    /// Removes an adversary.
    pub fn remove(&mut self, handle: Handle) -> Option<Adversary> {
        self.adversaries.remove(&handle)
    }

    /// Looks up an adversary.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Adversary> {
        self.adversaries.get(&handle)
    }

    /// Looks up an adversary mutably.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Adversary> {
        self.adversaries.get_mut(&handle)
    }

    /// Iterates in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &Adversary> {
        self.adversaries.values()
    }

    /// Iterates mutably in handle order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Adversary> {
        self.adversaries.values_mut()
    }

    /// Handles in ascending order.
    #[must_use]
    pub fn handles(&self) -> Vec<Handle> {
        self.adversaries.keys().copied().collect()
    }

    /// Number of adversaries, dead ones awaiting removal included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adversaries.len()
    }

    /// Returns true if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adversaries.is_empty()
    }

    /// Number of adversaries still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.adversaries.values().filter(|a| !a.is_dead()).count()
    }

    /// Empties the roster and returns the handles that were in it.
    pub fn drain(&mut self) -> Vec<Handle> {
        let handles = self.handles();
        self.adversaries.clear();
        handles
    }
}
