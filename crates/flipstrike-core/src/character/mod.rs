//! The player character.
//!
//! The character consumes gestures from the input classifier and turns them
//! into attacks, charges and gravity flips. It also owns the player's
//! health, the knockback window that follows a hit, and death.
//!
//! # States
//!
//! ```text
//! Running --ChargeStart--> Charging --ChargedRelease--> Attacking --> Running
//! Running --LightAttack--> Attacking --> Running
//! any     --death--------> Stunned (terminal until reset)
//! ```
//!
//! Attacks resolve within the tick that triggered them, so `Attacking` is
//! only observable from inside the combat pass.
//!
//! # Knockback
//!
//! A hit sets [`CharacterFlags::KNOCKBACK`] and schedules
//! [`Deferred::ClearKnockback`] after the cooldown before health is touched.
//! While the flag is set further hits are ignored, which bounds contact
//! damage to one instance per cooldown however many adversaries overlap.

mod knockback;

pub use knockback::{ease_out_cubic, KnockbackSlide, SlideStep};

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::adversary::Roster;
use crate::combat::{CombatResolver, Strike, StrikeReport};
use crate::config::CharacterTuning;
use crate::entity::Handle;
use crate::events::GameEvent;
use crate::frame::Frame;
use crate::host::Host;
use crate::input::GestureEvent;
use crate::scheduler::Deferred;
use crate::visual::{FlashFx, Tint};

/// Coarse state of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterState {
    /// Moving forward; the initial state.
    #[default]
    Running,
    /// Button held past the hold threshold.
    Charging,
    /// Resolving an attack.
    Attacking,
    /// Dead.
    Stunned,
}

bitflags! {
    /// Boolean state of the character.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CharacterFlags: u8 {
        /// Health reached zero.
        const DEAD = 1 << 0;
        /// Inside the post-hit cooldown; hits are ignored.
        const KNOCKBACK = 1 << 1;
        /// Gravity points up.
        const GRAVITY_FLIPPED = 1 << 2;
        /// The last ground probe found ground.
        const GROUNDED = 1 << 3;
    }
}

/// The player entity.
#[derive(Debug, Clone)]
pub struct Character {
    handle: Handle,
    tuning: CharacterTuning,
    state: CharacterState,
    health: i32,
    flags: CharacterFlags,
    slide: Option<KnockbackSlide>,
    flash: FlashFx,
    combat: CombatResolver,
}

impl Character {
    /// Creates a character at full health driving the body `handle`.
    #[must_use]
    pub fn new(handle: Handle, tuning: CharacterTuning) -> Self {
        Self {
            handle,
            health: tuning.max_health,
            tuning,
            state: CharacterState::Running,
            flags: CharacterFlags::empty(),
            slide: None,
            flash: FlashFx::default(),
            combat: CombatResolver::new(),
        }
    }

    /// Body handle.
    #[must_use]
    pub const fn handle(&self) -> Handle {
        self.handle
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CharacterState {
        self.state
    }

    /// Current health, in `[0, max_health]`.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.tuning.max_health
    }

    /// Boolean state.
    #[must_use]
    pub const fn flags(&self) -> CharacterFlags {
        self.flags
    }

    /// Returns true once dead.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.flags.contains(CharacterFlags::DEAD)
    }

    /// Returns true during the post-hit cooldown.
    #[must_use]
    pub const fn is_in_knockback(&self) -> bool {
        self.flags.contains(CharacterFlags::KNOCKBACK)
    }

    /// Returns true while gravity points up.
    #[must_use]
    pub const fn is_gravity_flipped(&self) -> bool {
        self.flags.contains(CharacterFlags::GRAVITY_FLIPPED)
    }

    /// Returns true if the last probe found ground.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.flags.contains(CharacterFlags::GROUNDED)
    }

    /// Returns true while the knockback slide is running.
    #[must_use]
    pub const fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &CharacterTuning {
        &self.tuning
    }

    /// Flash state.
    #[must_use]
    pub const fn flash(&self) -> &FlashFx {
        &self.flash
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    /// Reacts to one classified gesture.
    pub fn handle_gesture<H: Host>(
        &mut self,
        gesture: GestureEvent,
        roster: &mut Roster,
        frame: &mut Frame<'_, H>,
    ) {
        match gesture {
            GestureEvent::LightAttack => {
                self.resolve_light_attack(roster, frame);
            }
            GestureEvent::ChargeStart => self.begin_charge(),
            GestureEvent::ChargedRelease => {
                self.resolve_charged_attack(roster, frame);
            }
            GestureEvent::GravityFlip => self.flip_gravity(frame),
        }
    }

    /// Enters `Charging` unless stunned.
    pub fn begin_charge(&mut self) {
        if self.state == CharacterState::Stunned {
            debug!(state = ?self.state, "charge ignored");
            return;
        }
        self.state = CharacterState::Charging;
    }

    /// Resolves a light attack regardless of the current state.
    ///
    /// A light attack while stunned still lands; the state then returns to
    /// `Stunned` rather than `Running`.
    pub fn resolve_light_attack<H: Host>(
        &mut self,
        roster: &mut Roster,
        frame: &mut Frame<'_, H>,
    ) -> StrikeReport {
        let resume = if self.state == CharacterState::Stunned {
            CharacterState::Stunned
        } else {
            CharacterState::Running
        };
        let strike = Strike {
            origin: self.attack_origin(frame),
            radius: self.tuning.light_attack_radius,
            amount: self.tuning.light_attack_damage,
            is_charged: false,
        };

        self.state = CharacterState::Attacking;
        let report = self.combat.resolve(&strike, roster, frame);
        self.state = resume;
        report
    }

    /// Resolves a charged attack. Only valid from `Charging`.
    ///
    /// # Returns
    ///
    /// `None` if the character was not charging.
    pub fn resolve_charged_attack<H: Host>(
        &mut self,
        roster: &mut Roster,
        frame: &mut Frame<'_, H>,
    ) -> Option<StrikeReport> {
        if self.state != CharacterState::Charging {
            debug!(state = ?self.state, "charged release ignored");
            return None;
        }
        let strike = Strike {
            origin: self.attack_origin(frame),
            radius: self.tuning.charged_attack_radius,
            amount: self.tuning.charged_attack_damage,
            is_charged: true,
        };

        self.state = CharacterState::Attacking;
        let report = self.combat.resolve(&strike, roster, frame);
        self.state = CharacterState::Running;
        Some(report)
    }

    /// Toggles gravity direction and orientation. No-op while stunned.
    pub fn flip_gravity<H: Host>(&mut self, frame: &mut Frame<'_, H>) {
        if self.state == CharacterState::Stunned {
            debug!(state = ?self.state, "gravity flip ignored");
            return;
        }
        self.flags.toggle(CharacterFlags::GRAVITY_FLIPPED);
        let flipped = self.is_gravity_flipped();
        let scale = if flipped {
            -self.tuning.gravity_scale
        } else {
            self.tuning.gravity_scale
        };
        frame.host.set_gravity_scale(self.handle, scale);
        frame.host.set_orientation(self.handle, flipped);
        debug!(flipped, "gravity flipped");
    }

    fn attack_origin<H: Host>(&self, frame: &Frame<'_, H>) -> Vec2 {
        let position = frame.host.position(self.handle).unwrap_or(Vec2::ZERO);
        position + Vec2::new(self.tuning.attack_reach, 0.0)
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Probes for ground in the direction gravity pulls and updates
    /// [`CharacterFlags::GROUNDED`].
    pub fn sense_ground<H: Host>(&mut self, frame: &Frame<'_, H>) {
        let Some(position) = frame.host.position(self.handle) else {
            return;
        };
        let direction = if self.is_gravity_flipped() {
            Vec2::Y
        } else {
            Vec2::NEG_Y
        };
        let grounded = frame
            .host
            .ground_probe(position, direction, self.tuning.ground_probe_distance);
        if grounded != self.is_grounded() {
            trace!(grounded, "grounding changed");
        }
        self.flags.set(CharacterFlags::GROUNDED, grounded);
    }

    /// Accelerates toward the session's target speed.
    ///
    /// Horizontal velocity moves toward the target by at most
    /// `acceleration * dt` and never overshoots. A character already at or
    /// above the target keeps its velocity; there is no deceleration.
    /// Skipped while stunned or sliding.
    pub fn advance_movement<H: Host>(&mut self, dt: f32, frame: &mut Frame<'_, H>) {
        if self.state == CharacterState::Stunned || self.slide.is_some() {
            return;
        }
        let Some(velocity) = frame.host.velocity(self.handle) else {
            return;
        };
        let target = frame.session.target_speed();
        if velocity.x >= target {
            return;
        }
        let vx = move_towards(velocity.x, target, self.tuning.acceleration * dt);
        frame.host.set_velocity(self.handle, Vec2::new(vx, velocity.y));
    }

    /// Advances the knockback slide by one tick.
    pub fn resume_knockback<H: Host>(&mut self, dt: f32, frame: &mut Frame<'_, H>) {
        let Some(slide) = self.slide.as_mut() else {
            return;
        };
        let step = slide.resume(f64::from(dt));
        let position = frame.host.position(self.handle).unwrap_or(Vec2::ZERO);
        let vy = frame.host.velocity(self.handle).map_or(0.0, |v| v.y);

        let x = match step {
            SlideStep::Moving(x) => x,
            SlideStep::Finished(x) => {
                self.slide = None;
                trace!(x, "knockback slide finished");
                x
            }
        };
        frame.host.set_position(self.handle, Vec2::new(x, position.y));
        frame.host.set_velocity(self.handle, Vec2::new(0.0, vy));
    }

    // ========================================================================
    // Damage
    // ========================================================================

    /// Applies one damage instance.
    ///
    /// Ignored while dead or inside the knockback cooldown. Otherwise the
    /// cooldown starts before health is touched, so no two hits can land
    /// within one cooldown window.
    ///
    /// # Arguments
    ///
    /// * `amount` - Health to remove
    /// * `direction` - Direction of the hit; the slide always goes backward
    /// * `frame` - Host and bookkeeping for the current tick
    pub fn apply_damage<H: Host>(
        &mut self,
        amount: i32,
        direction: Vec2,
        frame: &mut Frame<'_, H>,
    ) {
        if self.is_dead() || self.is_in_knockback() {
            debug!(amount, flags = ?self.flags, "damage ignored");
            return;
        }

        self.flags.insert(CharacterFlags::KNOCKBACK);
        frame.after(self.tuning.knockback_cooldown, Deferred::ClearKnockback);

        if self.tuning.no_damage_mode {
            debug!(amount, "no-damage mode, health untouched");
            self.start_knockback(direction, frame);
            return;
        }

        self.health = (self.health - amount.max(0)).max(0);
        debug!(amount, health = self.health, "player hit");
        frame.publish(GameEvent::HealthChanged {
            current: self.health,
            max: self.tuning.max_health,
        });

        if self.health == 0 {
            self.die(frame);
        } else {
            self.start_knockback(direction, frame);
        }
    }

    /// Ends the knockback cooldown.
    pub fn clear_knockback(&mut self) {
        self.flags.remove(CharacterFlags::KNOCKBACK);
    }

    /// Lets a held flash start fading.
    pub fn release_flash(&mut self) {
        self.flash.release();
    }

    /// Advances the flash fade; returns the tint to push if it changed.
    pub fn present(&mut self, dt: f32) -> Option<Tint> {
        self.flash.present(dt)
    }

    /// Kills the character. Idempotent.
    pub fn die<H: Host>(&mut self, frame: &mut Frame<'_, H>) {
        if self.is_dead() {
            return;
        }
        self.flags.insert(CharacterFlags::DEAD);
        self.state = CharacterState::Stunned;
        self.slide = None;

        let vy = frame.host.velocity(self.handle).map_or(0.0, |v| v.y);
        frame.host.set_velocity(self.handle, Vec2::new(0.0, vy));

        info!(handle = %self.handle, "player died");
        frame.publish(GameEvent::PlayerDied);
        frame.session.game_over(frame.events);
    }

    /// Restores full health and the initial state.
    ///
    /// Only used by a full restart. Gravity and orientation are restored on
    /// the host and the knockback slide is dropped.
    pub fn reset<H: Host>(&mut self, frame: &mut Frame<'_, H>) {
        self.health = self.tuning.max_health;
        self.state = CharacterState::Running;
        self.flags = CharacterFlags::empty();
        self.slide = None;
        self.flash = FlashFx::default();

        frame.host.set_gravity_scale(self.handle, self.tuning.gravity_scale);
        frame.host.set_orientation(self.handle, false);
        frame.host.set_tint(self.handle, Tint::WHITE);
        frame.publish(GameEvent::HealthChanged {
            current: self.health,
            max: self.tuning.max_health,
        });
    }

    fn start_knockback<H: Host>(&mut self, direction: Vec2, frame: &mut Frame<'_, H>) {
        let x = frame.host.position(self.handle).map_or(0.0, |p| p.x);
        trace!(?direction, from = x, "knockback");
        self.slide = Some(KnockbackSlide::new(
            x,
            self.tuning.knockback_force * 0.5,
            self.tuning.knockback_duration,
        ));

        let tint = self.flash.flash(Tint::DAMAGE);
        frame.host.set_tint(self.handle, tint);
        frame.after(self.tuning.flash_duration, Deferred::ResetFlash(self.handle));
    }
}

/// Moves `current` toward `target` by at most `max_delta`.
fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}
