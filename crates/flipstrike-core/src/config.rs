//! Gameplay tuning.
//!
//! All timing windows, damage numbers and speeds live in [`GameConfig`]. The
//! defaults are the shipped tuning; hosts may deserialize overrides (every
//! group is `#[serde(default)]`, so partial documents work) but the core
//! itself never touches the filesystem.
//!
//! # Example
//!
//! ```
//! use flipstrike_core::config::GameConfig;
//!
//! let mut config = GameConfig::default();
//! assert!(config.validate().is_ok());
//!
//! config.input.hold_threshold = 0.0;
//! assert!(config.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::adversary::AdversaryKind;
use crate::error::ConfigError;

/// Fixed logic tick (1/60 second).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Complete tuning for one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Length of one fixed logic tick in seconds.
    pub fixed_dt: f32,
    /// Master seed for every pseudo-random source in the world.
    pub seed: u64,
    /// Gesture timing windows.
    pub input: InputTiming,
    /// Player tuning.
    pub character: CharacterTuning,
    /// Score and scroll speed tuning.
    pub session: SessionTuning,
    /// Adversary stat table and movement tuning.
    pub adversaries: AdversaryTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: FIXED_DT,
            seed: 0,
            input: InputTiming::default(),
            character: CharacterTuning::default(),
            session: SessionTuning::default(),
            adversaries: AdversaryTuning::default(),
        }
    }
}

impl GameConfig {
    /// Checks every group for values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("fixed_dt", self.fixed_dt)?;
        self.input.validate()?;
        self.character.validate()?;
        self.session.validate()?;
        self.adversaries.validate()
    }
}

/// Timing windows of the gesture classifier, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTiming {
    /// A press held at least this long becomes a charge.
    pub hold_threshold: f64,
    /// Maximum gap between a tap's release and the next press for a double tap.
    pub double_tap_window: f64,
}

impl Default for InputTiming {
    fn default() -> Self {
        Self {
            hold_threshold: 0.3,
            double_tap_window: 0.25,
        }
    }
}

impl InputTiming {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("input.hold_threshold", self.hold_threshold)?;
        positive("input.double_tap_window", self.double_tap_window)
    }
}

/// Player tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    /// Starting and maximum health.
    pub max_health: i32,
    /// Horizontal acceleration toward the target speed, units per second squared.
    pub acceleration: f32,
    /// Damage of a light attack.
    pub light_attack_damage: i32,
    /// Damage of a charged attack.
    pub charged_attack_damage: i32,
    /// Radius of the light attack area.
    pub light_attack_radius: f32,
    /// Radius of the charged attack area.
    pub charged_attack_radius: f32,
    /// Forward offset of the attack origin from the body position.
    pub attack_reach: f32,
    /// Knockback strength; the slide covers half of it.
    pub knockback_force: f32,
    /// Length of the knockback slide in seconds.
    pub knockback_duration: f64,
    /// Window after a hit during which further damage is ignored.
    pub knockback_cooldown: f64,
    /// How long the damage tint stays before fading back.
    pub flash_duration: f64,
    /// Distance at which a live adversary counts as touching the player.
    pub contact_radius: f32,
    /// Length of the ground probe cast along gravity.
    pub ground_probe_distance: f32,
    /// Magnitude of the gravity scale; its sign follows the flip state.
    pub gravity_scale: f32,
    /// Testing mode: hits knock back and flash but never reduce health.
    pub no_damage_mode: bool,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            acceleration: 10.0,
            light_attack_damage: 25,
            charged_attack_damage: 60,
            light_attack_radius: 1.5,
            charged_attack_radius: 3.0,
            attack_reach: 0.75,
            knockback_force: 4.0,
            knockback_duration: 0.25,
            knockback_cooldown: 1.0,
            flash_duration: 0.1,
            contact_radius: 0.8,
            ground_probe_distance: 0.6,
            gravity_scale: 1.0,
            no_damage_mode: false,
        }
    }
}

impl CharacterTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("character.max_health", f64::from(self.max_health))?;
        positive("character.acceleration", self.acceleration)?;
        non_negative("character.light_attack_damage", f64::from(self.light_attack_damage))?;
        non_negative("character.charged_attack_damage", f64::from(self.charged_attack_damage))?;
        positive("character.light_attack_radius", self.light_attack_radius)?;
        positive("character.charged_attack_radius", self.charged_attack_radius)?;
        non_negative("character.attack_reach", self.attack_reach)?;
        non_negative("character.knockback_force", self.knockback_force)?;
        positive("character.knockback_duration", self.knockback_duration)?;
        positive("character.knockback_cooldown", self.knockback_cooldown)?;
        positive("character.flash_duration", self.flash_duration)?;
        positive("character.contact_radius", self.contact_radius)?;
        positive("character.ground_probe_distance", self.ground_probe_distance)?;
        positive("character.gravity_scale", self.gravity_scale)
    }
}

/// Score and scroll speed tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Target speed at score zero.
    pub base_speed: f32,
    /// Extra target speed per point of score.
    pub speed_rate: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            speed_rate: 0.1,
        }
    }
}

impl SessionTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("session.base_speed", self.base_speed)?;
        non_negative("session.speed_rate", self.speed_rate)
    }
}

/// One row of the adversary stat table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdversaryStats {
    /// Starting health.
    pub health: i32,
    /// Contact damage dealt to the player.
    pub damage: i32,
    /// Base travel speed.
    pub move_speed: f32,
    /// Light attacks only flash this kind.
    pub immune_to_light: bool,
    /// Score awarded for a kill.
    pub score_value: f32,
}

/// Adversary stat table and movement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversaryTuning {
    /// Stats of the Basic kind.
    pub basic: AdversaryStats,
    /// Stats of the Medium kind.
    pub medium: AdversaryStats,
    /// Stats of the Unexpected kind.
    pub unexpected: AdversaryStats,
    /// Amplitude of the Medium speed oscillation.
    pub oscillation_amplitude: f32,
    /// Angular frequency of the Medium speed oscillation, radians per second.
    pub oscillation_frequency: f32,
    /// Lower bound of the Unexpected speed range.
    pub erratic_min_speed: f32,
    /// Upper bound of the Unexpected speed range; also the punitive speed.
    pub erratic_max_speed: f32,
    /// Seconds between Unexpected speed re-samples.
    pub erratic_interval: f64,
    /// How long the hit tint stays before fading back.
    pub flash_duration: f64,
    /// Delay between death and removal from the host.
    pub removal_delay: f64,
}

impl Default for AdversaryTuning {
    fn default() -> Self {
        Self {
            basic: AdversaryStats {
                health: 1,
                damage: 10,
                move_speed: 3.0,
                immune_to_light: false,
                score_value: 5.0,
            },
            medium: AdversaryStats {
                health: 50,
                damage: 15,
                move_speed: 2.5,
                immune_to_light: false,
                score_value: 15.0,
            },
            unexpected: AdversaryStats {
                health: 100,
                damage: 40,
                move_speed: 4.0,
                immune_to_light: true,
                score_value: 40.0,
            },
            oscillation_amplitude: 1.5,
            oscillation_frequency: 2.0,
            erratic_min_speed: 1.5,
            erratic_max_speed: 7.0,
            erratic_interval: 0.8,
            flash_duration: 0.1,
            removal_delay: 1.0,
        }
    }
}

impl AdversaryTuning {
    /// Returns the stat row for `kind`.
    #[must_use]
    pub const fn stats_for(&self, kind: AdversaryKind) -> &AdversaryStats {
        match kind {
            AdversaryKind::Basic => &self.basic,
            AdversaryKind::Medium => &self.medium,
            AdversaryKind::Unexpected => &self.unexpected,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for kind in AdversaryKind::ALL {
            let stats = self.stats_for(kind);
            if stats.health <= 0 {
                return Err(ConfigError::NonPositiveHealth {
                    kind,
                    health: stats.health,
                });
            }
            non_negative("adversaries.damage", f64::from(stats.damage))?;
            non_negative("adversaries.move_speed", stats.move_speed)?;
            non_negative("adversaries.score_value", stats.score_value)?;
        }
        non_negative("adversaries.oscillation_amplitude", self.oscillation_amplitude)?;
        non_negative("adversaries.oscillation_frequency", self.oscillation_frequency)?;
        if !(self.erratic_min_speed >= 0.0 && self.erratic_min_speed < self.erratic_max_speed) {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.erratic_min_speed,
                max: self.erratic_max_speed,
            });
        }
        positive("adversaries.erratic_interval", self.erratic_interval)?;
        positive("adversaries.flash_duration", self.flash_duration)?;
        positive("adversaries.removal_delay", self.removal_delay)
    }
}

fn positive(field: &'static str, value: impl Into<f64>) -> Result<(), ConfigError> {
    let value = value.into();
    // NaN fails this comparison too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: impl Into<f64>) -> Result<(), ConfigError> {
    let value = value.into();
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
