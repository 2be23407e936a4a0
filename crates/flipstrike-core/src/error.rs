//! Error types.
//!
//! Nothing inside a tick fails: guarded transitions are traced no-ops. The
//! only errors the core reports are configuration and wiring problems, which
//! the host sees once, at startup, from [`WorldBuilder::build`].
//!
//! [`WorldBuilder::build`]: crate::world::WorldBuilder::build

use thiserror::Error;

use crate::adversary::AdversaryKind;
use crate::entity::Handle;

/// Invalid tuning values in a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A duration, radius, rate or speed that must be strictly positive was not.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A value that may be zero was negative.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The erratic speed range is empty or inverted.
    #[error("erratic speed range is invalid: min {min} must be below max {max}")]
    InvalidSpeedRange {
        /// Lower bound of the range.
        min: f32,
        /// Upper bound of the range.
        max: f32,
    },

    /// An adversary kind was configured with no health.
    #[error("{kind:?} adversaries must start with positive health, got {health}")]
    NonPositiveHealth {
        /// The misconfigured kind.
        kind: AdversaryKind,
        /// The rejected health value.
        health: i32,
    },
}

/// Problems detected while wiring a [`World`](crate::world::World) to its host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WiringError {
    /// `build` was called without a host.
    #[error("no host was provided; the world needs collision, bodies, visuals and lifecycle")]
    MissingHost,

    /// `build` was called without naming the player body.
    #[error("no player body was registered")]
    MissingPlayer,

    /// The player handle does not refer to a body the host knows about.
    #[error("player body {0} is unknown to the host")]
    UnknownPlayerBody(Handle),

    /// The supplied configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
