//! # Flipstrike Core
//!
//! Gameplay core of a one-button side-scrolling action game.
//!
//! A single binary "pressed" signal is classified into four gestures (light
//! attack, charge start, charged release, gravity flip) that drive a player
//! character through movement, combat, knockback and death, against a small
//! roster of adversary kinds. Everything runs on a deterministic fixed tick.
//!
//! ## Architecture
//!
//! - **Input**: [`input::InputClassifier`] turns button edges into gestures
//! - **Character**: [`character::Character`] reacts to gestures and damage
//! - **Combat**: [`combat::CombatResolver`] applies strikes to the roster
//! - **Adversaries**: [`adversary::Adversary`] movement and hit reactions
//! - **Session**: [`session::SessionTracker`] state, score and scroll speed
//! - **World**: [`world::World`] owns all of the above and runs the tick
//!
//! Physics, visuals and body lifecycle belong to the host, reached through
//! the traits in [`host`]. [`arena::Arena`] is an in-memory reference host.
//!
//! ## Usage
//!
//! ```
//! use flipstrike_core::{Arena, World};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn_player(Vec2::ZERO);
//! let mut world = World::builder().host(arena).player(player).build()?;
//!
//! world.start();
//! for _ in 0..60 {
//!     world.step_level(false);
//! }
//! assert!(world.session().score() > 0.0);
//! # Ok::<(), flipstrike_core::WiringError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adversary;
pub mod arena;
pub mod character;
pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod frame;
pub mod host;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod visual;
pub mod world;

pub use adversary::{Adversary, AdversaryKind};
pub use arena::Arena;
pub use character::{Character, CharacterFlags, CharacterState};
pub use config::GameConfig;
pub use entity::{BodyTag, Handle};
pub use error::{ConfigError, WiringError};
pub use events::GameEvent;
pub use host::Host;
pub use input::{ButtonEdges, GestureEvent};
pub use session::SessionState;
pub use world::World;

#[cfg(test)]
mod tests;
