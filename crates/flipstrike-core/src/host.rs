//! Contracts the core consumes from its host.
//!
//! The gameplay core does not own physics, rendering or object lifecycle.
//! It talks to them through four capability traits:
//!
//! - [`CollisionSpace`]: area overlap queries and ground probes
//! - [`Bodies`]: velocity integration and body transforms
//! - [`VisualFeedback`]: fire-and-forget tint and orientation changes
//! - [`Lifecycle`]: spawning and removing adversary bodies
//!
//! [`Host`] is implemented for every type providing all four, so a host is
//! usually a single struct (see [`Arena`](crate::arena::Arena)). Because the
//! world is generic over `H: Host`, a host lacking any capability is rejected
//! at compile time; the remaining wiring checks happen in
//! [`WorldBuilder::build`](crate::world::WorldBuilder::build).

use glam::Vec2;

use crate::adversary::AdversaryKind;
use crate::entity::{BodyTag, Handle};
use crate::visual::Tint;

/// Spatial queries against the physics scene.
pub trait CollisionSpace {
    /// Returns the bodies tagged `filter` whose position lies within `radius`
    /// of `origin`, sorted by handle.
    fn area_query(&self, origin: Vec2, radius: f32, filter: BodyTag) -> Vec<Handle>;

    /// Returns true if solid ground lies within `max_distance` of `origin`
    /// along `direction`.
    fn ground_probe(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> bool;
}

/// Rigid-body state owned by the physics engine.
pub trait Bodies {
    /// Returns true if the host knows `handle`.
    fn contains(&self, handle: Handle) -> bool;

    /// Current position of a body.
    fn position(&self, handle: Handle) -> Option<Vec2>;

    /// Teleports a body.
    fn set_position(&mut self, handle: Handle, position: Vec2);

    /// Current velocity of a body.
    fn velocity(&self, handle: Handle) -> Option<Vec2>;

    /// Overwrites the velocity of a body.
    fn set_velocity(&mut self, handle: Handle, velocity: Vec2);

    /// Sets the gravity multiplier of a body; negative values pull upward.
    fn set_gravity_scale(&mut self, handle: Handle, scale: f32);

    /// Integrates every body over `dt` seconds.
    fn integrate(&mut self, dt: f32);
}

/// Presentation side effects. Nothing is returned to the core.
pub trait VisualFeedback {
    /// Tints a body.
    fn set_tint(&mut self, handle: Handle, tint: Tint);

    /// Mirrors a body vertically when `flipped`.
    fn set_orientation(&mut self, handle: Handle, flipped: bool);
}

/// Creation and destruction of adversary bodies.
pub trait Lifecycle {
    /// Creates an adversary body and returns its handle.
    fn spawn(&mut self, kind: AdversaryKind, position: Vec2, flipped: bool) -> Handle;

    /// Destroys a body. Unknown handles are ignored.
    fn remove(&mut self, handle: Handle);
}

/// Everything a [`World`](crate::world::World) needs from its host.
pub trait Host: CollisionSpace + Bodies + VisualFeedback + Lifecycle {}

impl<T> Host for T where T: CollisionSpace + Bodies + VisualFeedback + Lifecycle {}
