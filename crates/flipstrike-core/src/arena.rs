//! In-memory reference host.
//!
//! `Arena` implements every [`host`](crate::host) contract over a flat
//! corridor: a floor at `stage.floor`, a ceiling at `stage.ceiling`, and
//! point bodies pulled toward one or the other by gravity. It is what the
//! tests and the headless runner wire the core to; a game would replace it
//! with its physics engine and renderer.
//!
//! # Determinism
//!
//! Bodies are stored in a `BTreeMap` keyed by [`Handle`] and handles are
//! allocated monotonically, so iteration order is the spawn order on every
//! platform.
//!
//! # Spatial Index Synchronization
//!
//! Area queries go through a [`SpatialIndex`]. The arena keeps it in sync
//! itself: spawning, removal, `set_position` and `integrate` all update it.
//!
//! # Example
//!
//! ```
//! use flipstrike_core::adversary::AdversaryKind;
//! use flipstrike_core::arena::Arena;
//! use flipstrike_core::entity::BodyTag;
//! use flipstrike_core::host::{CollisionSpace, Lifecycle};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let player = arena.spawn_player(Vec2::new(0.0, 0.0));
//! let enemy = arena.spawn(AdversaryKind::Basic, Vec2::new(1.0, 0.0), false);
//!
//! let near = arena.area_query(Vec2::ZERO, 2.0, BodyTag::Adversary);
//! assert_eq!(near, vec![enemy]);
//! assert!(!near.contains(&player));
//! ```

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::adversary::AdversaryKind;
use crate::entity::{BodyTag, Handle};
use crate::host::{Bodies, CollisionSpace, Lifecycle, VisualFeedback};
use crate::visual::Tint;

// =============================================================================
// Stage
// =============================================================================

/// Geometry and gravity of the corridor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Height of the floor surface.
    pub floor: f32,
    /// Height of the ceiling surface.
    pub ceiling: f32,
    /// Gravity acceleration for a body with gravity scale 1 (negative is down).
    pub gravity: f32,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            floor: 0.0,
            ceiling: 6.0,
            gravity: -20.0,
        }
    }
}

// =============================================================================
// Spatial Index
// =============================================================================

/// Position index for radius queries.
///
/// A full scan over a `HashMap`. The corridor rarely holds more than a
/// dozen bodies, so nothing smarter is needed. Results are sorted by handle,
/// which hides the map's iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpatialIndex {
    entries: HashMap<Handle, (Vec2, BodyTag)>,
}

impl SpatialIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts or moves a body.
    pub fn insert(&mut self, handle: Handle, position: Vec2, tag: BodyTag) {
        self.entries.insert(handle, (position, tag));
    }

    /// Forgets a body.
    pub fn remove(&mut self, handle: Handle) {
        self.entries.remove(&handle);
    }

    /// Moves a known body. Returns false if the body is not indexed.
    pub fn update(&mut self, handle: Handle, position: Vec2) -> bool {
        match self.entries.get_mut(&handle) {
            Some(entry) => {
                entry.0 = position;
                true
            }
            None => false,
        }
    }

    /// Bodies tagged `filter` within `radius` of `center`, sorted by handle.
    #[must_use]
    pub fn query_radius(&self, center: Vec2, radius: f32, filter: BodyTag) -> Vec<Handle> {
        let radius_sq = radius * radius;
        let mut results: Vec<Handle> = self
            .entries
            .iter()
            .filter(|(_, (pos, tag))| *tag == filter && center.distance_squared(*pos) <= radius_sq)
            .map(|(handle, _)| *handle)
            .collect();

        results.sort();
        results
    }

    /// Number of indexed bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Arena
// =============================================================================

/// One point body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Player or adversary.
    pub tag: BodyTag,
    /// Adversary kind, `None` for the player.
    pub kind: Option<AdversaryKind>,
    /// World position.
    pub position: Vec2,
    /// World velocity.
    pub velocity: Vec2,
    /// Gravity multiplier; negative pulls toward the ceiling.
    pub gravity_scale: f32,
    /// Last tint pushed by the core.
    pub tint: Tint,
    /// Last orientation pushed by the core.
    pub flipped: bool,
}

impl Body {
    fn new(tag: BodyTag, kind: Option<AdversaryKind>, position: Vec2, flipped: bool) -> Self {
        Self {
            tag,
            kind,
            position,
            velocity: Vec2::ZERO,
            gravity_scale: if flipped { -1.0 } else { 1.0 },
            tint: Tint::WHITE,
            flipped,
        }
    }
}

/// Reference host: bodies in a floor-and-ceiling corridor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    next_id: u64,
    bodies: BTreeMap<Handle, Body>,
    spatial: SpatialIndex,
    stage: Stage,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Creates an empty arena with the default stage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stage(Stage::default())
    }

    /// Creates an empty arena with a custom stage.
    #[must_use]
    pub fn with_stage(stage: Stage) -> Self {
        Self {
            next_id: 0,
            bodies: BTreeMap::new(),
            spatial: SpatialIndex::new(),
            stage,
        }
    }

    /// Adds the player body and returns its handle.
    pub fn spawn_player(&mut self, position: Vec2) -> Handle {
        self.insert(Body::new(BodyTag::Player, None, position, false))
    }

    /// Stage geometry.
    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Looks up a body.
    #[must_use]
    pub fn body(&self, handle: Handle) -> Option<&Body> {
        self.bodies.get(&handle)
    }

    /// Looks up a body mutably.
    ///
    /// Call [`Bodies::set_position`] rather than writing `position` directly
    /// if the spatial index must follow.
    #[must_use]
    pub fn body_mut(&mut self, handle: Handle) -> Option<&mut Body> {
        self.bodies.get_mut(&handle)
    }

    /// Handles in spawn order.
    pub fn handles_sorted(&self) -> impl Iterator<Item = Handle> + '_ {
        self.bodies.keys().copied()
    }

    /// Number of bodies, player included.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Read access to the spatial index.
    #[must_use]
    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    fn insert(&mut self, body: Body) -> Handle {
        let handle = Handle::new(self.next_id);
        self.next_id += 1;
        self.spatial.insert(handle, body.position, body.tag);
        self.bodies.insert(handle, body);
        handle
    }

    /// Keeps a body between floor and ceiling, killing velocity into the surface.
    fn confine(stage: &Stage, body: &mut Body) {
        if body.position.y < stage.floor {
            body.position.y = stage.floor;
            body.velocity.y = body.velocity.y.max(0.0);
        } else if body.position.y > stage.ceiling {
            body.position.y = stage.ceiling;
            body.velocity.y = body.velocity.y.min(0.0);
        }
    }
}

impl CollisionSpace for Arena {
    fn area_query(&self, origin: Vec2, radius: f32, filter: BodyTag) -> Vec<Handle> {
        self.spatial.query_radius(origin, radius, filter)
    }

    fn ground_probe(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> bool {
        let gap = if direction.y < 0.0 {
            origin.y - self.stage.floor
        } else if direction.y > 0.0 {
            self.stage.ceiling - origin.y
        } else {
            return false;
        };
        (0.0..=max_distance).contains(&gap)
    }
}

impl Bodies for Arena {
    fn contains(&self, handle: Handle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn position(&self, handle: Handle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|body| body.position)
    }

    fn set_position(&mut self, handle: Handle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = position;
            self.spatial.update(handle, position);
        }
    }

    fn velocity(&self, handle: Handle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|body| body.velocity)
    }

    fn set_velocity(&mut self, handle: Handle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = velocity;
        }
    }

    fn set_gravity_scale(&mut self, handle: Handle, scale: f32) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.gravity_scale = scale;
        }
    }

    fn integrate(&mut self, dt: f32) {
        let stage = self.stage;
        for (handle, body) in &mut self.bodies {
            body.velocity.y += stage.gravity * body.gravity_scale * dt;
            body.position += body.velocity * dt;
            Self::confine(&stage, body);
            self.spatial.update(*handle, body.position);
        }
    }
}

impl VisualFeedback for Arena {
    fn set_tint(&mut self, handle: Handle, tint: Tint) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.tint = tint;
        }
    }

    fn set_orientation(&mut self, handle: Handle, flipped: bool) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.flipped = flipped;
        }
    }
}

impl Lifecycle for Arena {
    fn spawn(&mut self, kind: AdversaryKind, position: Vec2, flipped: bool) -> Handle {
        let handle = self.insert(Body::new(BodyTag::Adversary, Some(kind), position, flipped));
        trace!(%handle, ?kind, flipped, "adversary body spawned");
        handle
    }

    fn remove(&mut self, handle: Handle) {
        self.spatial.remove(handle);
        if self.bodies.remove(&handle).is_some() {
            trace!(%handle, "body removed");
        }
    }
}
