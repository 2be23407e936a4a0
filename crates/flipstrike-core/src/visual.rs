//! Hit flashes.
//!
//! Taking a hit tints a body immediately. The tint is held until a deferred
//! `ResetFlash` fires, after which the presentation tick eases the color back
//! to the body's base tint. None of this feeds back into gameplay.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Fade speed of the presentation-tick interpolation, per second.
const FADE_RATE: f32 = 12.0;

/// Distance below which the fade snaps to its target.
const SNAP_EPSILON: f32 = 1e-3;

/// RGBA color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint(pub Vec4);

impl Tint {
    /// Untinted.
    pub const WHITE: Self = Self(Vec4::new(1.0, 1.0, 1.0, 1.0));
    /// Damage taken.
    pub const DAMAGE: Self = Self(Vec4::new(1.0, 0.2, 0.2, 1.0));
    /// Hit absorbed by an immunity.
    pub const BLOCKED: Self = Self(Vec4::new(0.6, 0.7, 1.0, 1.0));

    /// Creates a tint from components.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(Vec4::new(r, g, b, a))
    }

    /// Linear interpolation toward `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self(self.0.lerp(other.0, t.clamp(0.0, 1.0)))
    }

    /// Euclidean distance between the two colors.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.0.distance(other.0)
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Flash state of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlashFx {
    base: Tint,
    current: Tint,
    target: Tint,
}

impl FlashFx {
    /// A body resting at `base`.
    #[must_use]
    pub const fn new(base: Tint) -> Self {
        Self {
            base,
            current: base,
            target: base,
        }
    }

    /// Jumps to `color` and holds it until [`release`](Self::release).
    ///
    /// # Returns
    ///
    /// The color to push to the visual sink right away.
    pub fn flash(&mut self, color: Tint) -> Tint {
        self.current = color;
        self.target = color;
        color
    }

    /// Starts fading back to the base color.
    pub fn release(&mut self) {
        self.target = self.base;
    }

    /// Advances the fade by one presentation frame.
    ///
    /// # Returns
    ///
    /// The new color if it changed this frame, `None` when already settled.
    pub fn present(&mut self, dt: f32) -> Option<Tint> {
        if self.current == self.target {
            return None;
        }
        let t = 1.0 - (-FADE_RATE * dt.max(0.0)).exp();
        let next = self.current.lerp(self.target, t);
        self.current = if next.distance(self.target) < SNAP_EPSILON {
            self.target
        } else {
            next
        };
        Some(self.current)
    }

    /// Color currently shown.
    #[must_use]
    pub const fn current(&self) -> Tint {
        self.current
    }

    /// Returns true while a flash is held or fading.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current != self.base || self.target != self.base
    }
}

impl Default for FlashFx {
    fn default() -> Self {
        Self::new(Tint::WHITE)
    }
}
