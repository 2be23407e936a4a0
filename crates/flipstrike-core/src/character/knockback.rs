//! Knockback slide.
//!
//! A hit pushes the character backward along x over a fixed duration with an
//! ease-out cubic curve. The slide is resumed once per fixed tick and ends
//! exactly on its target.

/// Ease-out cubic: fast start, gentle stop. `t` is clamped to `[0, 1]`.
#[must_use]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Where the slide puts the character after one resume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideStep {
    /// Still sliding; x for this tick.
    Moving(f32),
    /// Arrived; final x.
    Finished(f32),
}

/// An in-progress knockback slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnockbackSlide {
    start_x: f32,
    end_x: f32,
    elapsed: f64,
    duration: f64,
}

impl KnockbackSlide {
    /// Starts a slide from `start_x` to `start_x - distance`.
    #[must_use]
    pub fn new(start_x: f32, distance: f32, duration: f64) -> Self {
        Self {
            start_x,
            end_x: start_x - distance,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Target x.
    #[must_use]
    pub const fn end_x(&self) -> f32 {
        self.end_x
    }

    /// Advances the slide by `dt` seconds.
    pub fn resume(&mut self, dt: f64) -> SlideStep {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            return SlideStep::Finished(self.end_x);
        }
        #[allow(clippy::cast_possible_truncation)]
        let t = (self.elapsed / self.duration) as f32;
        SlideStep::Moving(self.start_x + (self.end_x - self.start_x) * ease_out_cubic(t))
    }
}
