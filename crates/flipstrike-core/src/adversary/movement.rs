//! Movement policies of the three adversary kinds.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::AdversaryKind;
use crate::config::AdversaryTuning;
use crate::entity::Handle;

/// How an adversary's travel speed evolves over its lifetime.
#[derive(Debug, Clone)]
pub enum Movement {
    /// Always the base speed.
    Constant,
    /// Base speed plus `amplitude * sin(frequency * age)`.
    Oscillating {
        /// Peak deviation from the base speed.
        amplitude: f32,
        /// Angular frequency in radians per second.
        frequency: f32,
    },
    /// A uniform sample from `[min, max)`, redrawn every `interval` seconds.
    Erratic {
        /// Lower bound of the range.
        min: f32,
        /// Upper bound of the range.
        max: f32,
        /// Seconds between samples.
        interval: f64,
        /// Speed in effect.
        current: f32,
        /// Age at which the next sample is drawn.
        next_change_at: f64,
        /// Private random stream.
        rng: ChaCha8Rng,
    },
}

impl Movement {
    /// Builds the policy for `kind`.
    ///
    /// Erratic movers get their own random stream derived from `seed` and
    /// `handle`, so a given adversary behaves the same regardless of what
    /// else was spawned before it.
    #[must_use]
    pub fn for_kind(
        kind: AdversaryKind,
        tuning: &AdversaryTuning,
        seed: u64,
        handle: Handle,
    ) -> Self {
        match kind {
            AdversaryKind::Basic => Self::Constant,
            AdversaryKind::Medium => Self::Oscillating {
                amplitude: tuning.oscillation_amplitude,
                frequency: tuning.oscillation_frequency,
            },
            AdversaryKind::Unexpected => Self::Erratic {
                min: tuning.erratic_min_speed,
                max: tuning.erratic_max_speed,
                interval: tuning.erratic_interval,
                current: tuning
                    .unexpected
                    .move_speed
                    .clamp(tuning.erratic_min_speed, tuning.erratic_max_speed),
                next_change_at: tuning.erratic_interval,
                rng: ChaCha8Rng::seed_from_u64(stream_seed(seed, handle)),
            },
        }
    }

    /// Speed at `age` seconds after spawn.
    pub fn speed(&mut self, base: f32, age: f64) -> f32 {
        match self {
            Self::Constant => base,
            Self::Oscillating { amplitude, frequency } => {
                #[allow(clippy::cast_possible_truncation)]
                let phase = (f64::from(*frequency) * age) as f32;
                base + *amplitude * phase.sin()
            }
            Self::Erratic {
                min,
                max,
                interval,
                current,
                next_change_at,
                rng,
            } => {
                if age >= *next_change_at {
                    *current = rng.gen_range(*min..*max);
                    *next_change_at = age + *interval;
                }
                *current
            }
        }
    }

    /// Reaction to a blocked hit: erratic movers jump to their top speed
    /// until the next sample. Other policies ignore it.
    pub fn punish(&mut self) {
        if let Self::Erratic { max, current, .. } = self {
            *current = *max;
        }
    }
}

fn stream_seed(seed: u64, handle: Handle) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    handle.as_u64().hash(&mut hasher);
    hasher.finish()
}
