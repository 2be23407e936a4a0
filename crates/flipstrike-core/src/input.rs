//! One-button gesture classification.
//!
//! [`InputClassifier`] turns the raw edges of a single button into four
//! gestures:
//!
//! | Gesture            | Produced when                                          |
//! |--------------------|--------------------------------------------------------|
//! | `LightAttack`      | a press is released before the hold threshold          |
//! | `ChargeStart`      | a press is still held at the hold threshold            |
//! | `ChargedRelease`   | a charging press is released                           |
//! | `GravityFlip`      | a press lands within the double-tap window of a tap    |
//!
//! # Optimistic firing
//!
//! A quick release fires `LightAttack` immediately. The classifier never
//! waits to see whether a second tap follows, and never takes a fired gesture
//! back: a double tap yields two light attacks plus a gravity flip (emitted on
//! the second press). If no second press arrives the pending double tap just
//! expires silently.
//!
//! # Frame order
//!
//! Within one call to [`InputClassifier::update`] the press edge is handled
//! first, then the hold check, then the release edge, then the double-tap
//! timeout.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::InputTiming;

/// A gesture recognized from the button signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Quick tap: a light attack.
    LightAttack,
    /// The press crossed the hold threshold and started charging.
    ChargeStart,
    /// A charging press was released: a charged attack.
    ChargedRelease,
    /// Second press of a double tap.
    GravityFlip,
}

/// Button state sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEdges {
    /// The button went down this frame.
    pub pressed: bool,
    /// The button is down this frame.
    pub held: bool,
    /// The button went up this frame.
    pub released: bool,
}

impl ButtonEdges {
    /// No input this frame.
    pub const IDLE: Self = Self {
        pressed: false,
        held: false,
        released: false,
    };

    /// The button went down this frame.
    pub const PRESS: Self = Self {
        pressed: true,
        held: true,
        released: false,
    };

    /// The button stayed down.
    pub const HOLD: Self = Self {
        pressed: false,
        held: true,
        released: false,
    };

    /// The button came up this frame.
    pub const RELEASE: Self = Self {
        pressed: false,
        held: false,
        released: true,
    };

    /// Derives edges from the button level of the previous and current frame.
    ///
    /// # Example
    ///
    /// ```
    /// use flipstrike_core::input::ButtonEdges;
    ///
    /// assert_eq!(ButtonEdges::from_levels(false, true), ButtonEdges::PRESS);
    /// assert_eq!(ButtonEdges::from_levels(true, true), ButtonEdges::HOLD);
    /// assert_eq!(ButtonEdges::from_levels(true, false), ButtonEdges::RELEASE);
    /// assert_eq!(ButtonEdges::from_levels(false, false), ButtonEdges::IDLE);
    /// ```
    #[must_use]
    pub const fn from_levels(was_down: bool, is_down: bool) -> Self {
        Self {
            pressed: !was_down && is_down,
            held: is_down,
            released: was_down && !is_down,
        }
    }
}

/// Internal state of the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierState {
    /// When the current (or last) press started.
    pub press_start_time: Option<f64>,
    /// When the tap that opened the double-tap window was released.
    pub last_tap_time: Option<f64>,
    /// The button is down.
    pub is_held: bool,
    /// The current press crossed the hold threshold.
    pub is_charging: bool,
    /// A tap was released and the double-tap window is open.
    pub awaiting_second_tap: bool,
}

/// Classifies one button into gestures.
///
/// # Example
///
/// ```
/// use flipstrike_core::config::InputTiming;
/// use flipstrike_core::input::{ButtonEdges, GestureEvent, InputClassifier};
///
/// let mut classifier = InputClassifier::new(InputTiming::default());
///
/// assert!(classifier.update(ButtonEdges::PRESS, 0.0).is_empty());
/// let gestures = classifier.update(ButtonEdges::RELEASE, 0.1);
/// assert_eq!(gestures, vec![GestureEvent::LightAttack]);
/// ```
#[derive(Debug, Clone)]
pub struct InputClassifier {
    timing: InputTiming,
    state: ClassifierState,
}

impl InputClassifier {
    /// Creates a classifier with the given timing windows.
    #[must_use]
    pub fn new(timing: InputTiming) -> Self {
        Self {
            timing,
            state: ClassifierState::default(),
        }
    }

    /// Current classifier state.
    #[must_use]
    pub const fn state(&self) -> &ClassifierState {
        &self.state
    }

    /// Timing windows in use.
    #[must_use]
    pub const fn timing(&self) -> &InputTiming {
        &self.timing
    }

    /// Forgets any press in progress and any pending double tap.
    pub fn reset(&mut self) {
        self.state = ClassifierState::default();
    }

    /// Feeds one frame of button edges sampled at `now` (seconds).
    ///
    /// # Returns
    ///
    /// The gestures recognized this frame, in the order they occurred.
    pub fn update(&mut self, edges: ButtonEdges, now: f64) -> Vec<GestureEvent> {
        let mut gestures = Vec::new();

        if edges.pressed {
            self.on_press(now, &mut gestures);
        }
        if edges.held && self.state.is_held {
            self.on_hold(now, &mut gestures);
        }
        if edges.released {
            self.on_release(now, &mut gestures);
        }
        self.poll_timeout(now);

        for gesture in &gestures {
            debug!(?gesture, now, "gesture recognized");
        }
        gestures
    }

    fn on_press(&mut self, now: f64, gestures: &mut Vec<GestureEvent>) {
        self.state.press_start_time = Some(now);
        self.state.is_held = true;
        self.state.is_charging = false;

        if self.state.awaiting_second_tap && self.within_double_tap_window(now) {
            self.state.awaiting_second_tap = false;
            gestures.push(GestureEvent::GravityFlip);
        }
    }

    fn on_hold(&mut self, now: f64, gestures: &mut Vec<GestureEvent>) {
        if self.state.is_charging {
            return;
        }
        if self.held_for(now) >= self.timing.hold_threshold {
            self.state.is_charging = true;
            // A long hold always cancels a pending double tap.
            self.state.awaiting_second_tap = false;
            gestures.push(GestureEvent::ChargeStart);
        }
    }

    fn on_release(&mut self, now: f64, gestures: &mut Vec<GestureEvent>) {
        // Only a press this classifier saw can end in a gesture.
        if !self.state.is_held || self.state.press_start_time.is_none() {
            self.state.is_held = false;
            trace!(now, "release without a tracked press ignored");
            return;
        }
        self.state.is_held = false;

        if self.state.is_charging {
            self.state.is_charging = false;
            gestures.push(GestureEvent::ChargedRelease);
        } else if self.held_for(now) < self.timing.hold_threshold {
            gestures.push(GestureEvent::LightAttack);
            if !self.state.awaiting_second_tap {
                self.state.awaiting_second_tap = true;
                self.state.last_tap_time = Some(now);
            }
        } else {
            trace!(now, "long press released without charging; nothing emitted");
        }
    }

    fn poll_timeout(&mut self, now: f64) {
        if self.state.awaiting_second_tap && !self.within_double_tap_window(now) {
            self.state.awaiting_second_tap = false;
            trace!(now, "double-tap window expired");
        }
    }

    fn within_double_tap_window(&self, now: f64) -> bool {
        self.state
            .last_tap_time
            .is_some_and(|tap| now - tap <= self.timing.double_tap_window)
    }

    fn held_for(&self, now: f64) -> f64 {
        self.state.press_start_time.map_or(0.0, |start| now - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 1.0 / 60.0;

    fn classifier() -> InputClassifier {
        InputClassifier::new(InputTiming::default())
    }

    /// Presses at `start`, holds every frame for `duration`, releases at `start + duration`.
    fn press_for(
        classifier: &mut InputClassifier,
        start: f64,
        duration: f64,
    ) -> Vec<Vec<GestureEvent>> {
        let mut frames = vec![classifier.update(ButtonEdges::PRESS, start)];
        let mut t = start + DT;
        while t < start + duration {
            frames.push(classifier.update(ButtonEdges::HOLD, t));
            t += DT;
        }
        frames.push(classifier.update(ButtonEdges::RELEASE, start + duration));
        frames
    }

    fn flatten(frames: &[Vec<GestureEvent>]) -> Vec<GestureEvent> {
        frames.iter().flatten().copied().collect()
    }

    mod tap_tests {
        use super::*;

        #[test]
        fn quick_tap_fires_light_attack_on_release() {
            let mut c = classifier();
            let frames = press_for(&mut c, 0.0, 0.1);

            assert_eq!(frames.last().unwrap(), &vec![GestureEvent::LightAttack]);
            assert_eq!(flatten(&frames), vec![GestureEvent::LightAttack]);
        }

        #[test]
        fn tap_opens_double_tap_window() {
            let mut c = classifier();
            press_for(&mut c, 0.0, 0.1);

            assert!(c.state().awaiting_second_tap);
            assert_eq!(c.state().last_tap_time, Some(0.1));
        }

        #[test]
        fn window_expires_silently() {
            let mut c = classifier();
            press_for(&mut c, 0.0, 0.1);

            let gestures = c.update(ButtonEdges::IDLE, 0.1 + 0.26);
            assert!(gestures.is_empty());
            assert!(!c.state().awaiting_second_tap);
        }

        #[test]
        fn just_under_threshold_is_light_attack() {
            let mut c = classifier();
            c.update(ButtonEdges::PRESS, 0.0);
            let gestures = c.update(ButtonEdges::RELEASE, 0.3 - 1e-6);
            assert_eq!(gestures, vec![GestureEvent::LightAttack]);
        }

        #[test]
        fn release_without_press_is_ignored() {
            let mut c = classifier();
            assert!(c.update(ButtonEdges::RELEASE, 0.5).is_empty());
            assert!(!c.state().awaiting_second_tap);
            assert_eq!(c.state().last_tap_time, None);

            // A real tap afterwards still opens the window normally.
            c.update(ButtonEdges::PRESS, 0.6);
            assert_eq!(
                c.update(ButtonEdges::RELEASE, 0.7),
                vec![GestureEvent::LightAttack]
            );
            assert!(c.state().awaiting_second_tap);
        }

        #[test]
        fn second_release_after_tap_is_ignored() {
            let mut c = classifier();
            press_for(&mut c, 0.0, 0.1);
            assert!(c.update(ButtonEdges::RELEASE, 0.15).is_empty());
        }

        #[test]
        fn threshold_comes_from_timing() {
            let mut c = InputClassifier::new(InputTiming {
                hold_threshold: 0.5,
                ..InputTiming::default()
            });
            assert!((c.timing().hold_threshold - 0.5).abs() < f64::EPSILON);

            c.update(ButtonEdges::PRESS, 0.0);
            assert!(c.update(ButtonEdges::HOLD, 0.4).is_empty());
            assert_eq!(
                c.update(ButtonEdges::RELEASE, 0.45),
                vec![GestureEvent::LightAttack]
            );
        }
    }

    mod hold_tests {
        use super::*;

        #[test]
        fn hold_emits_charge_start_once() {
            let mut c = classifier();
            let frames = press_for(&mut c, 0.0, 1.0);
            let all = flatten(&frames);

            assert_eq!(
                all,
                vec![GestureEvent::ChargeStart, GestureEvent::ChargedRelease]
            );
        }

        #[test]
        fn just_over_threshold_releases_charge_only() {
            let mut c = classifier();
            c.update(ButtonEdges::PRESS, 0.0);
            assert_eq!(
                c.update(ButtonEdges::HOLD, 0.3 + 1e-6),
                vec![GestureEvent::ChargeStart]
            );
            assert_eq!(
                c.update(ButtonEdges::RELEASE, 0.3 + 2e-6),
                vec![GestureEvent::ChargedRelease]
            );
        }

        #[test]
        fn hold_at_exact_threshold_charges() {
            let mut c = classifier();
            c.update(ButtonEdges::PRESS, 0.0);
            assert_eq!(c.update(ButtonEdges::HOLD, 0.3), vec![GestureEvent::ChargeStart]);
        }

        #[test]
        fn long_press_without_hold_frames_emits_nothing() {
            let mut c = classifier();
            c.update(ButtonEdges::PRESS, 0.0);
            assert!(c.update(ButtonEdges::RELEASE, 0.5).is_empty());
        }

        #[test]
        fn charging_cancels_pending_double_tap() {
            // A press inside the window consumes it as a flip, so the only way
            // to reach the hold check with a pending tap is through state.
            let mut c = classifier();
            c.state = ClassifierState {
                press_start_time: Some(0.0),
                last_tap_time: Some(0.2),
                is_held: true,
                is_charging: false,
                awaiting_second_tap: true,
            };
            let gestures = c.update(ButtonEdges::HOLD, 0.31);
            assert_eq!(gestures, vec![GestureEvent::ChargeStart]);
            assert!(!c.state().awaiting_second_tap);
        }
    }

    mod double_tap_tests {
        use super::*;

        #[test]
        fn double_tap_yields_two_light_attacks_and_a_flip() {
            let mut c = classifier();
            let first = press_for(&mut c, 0.0, 0.08);
            let second = press_for(&mut c, 0.2, 0.08);

            assert_eq!(flatten(&first), vec![GestureEvent::LightAttack]);
            // Flip fires on the second press, the light attack on its release.
            assert_eq!(second[0], vec![GestureEvent::GravityFlip]);
            assert_eq!(second.last().unwrap(), &vec![GestureEvent::LightAttack]);

            let all: Vec<_> = flatten(&first).into_iter().chain(flatten(&second)).collect();
            let lights = all.iter().filter(|g| **g == GestureEvent::LightAttack).count();
            let flips = all.iter().filter(|g| **g == GestureEvent::GravityFlip).count();
            assert_eq!((lights, flips), (2, 1));
        }

        #[test]
        fn second_press_after_window_is_a_plain_tap() {
            let mut c = classifier();
            press_for(&mut c, 0.0, 0.08);
            let second = press_for(&mut c, 0.08 + 0.3, 0.08);
            assert_eq!(flatten(&second), vec![GestureEvent::LightAttack]);
        }

        #[test]
        fn flip_at_window_boundary() {
            let mut c = classifier();
            c.update(ButtonEdges::PRESS, 0.0);
            c.update(ButtonEdges::RELEASE, 0.125);
            assert_eq!(
                c.update(ButtonEdges::PRESS, 0.375),
                vec![GestureEvent::GravityFlip]
            );
        }

        #[test]
        fn reset_clears_pending_tap() {
            let mut c = classifier();
            press_for(&mut c, 0.0, 0.08);
            c.reset();
            assert_eq!(*c.state(), ClassifierState::default());
        }
    }

    proptest! {
        #[test]
        fn short_presses_fire_exactly_one_light_attack(hold in 0.0f64..0.29, gap in 0.3f64..2.0) {
            let mut c = classifier();
            let mut t = 0.0;
            for _ in 0..4 {
                let frames = press_for(&mut c, t, hold);
                let all = flatten(&frames);
                prop_assert_eq!(all, vec![GestureEvent::LightAttack]);
                prop_assert_eq!(frames.last().unwrap(), &vec![GestureEvent::LightAttack]);
                t += hold + gap;
                c.update(ButtonEdges::IDLE, t - DT);
            }
        }

        #[test]
        fn long_presses_charge_exactly_once(hold in 0.32f64..3.0) {
            let mut c = classifier();
            let frames = press_for(&mut c, 0.0, hold);
            let all = flatten(&frames);
            let starts = all.iter().filter(|g| **g == GestureEvent::ChargeStart).count();
            prop_assert_eq!(starts, 1);
            prop_assert_eq!(frames.last().unwrap(), &vec![GestureEvent::ChargedRelease]);
            prop_assert!(!all.contains(&GestureEvent::LightAttack));
        }

        #[test]
        fn quick_double_taps_never_drop_light_attacks(first in 0.01f64..0.1, gap in 0.01f64..0.2) {
            let mut c = classifier();
            let a = press_for(&mut c, 0.0, first);
            let b = press_for(&mut c, first + gap, first);
            let all: Vec<_> = flatten(&a).into_iter().chain(flatten(&b)).collect();
            prop_assert_eq!(
                all,
                vec![
                    GestureEvent::LightAttack,
                    GestureEvent::GravityFlip,
                    GestureEvent::LightAttack,
                ]
            );
        }
    }
}
