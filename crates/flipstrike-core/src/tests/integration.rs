//! End-to-end tests of the fixed tick against the reference host.

use glam::Vec2;

use crate::adversary::AdversaryKind;
use crate::character::CharacterState;
use crate::config::{CharacterTuning, GameConfig};
use crate::events::GameEvent;
use crate::host::Bodies;
use crate::input::GestureEvent;
use crate::session::SessionState;
use crate::visual::Tint;

use super::helpers::{
    ahead_of_player, count, gestures, idle, playing_world, press_for, ram, seeded_world,
};

// =============================================================================
// Gesture Tests
// =============================================================================

mod gesture_tests {
    use super::*;

    #[test]
    fn short_press_is_one_light_attack() {
        let mut world = seeded_world(1);
        press_for(&mut world, 2);

        assert_eq!(gestures(world.events()), vec![GestureEvent::LightAttack]);
    }

    #[test]
    fn press_just_under_threshold_is_light_attack() {
        let mut world = seeded_world(1);
        press_for(&mut world, 15);

        assert_eq!(gestures(world.events()), vec![GestureEvent::LightAttack]);
    }

    #[test]
    fn press_past_threshold_charges_and_releases() {
        let mut world = seeded_world(1);
        press_for(&mut world, 25);

        assert_eq!(
            gestures(world.events()),
            vec![GestureEvent::ChargeStart, GestureEvent::ChargedRelease]
        );
    }

    #[test]
    fn double_tap_attacks_twice_and_flips_once() {
        let mut world = seeded_world(1);
        press_for(&mut world, 2);
        idle(&mut world, 3);
        press_for(&mut world, 2);

        assert_eq!(
            gestures(world.events()),
            vec![
                GestureEvent::LightAttack,
                GestureEvent::GravityFlip,
                GestureEvent::LightAttack
            ]
        );
        assert!(world.character().is_gravity_flipped());
    }

    #[test]
    fn slow_second_tap_does_not_flip() {
        let mut world = seeded_world(1);
        press_for(&mut world, 2);
        idle(&mut world, 30);
        press_for(&mut world, 2);

        assert_eq!(
            gestures(world.events()),
            vec![GestureEvent::LightAttack, GestureEvent::LightAttack]
        );
        assert!(!world.character().is_gravity_flipped());
    }

    #[test]
    fn flipped_player_reaches_ceiling() {
        let mut world = seeded_world(1);
        press_for(&mut world, 2);
        idle(&mut world, 3);
        press_for(&mut world, 2);
        idle(&mut world, 120);

        let player = world.character().handle();
        let ceiling = world.host().stage().ceiling;
        assert_eq!(world.host().position(player).unwrap().y, ceiling);
        assert!(world.character().is_grounded());
    }
}

// =============================================================================
// Combat Tests
// =============================================================================

mod combat_tests {
    use super::*;

    #[test]
    fn unexpected_blocks_light_attack() {
        let mut world = seeded_world(3);
        let at = ahead_of_player(&world, 1.5);
        let handle = world.spawn_adversary(AdversaryKind::Unexpected, at, false);

        press_for(&mut world, 2);

        let unexpected = world.adversary(handle).unwrap();
        assert_eq!(unexpected.health(), 100);
        assert_eq!(world.host().body(handle).unwrap().tint, Tint::BLOCKED);
        let max = world.config().adversaries.erratic_max_speed;
        assert_eq!(world.host().velocity(handle).unwrap().x, -max);
    }

    #[test]
    fn charged_attack_damages_unexpected() {
        let mut world = seeded_world(3);
        for _ in 0..20 {
            world.step_level(true);
        }
        assert_eq!(gestures(world.events()), vec![GestureEvent::ChargeStart]);

        let at = ahead_of_player(&world, 1.5);
        let handle = world.spawn_adversary(AdversaryKind::Unexpected, at, false);
        world.step_level(false);

        assert_eq!(world.adversary(handle).unwrap().health(), 40);
        assert_eq!(world.host().body(handle).unwrap().tint, Tint::DAMAGE);
    }

    #[test]
    fn kill_awards_score_and_schedules_removal() {
        let mut world = seeded_world(3);
        let at = ahead_of_player(&world, 1.2);
        let handle = world.spawn_adversary(AdversaryKind::Basic, at, false);

        press_for(&mut world, 2);

        let adversary = world.adversary(handle).unwrap();
        assert!(adversary.is_dead());
        assert_eq!(world.host().velocity(handle).unwrap(), Vec2::ZERO);
        assert!(world.session().score() > 5.0);
        assert_eq!(
            count(
                world.events(),
                &GameEvent::AdversaryDied {
                    handle,
                    kind: AdversaryKind::Basic
                }
            ),
            1
        );

        idle(&mut world, 65);
        assert!(world.adversary(handle).is_none());
        assert!(!world.host().contains(handle));
    }

    #[test]
    fn light_attack_misses_distant_adversaries() {
        let mut world = seeded_world(3);
        let at = ahead_of_player(&world, 20.0);
        let handle = world.spawn_adversary(AdversaryKind::Basic, at, false);

        press_for(&mut world, 2);

        assert!(!world.adversary(handle).unwrap().is_dead());
    }
}

// =============================================================================
// Damage and Death Tests
// =============================================================================

mod damage_tests {
    use super::*;

    #[test]
    fn three_unexpected_contacts_kill_once() {
        let mut world = seeded_world(5);
        for _ in 0..3 {
            ram(&mut world, AdversaryKind::Unexpected);
        }

        let events = world.events().to_vec();
        assert!(world.character().is_dead());
        assert_eq!(count(&events, &GameEvent::PlayerDied), 1);
        assert_eq!(count(&events, &GameEvent::HealthChanged { current: 60, max: 100 }), 1);
        assert_eq!(count(&events, &GameEvent::HealthChanged { current: 20, max: 100 }), 1);
        assert_eq!(count(&events, &GameEvent::HealthChanged { current: 0, max: 100 }), 1);
        assert_eq!(world.session().state(), SessionState::GameOver);
    }

    #[test]
    fn nothing_changes_after_game_over() {
        let mut world = seeded_world(5);
        for _ in 0..3 {
            ram(&mut world, AdversaryKind::Unexpected);
        }
        world.take_events();

        ram(&mut world, AdversaryKind::Unexpected);

        assert!(world.events().is_empty());
        assert_eq!(world.character().health(), 0);
    }

    #[test]
    fn no_damage_mode_survives_contacts() {
        let mut world = playing_world(GameConfig {
            character: CharacterTuning {
                no_damage_mode: true,
                ..CharacterTuning::default()
            },
            ..GameConfig::default()
        });
        for _ in 0..5 {
            ram(&mut world, AdversaryKind::Unexpected);
        }

        assert_eq!(world.character().health(), 100);
        assert_eq!(world.session().state(), SessionState::Playing);
    }

    #[test]
    fn contact_knocks_player_backward() {
        let mut world = seeded_world(5);
        for _ in 0..30 {
            world.step_level(false);
        }
        let player = world.character().handle();
        let before = world.host().position(player).unwrap().x;

        world.spawn_adversary(AdversaryKind::Basic, Vec2::new(before, 0.0), false);
        idle(&mut world, 20);

        let after = world.host().position(player).unwrap().x;
        let force = world.config().character.knockback_force;
        assert!((after - (before - force * 0.5)).abs() < 0.1);
        assert!(!world.character().is_sliding());
    }

    #[test]
    fn damage_flash_fades_after_reset() {
        let mut world = seeded_world(5);
        let player = world.character().handle();
        let at = world.host().position(player).unwrap();
        world.spawn_adversary(AdversaryKind::Medium, at, false);

        world.step_level(false);
        assert_eq!(world.host().body(player).unwrap().tint, Tint::DAMAGE);

        idle(&mut world, 10);
        for _ in 0..120 {
            world.present(1.0 / 60.0);
        }
        assert_eq!(world.host().body(player).unwrap().tint, Tint::WHITE);
    }
}

// =============================================================================
// Session Tests
// =============================================================================

mod session_tests {
    use super::*;

    #[test]
    fn score_accrues_with_time() {
        let mut world = seeded_world(7);
        idle(&mut world, 60);
        assert!((world.session().score() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut world = seeded_world(7);
        let handle = world.spawn_adversary(AdversaryKind::Medium, Vec2::new(10.0, 0.0), false);
        idle(&mut world, 10);

        world.pause();
        world.take_events();
        let now = world.now();
        let score = world.session().score();
        let position = world.host().position(handle).unwrap();

        press_for(&mut world, 30);

        assert!(world.events().is_empty());
        assert_eq!(world.now(), now);
        assert_eq!(world.session().score(), score);
        assert_eq!(world.host().position(handle).unwrap(), position);

        world.resume();
        idle(&mut world, 1);
        assert!(world.session().score() > score);
    }

    #[test]
    fn release_during_pause_fires_charged_attack_on_resume() {
        let mut world = seeded_world(11);
        for _ in 0..20 {
            world.step_level(true);
        }

        world.pause();
        world.step_level(false);
        let at = ahead_of_player(&world, 1.5);
        let handle = world.spawn_adversary(AdversaryKind::Unexpected, at, false);
        world.resume();
        idle(&mut world, 5);

        assert_eq!(
            gestures(world.events()),
            vec![GestureEvent::ChargeStart, GestureEvent::ChargedRelease]
        );
        assert!(!world.classifier().state().is_held);
        assert_eq!(world.adversary(handle).unwrap().health(), 40);
        assert_eq!(world.character().state(), CharacterState::Running);
    }

    #[test]
    fn restart_after_death_plays_again() {
        let mut world = seeded_world(7);
        for _ in 0..3 {
            ram(&mut world, AdversaryKind::Unexpected);
        }
        assert!(world.character().is_dead());

        world.restart();

        assert!(!world.character().is_dead());
        assert_eq!(world.character().health(), 100);
        assert_eq!(world.session().state(), SessionState::Playing);
        assert_eq!(world.session().score(), 0.0);
        assert!(world.roster().is_empty());

        press_for(&mut world, 2);
        assert_eq!(gestures(world.events()).last(), Some(&GestureEvent::LightAttack));
    }
}
