//! Test helpers for building worlds and scripting button input.

use glam::Vec2;

use crate::adversary::AdversaryKind;
use crate::arena::Arena;
use crate::config::GameConfig;
use crate::entity::Handle;
use crate::events::GameEvent;
use crate::host::Bodies;
use crate::input::GestureEvent;
use crate::world::World;

// =============================================================================
// World Setup
// =============================================================================

/// Builds a world on a fresh arena with the player at the origin and starts
/// the game. Events published by the start are drained.
pub fn playing_world(config: GameConfig) -> World<Arena> {
    let mut arena = Arena::new();
    let player = arena.spawn_player(Vec2::ZERO);
    let mut world = World::builder()
        .host(arena)
        .player(player)
        .config(config)
        .build()
        .expect("default wiring is valid");
    world.start();
    world.take_events();
    world
}

/// Same as [`playing_world`] with the default config and the given seed.
pub fn seeded_world(seed: u64) -> World<Arena> {
    playing_world(GameConfig {
        seed,
        ..GameConfig::default()
    })
}

/// Spawns one adversary of each kind in a line ahead of the player, spaced
/// `gap` apart starting at `start_x`.
pub fn spawn_wave(world: &mut World<Arena>, start_x: f32, gap: f32) -> Vec<Handle> {
    AdversaryKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            #[allow(clippy::cast_precision_loss)]
            let x = start_x + gap * i as f32;
            world.spawn_adversary(*kind, Vec2::new(x, 0.0), false)
        })
        .collect()
}

/// A point on the floor `distance` ahead of the player.
pub fn ahead_of_player(world: &World<Arena>, distance: f32) -> Vec2 {
    let player = world
        .host()
        .position(world.character().handle())
        .unwrap_or(Vec2::ZERO);
    Vec2::new(player.x + distance, 0.0)
}

/// Spawns an adversary on top of the player and waits out the knockback
/// cooldown.
pub fn ram(world: &mut World<Arena>, kind: AdversaryKind) {
    let at = ahead_of_player(world, 0.0);
    world.spawn_adversary(kind, at, false);
    idle(world, 65);
}

// =============================================================================
// Input Scripting
// =============================================================================

/// Holds the button for `ticks` ticks, then releases it on the next tick.
pub fn press_for(world: &mut World<Arena>, ticks: usize) {
    for _ in 0..ticks {
        world.step_level(true);
    }
    world.step_level(false);
}

/// Steps with the button up.
pub fn idle(world: &mut World<Arena>, ticks: usize) {
    for _ in 0..ticks {
        world.step_level(false);
    }
}

/// Runs a button level script, one entry per tick.
pub fn run_script(world: &mut World<Arena>, script: &[bool]) {
    for &level in script {
        world.step_level(level);
    }
}

/// A repeating tap / long-hold / double-tap pattern `ticks` long.
pub fn mixed_script(ticks: usize) -> Vec<bool> {
    const PATTERN: [bool; 40] = [
        true, true, false, false, false, false, false, false, false, false, //
        true, true, true, true, true, true, true, true, true, true, //
        true, true, true, true, false, false, false, false, false, false, //
        true, false, false, true, false, false, false, false, false, false,
    ];
    PATTERN.iter().copied().cycle().take(ticks).collect()
}

// =============================================================================
// Event Queries
// =============================================================================

/// Gestures in the order they were published.
pub fn gestures(events: &[GameEvent]) -> Vec<GestureEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::GestureRecognized(gesture) => Some(*gesture),
            _ => None,
        })
        .collect()
}

/// Number of events equal to `wanted`.
pub fn count(events: &[GameEvent], wanted: &GameEvent) -> usize {
    events.iter().filter(|event| *event == wanted).count()
}
