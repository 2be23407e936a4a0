//! Headless Flipstrike runner.
//!
//! Drives a scripted one-button session against the in-memory arena and
//! prints the published event stream, either as readable lines or as JSON
//! lines. The button script and the spawn schedule are drawn from a seeded
//! ChaCha stream, so a given seed and config always replay the same session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flipstrike_core::{AdversaryKind, Arena, GameConfig, GameEvent, SessionState, World};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, Level};

/// Run a scripted Flipstrike session without a renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the world and the input script
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of fixed ticks to run
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Ticks between adversary spawns
    #[arg(long, default_value_t = 90)]
    spawn_every: u64,

    /// JSON file overriding the default tuning; missing fields keep defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

/// One line of JSON output.
#[derive(Serialize)]
struct EventLine<'a> {
    tick: u64,
    time: f64,
    event: &'a GameEvent,
}

/// Button script: a queue of levels refilled with random gestures.
struct Script {
    rng: ChaCha8Rng,
    pending: Vec<bool>,
}

impl Script {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending: Vec::new(),
        }
    }

    /// Button level for the next tick.
    fn next_level(&mut self) -> bool {
        if self.pending.is_empty() {
            self.refill();
        }
        self.pending.pop().unwrap_or(false)
    }

    fn refill(&mut self) {
        let rest = self.rng.gen_range(10..40);
        let mut levels = match self.rng.gen_range(0..4) {
            // Tap
            0 => vec![true, true],
            // Hold into a charged release
            1 => vec![true; 24],
            // Double tap
            2 => vec![true, true, false, false, true, true],
            // Catch a breath
            _ => Vec::new(),
        };
        levels.extend(std::iter::repeat(false).take(rest));
        levels.reverse();
        self.pending = levels;
    }
}

fn load_config(path: Option<&Path>, seed: u64) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    config.seed = seed;
    Ok(config)
}

fn print_events(world: &mut World<Arena>, json: bool) -> Result<()> {
    let tick = world.tick();
    let time = world.now();
    for event in world.take_events() {
        if json {
            let line = EventLine {
                tick,
                time,
                event: &event,
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("[{tick:>6}] {time:>8.3}s  {event:?}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config.as_deref(), args.seed)?;

    let mut arena = Arena::new();
    let player = arena.spawn_player(Vec2::ZERO);
    let mut world = World::builder()
        .host(arena)
        .player(player)
        .config(config)
        .build()
        .context("failed to wire the world")?;

    let mut script = Script::new(args.seed);
    let mut spawns = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(1));
    let frame_dt = world.config().fixed_dt;

    info!(seed = args.seed, ticks = args.ticks, "session starting");
    world.start();
    print_events(&mut world, args.json)?;

    for tick in 0..args.ticks {
        if args.spawn_every > 0 && tick % args.spawn_every == 0 {
            let kind = AdversaryKind::ALL[spawns.gen_range(0..AdversaryKind::ALL.len())];
            let flipped = spawns.gen_bool(0.3);
            let x = world
                .host()
                .body(player)
                .map_or(0.0, |body| body.position.x)
                + spawns.gen_range(10.0..16.0);
            let y = if flipped {
                world.host().stage().ceiling
            } else {
                world.host().stage().floor
            };
            world.spawn_adversary(kind, Vec2::new(x, y), flipped);
        }

        world.step_level(script.next_level());
        world.present(frame_dt);
        print_events(&mut world, args.json)?;

        if world.session().state() == SessionState::GameOver {
            break;
        }
    }

    info!(
        ticks = world.tick(),
        score = world.session().score(),
        health = world.character().health(),
        adversaries = world.roster().len(),
        "session finished"
    );
    if !args.json {
        println!(
            "finished after {} ticks: state {:?}, score {:.1}, health {}/{}",
            world.tick(),
            world.session().state(),
            world.session().score(),
            world.character().health(),
            world.character().max_health(),
        );
    }
    Ok(())
}
