#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Dark Maze session.
//!
//! An autopilot walks the player toward the prize while the pursuer hunts it.
//! The adapter prints text frames of the lit maze and a final summary, either
//! as plain text or as JSON.

mod autopilot;
mod frame;
mod settings;

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use dark_maze_core::{
    Clock, Command, Event, FrameSnapshot, GameState, MonotonicClock, SimulatedClock,
};
use dark_maze_world::{apply, query, World};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use autopilot::Autopilot;
use settings::Overrides;

const DEFAULT_LOG_FILTER: &str = "warn,dark_maze=info";

/// Headless Dark Maze session driven by an autopilot.
#[derive(Parser, Debug)]
#[command(name = "dark-maze", version)]
#[command(about = "Run a headless Dark Maze session and report the outcome")]
struct Args {
    /// Seed for maze generation and pursuer placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Maze width in cells (overrides the configuration file)
    #[arg(long)]
    width: Option<u32>,

    /// Maze height in cells (overrides the configuration file)
    #[arg(long)]
    height: Option<u32>,

    /// TOML file with tuning overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of frames to simulate
    #[arg(long, default_value_t = 3_600)]
    frames: u64,

    /// Simulated duration of a single frame in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Minimum delay between autopilot moves in milliseconds
    #[arg(long, default_value_t = 250)]
    move_every_ms: u64,

    /// Reveal the whole maze in printed frames
    #[arg(long)]
    god_mode: bool,

    /// Minimum intensity of every cell while god mode is active
    #[arg(long)]
    god_mode_floor: Option<f32>,

    /// Pace frames against the wall clock and timestamp footprints with it
    #[arg(long)]
    realtime: bool,

    /// Print a frame every N frames; 0 prints only the final frame
    #[arg(long, default_value_t = 0)]
    print_every: u64,

    /// Emit the final summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Final report of a session.
#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    outcome: GameState,
    frames: u64,
    snapshot: FrameSnapshot,
}

/// Entry point for the Dark Maze command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = settings::apply_overrides(
        settings::load(args.config.as_deref())?,
        Overrides {
            width: args.width,
            height: args.height,
            god_mode_floor: args.god_mode_floor,
        },
    );
    let seed = args.seed.unwrap_or_else(rand::random);
    let clock: Box<dyn Clock> = if args.realtime {
        Box::new(MonotonicClock::new())
    } else {
        Box::new(SimulatedClock::new())
    };

    let mut world = World::with_clock(config, seed, clock)
        .with_context(|| format!("failed to generate a maze for seed {seed}"))?;
    tracing::info!(seed, "session started");

    if !args.json {
        println!("{}", query::welcome_banner(&world));
    }

    let frames = run(&mut world, &args);
    let summary = Summary {
        seed,
        outcome: query::game_state(&world),
        frames,
        snapshot: query::snapshot(&world),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?
        );
    } else {
        println!("{}", frame::render(&world));
        println!(
            "seed {} finished as {:?} after {} frames",
            summary.seed, summary.outcome, summary.frames
        );
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Drives the session until it ends or the frame budget runs out.
///
/// Returns the number of frames simulated.
fn run(world: &mut World, args: &Args) -> u64 {
    let dt = Duration::from_millis(args.frame_ms.max(1));
    let mut autopilot = Autopilot::new(Duration::from_millis(args.move_every_ms));
    let mut events = Vec::new();

    if args.god_mode {
        apply(world, Command::ToggleGodMode, &mut events);
    }

    let mut frames = 0;
    while frames < args.frames {
        let started = Instant::now();
        frames += 1;

        if let Some(command) = autopilot.next_command(world, dt) {
            apply(world, command, &mut events);
        }
        apply(world, Command::Tick { dt }, &mut events);
        log_events(&events);
        events.clear();

        if args.print_every > 0 && frames % args.print_every == 0 {
            println!("frame {frames}\n{}\n", frame::render(world));
        }

        if query::game_state(world).is_terminal() {
            break;
        }

        if args.realtime {
            if let Some(remaining) = dt.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }

    frames
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::TimeAdvanced { .. } => {}
            Event::PlayerMoveRejected { from, attempted } => {
                tracing::debug!(%from, %attempted, "autopilot move rejected");
            }
            other => tracing::debug!(event = ?other, "world event"),
        }
    }
}
