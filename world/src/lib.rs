#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Dark Maze.
//!
//! The world owns the maze, the player, the pursuer, and the coarse game
//! state. Adapters mutate it exclusively through [`apply`] and observe it
//! through the read-only functions in [`query`].

mod maze;
mod navigation;
mod player;

use std::time::Duration;

use dark_maze_core::{
    tuning::{Config, PursuitTuning},
    CellCoord, CellKind, Clock, Command, Direction, Event, GameState, SimulatedClock,
    WELCOME_BANNER,
};
use dark_maze_system_illumination::Illumination;
use dark_maze_system_pursuit::{choose_spawn, Pursuer, SpawnCandidate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use maze::{GenerationError, LayoutError, Maze, MIN_DIMENSION, START_CELL};

use navigation::DistanceField;
use player::Player;

/// Represents the authoritative Dark Maze world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    maze: Maze,
    player: Player,
    pursuer: Pursuer,
    illumination: Illumination,
    state: GameState,
    god_mode: bool,
    rng: ChaCha8Rng,
    clock: Box<dyn Clock>,
    tick_index: u64,
}

impl World {
    /// Generates a fresh maze from `seed` and places both actors in it.
    pub fn new(config: Config, seed: u64) -> Result<Self, GenerationError> {
        Self::with_clock(config, seed, Box::new(SimulatedClock::new()))
    }

    /// Same as [`World::new`] but timestamps footprints with the provided clock.
    pub fn with_clock(
        config: Config,
        seed: u64,
        clock: Box<dyn Clock>,
    ) -> Result<Self, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let maze = Maze::generate(&config.maze, &mut rng)?;
        Ok(Self::assemble(config, maze, rng, clock))
    }

    /// Builds a world around an existing maze, such as one loaded from a fixed layout.
    ///
    /// `seed` drives pursuer placement.
    #[must_use]
    pub fn from_maze(config: Config, maze: Maze, seed: u64, clock: Box<dyn Clock>) -> Self {
        Self::assemble(config, maze, ChaCha8Rng::seed_from_u64(seed), clock)
    }

    fn assemble(config: Config, maze: Maze, mut rng: ChaCha8Rng, clock: Box<dyn Clock>) -> Self {
        let player = Player::spawn(maze.start(), &config.light, clock.now());
        let spawn = pursuer_spawn(&maze, &config.pursuit, &mut rng);
        tracing::debug!(%spawn, width = maze.width(), height = maze.height(), "world assembled");

        Self {
            banner: WELCOME_BANNER,
            pursuer: Pursuer::new(spawn, config.pursuit.clone()),
            illumination: Illumination::new(config.light.clone()),
            config,
            maze,
            player,
            state: GameState::Exploring,
            god_mode: false,
            rng,
            clock,
            tick_index: 0,
        }
    }

    /// Relocates the pursuer onto `cell`, discarding its route and timers.
    ///
    /// Debug override for scripted scenarios. Returns `false` and leaves the
    /// pursuer untouched when `cell` is not walkable.
    pub fn place_pursuer(&mut self, cell: CellCoord) -> bool {
        if !self.maze.is_walkable(cell) {
            return false;
        }
        self.pursuer.respawn(cell);
        true
    }

    fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.state != GameState::Exploring {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.clock.advance(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let _ = self.player.decay_trail(self.clock.now());

        let target = self.player.cell();
        let light = self.light_at(self.pursuer.cell());
        let maze = &self.maze;
        let report = self
            .pursuer
            .tick(dt, target, light, |cell| maze.is_walkable(cell));

        if let Some(waypoints) = report.recomputed {
            tracing::trace!(
                waypoints,
                pursuer = %self.pursuer.cell(),
                %target,
                "pursuer replanned"
            );
            out_events.push(Event::PursuerPathRecomputed { waypoints });
        }
        if let Some((from, to)) = report.step {
            out_events.push(Event::PursuerAdvanced { from, to });
        }
        if report.discarded {
            out_events.push(Event::PursuerPathDiscarded {
                cell: self.pursuer.cell(),
            });
        }

        if self.pursuer.has_caught(target) {
            self.transition(GameState::GameOver, out_events);
        } else if target == self.maze.prize() {
            self.transition(GameState::Victory, out_events);
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.player.respawn(self.maze.start(), self.clock.now());
        let spawn = pursuer_spawn(&self.maze, &self.config.pursuit, &mut self.rng);
        self.pursuer.respawn(spawn);
        out_events.push(Event::PursuerSpawned { cell: spawn });
        self.transition(GameState::Exploring, out_events);
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        tracing::info!(?from, ?to, tick = self.tick_index, "game state changed");
        out_events.push(Event::GameStateChanged { from, to });
    }

    /// Real light received by `cell`, ignoring the god-mode floor.
    fn light_at(&self, cell: CellCoord) -> f32 {
        self.illumination
            .intensity(&self.player.observer(), cell, |probe| {
                !self.maze.is_walkable(probe)
            })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.update(dt, out_events),
        Command::MovePlayer { direction } => {
            let _ = move_player(world, direction, out_events);
        }
        Command::SetAim { direction } => {
            if let Some(aim) = world.player.set_aim(direction) {
                out_events.push(Event::AimChanged { aim });
            }
        }
        Command::RotateAim { radians } => {
            if let Some(aim) = world.player.rotate_aim(radians) {
                out_events.push(Event::AimChanged { aim });
            }
        }
        Command::ToggleGodMode => {
            world.god_mode = !world.god_mode;
            out_events.push(Event::GodModeToggled {
                enabled: world.god_mode,
            });
        }
        Command::TogglePause => match world.state {
            GameState::Exploring => world.transition(GameState::Paused, out_events),
            GameState::Paused => world.transition(GameState::Exploring, out_events),
            GameState::GameOver | GameState::Victory => {}
        },
        Command::Reset => world.reset(out_events),
    }
}

/// Attempts to step the player one cell along `direction`.
///
/// Succeeds only while exploring and only onto walkable cells; on success the
/// aim turns to face `direction` and a footprint is recorded. Returns whether
/// the player moved.
pub fn move_player(world: &mut World, direction: Direction, out_events: &mut Vec<Event>) -> bool {
    let from = world.player.cell();
    let destination = from.offset(direction);

    if world.state != GameState::Exploring || !world.maze.is_walkable(destination) {
        out_events.push(Event::PlayerMoveRejected {
            from,
            attempted: destination,
        });
        return false;
    }

    world
        .player
        .step_to(destination, direction, world.clock.now());
    out_events.push(Event::PlayerMoved {
        from,
        to: destination,
    });
    true
}

/// Picks a fair pursuer spawn, falling back to the prize cell when no floor cell exists.
fn pursuer_spawn<R>(maze: &Maze, tuning: &PursuitTuning, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    let from_start = DistanceField::from_maze(maze, &[maze.start()]);
    let from_prize = DistanceField::from_maze(maze, &[maze.prize()]);

    let candidates: Vec<SpawnCandidate> = maze
        .cells()
        .filter(|cell| cell.kind == CellKind::Floor)
        .map(|cell| SpawnCandidate {
            cell: cell.position,
            start_distance: from_start.distance(cell.position).map_or(u32::MAX, u32::from),
            prize_distance: from_prize.distance(cell.position).map_or(u32::MAX, u32::from),
            walkable_neighbors: maze.walkable_neighbors(cell.position).count() as u8,
        })
        .collect();

    choose_spawn(&candidates, maze.start(), maze.prize(), tuning, rng).unwrap_or(maze.prize())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dark_maze_core::{
        tuning::Config, CellCoord, FrameSnapshot, GameState, VisibilityView, VisibleCell,
    };
    use glam::Vec2;

    use super::{navigation::DistanceField, Maze, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Provides read-only access to the maze layout.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Current coarse game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Reports whether the god-mode visibility override is active.
    #[must_use]
    pub fn god_mode(world: &World) -> bool {
        world.god_mode
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player.cell()
    }

    /// Unit vector the flashlight points along.
    #[must_use]
    pub fn aim(world: &World) -> Vec2 {
        world.player.aim()
    }

    /// Cell occupied by the pursuer.
    #[must_use]
    pub fn pursuer_cell(world: &World) -> CellCoord {
        world.pursuer.cell()
    }

    /// Remaining waypoints of the pursuer's current route.
    #[must_use]
    pub fn pursuer_path(world: &World) -> Vec<CellCoord> {
        world.pursuer.path().collect()
    }

    /// Glowing footprints as `(cell, intensity)` pairs in row-major order.
    #[must_use]
    pub fn footprints(world: &World) -> Vec<(CellCoord, f32)> {
        let mut footprints: Vec<(CellCoord, f32)> = world
            .player
            .trail()
            .iter()
            .map(|footprint| (footprint.position(), footprint.intensity()))
            .collect();
        footprints.sort_by_key(|(cell, _)| (cell.y(), cell.x()));
        footprints
    }

    /// Real light received by `cell`; god mode does not affect this value.
    #[must_use]
    pub fn intensity_at(world: &World, cell: CellCoord) -> f32 {
        world.light_at(cell)
    }

    /// Captures every cell that currently receives light.
    ///
    /// While god mode is active every cell is reported with at least the
    /// configured floor intensity; brighter cells keep their real value.
    #[must_use]
    pub fn visible_cells(world: &World) -> VisibilityView {
        let floor = if world.god_mode {
            world.config.god_mode_floor.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let cells = world
            .maze
            .cells()
            .filter_map(|cell| {
                let intensity = world.light_at(cell.position).max(floor);
                (intensity > 0.0).then_some(VisibleCell {
                    kind: cell.kind,
                    cell: cell.position,
                    intensity,
                })
            })
            .collect();

        VisibilityView::from_cells(cells)
    }

    /// Shortest walkable route from `from` (exclusive) to `to` (inclusive) with no depth limit.
    ///
    /// Returns `None` when either end is not walkable or no route exists.
    #[must_use]
    pub fn route(world: &World, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
        if !world.maze.is_walkable(from) {
            return None;
        }
        DistanceField::from_maze(&world.maze, &[to]).descend(from)
    }

    /// Flat per-frame snapshot for presentation adapters.
    #[must_use]
    pub fn snapshot(world: &World) -> FrameSnapshot {
        FrameSnapshot {
            tick_index: world.tick_index,
            state: world.state,
            god_mode: world.god_mode,
            width: world.maze.width(),
            height: world.maze.height(),
            player: world.player.cell(),
            aim: world.player.aim(),
            pursuer: world.pursuer.cell(),
            start: world.maze.start(),
            prize: world.maze.prize(),
            footprints: world.player.trail().len(),
        }
    }
}
