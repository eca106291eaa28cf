#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dark Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! actually happened. Read-only presentation data leaves the world as
//! [`FrameSnapshot`] and [`VisibilityView`] values so that no adapter ever
//! touches the grid representation directly.

use std::{
    fmt,
    ops::{Add, Sub},
    time::{Duration, Instant},
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod tuning;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dark Maze.";

/// Aim direction assigned to the player whenever it spawns at the start cell.
pub const INITIAL_AIM: Vec2 = Vec2::new(1.0, 0.0);

/// Coarse state of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The player is exploring and the simulation advances every tick.
    Exploring,
    /// Simulation is suspended until the player resumes.
    Paused,
    /// The pursuer caught the player.
    GameOver,
    /// The player reached the prize.
    Victory,
}

impl GameState {
    /// Reports whether the session ended and only a reset can continue it.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player advance a single cell in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Points the flashlight along the provided vector.
    SetAim {
        /// Desired aim; normalized by the world, zero vectors are ignored.
        direction: Vec2,
    },
    /// Rotates the flashlight by the provided angle.
    RotateAim {
        /// Counter-clockwise rotation in radians (grid rows grow downward).
        radians: f32,
    },
    /// Flips the debug override that reveals the whole maze.
    ToggleGodMode,
    /// Suspends or resumes an exploring session.
    TogglePause,
    /// Restores the session to its initial layout with a fresh pursuer spawn.
    Reset,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// Reports that a player move was refused.
    PlayerMoveRejected {
        /// Cell the player still occupies.
        from: CellCoord,
        /// Cell the player attempted to enter.
        attempted: CellCoord,
    },
    /// Reports the normalized aim after a change.
    AimChanged {
        /// Unit vector the flashlight now points along.
        aim: Vec2,
    },
    /// Confirms that the pursuer was placed into the maze.
    PursuerSpawned {
        /// Cell the pursuer occupies after spawning.
        cell: CellCoord,
    },
    /// Reports that the pursuer planned a new route toward its target.
    PursuerPathRecomputed {
        /// Number of waypoints in the new route; zero means the pursuer stalls.
        waypoints: usize,
    },
    /// Confirms that the pursuer moved between two cells.
    PursuerAdvanced {
        /// Cell the pursuer occupied before moving.
        from: CellCoord,
        /// Cell the pursuer occupies after moving.
        to: CellCoord,
    },
    /// Reports that the pursuer dropped a route whose next waypoint was blocked.
    PursuerPathDiscarded {
        /// Cell the pursuer occupies.
        cell: CellCoord,
    },
    /// Announces a transition of the coarse game state.
    GameStateChanged {
        /// State that was active before the transition.
        from: GameState,
        /// State that became active.
        to: GameState,
    },
    /// Announces that god mode was switched.
    GodModeToggled {
        /// Whether god mode is now active.
        enabled: bool,
    },
}

/// Cardinal movement directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Grid offset produced by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> CellCoord {
        match self {
            Self::North => CellCoord::new(0, -1),
            Self::East => CellCoord::new(1, 0),
            Self::South => CellCoord::new(0, 1),
            Self::West => CellCoord::new(-1, 0),
        }
    }

    /// Unit vector pointing along the direction.
    #[must_use]
    pub fn unit_vector(self) -> Vec2 {
        self.delta().to_vec2()
    }

    /// Direction that leads from `from` to an orthogonally adjacent `to`.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let delta = to - from;
        Self::ALL
            .into_iter()
            .find(|direction| direction.delta() == delta)
    }
}

/// Location of a single grid cell expressed as column (`x`) and row (`y`).
///
/// Components are signed so that neighbor arithmetic near the border never
/// wraps; out-of-range cells are rejected by the grid that interprets them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub const fn scale(self, factor: i32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Neighboring cell one step away in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let delta = direction.delta();
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Straight-line distance between two cell coordinates.
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    /// Converts the coordinate into a floating point vector.
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl Add for CellCoord {
    type Output = CellCoord;

    fn add(self, rhs: CellCoord) -> CellCoord {
        CellCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for CellCoord {
    type Output = CellCoord;

    fn sub(self, rhs: CellCoord) -> CellCoord {
        CellCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Type of terrain stored in a maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Opaque, impassable cell.
    Wall,
    /// Ordinary corridor cell.
    Floor,
    /// Cell where the player spawns.
    Start,
    /// Cell the player must reach to win.
    Prize,
}

impl CellKind {
    /// Reports whether actors may stand on the cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Single grid square paired with its address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Terrain stored at the address.
    pub kind: CellKind,
    /// Address of the cell within the grid.
    pub position: CellCoord,
}

/// Presentation record for a cell that received light this frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VisibleCell {
    /// Terrain stored at the address.
    pub kind: CellKind,
    /// Address of the cell within the grid.
    pub cell: CellCoord,
    /// Light intensity in the range 0.0..=1.0.
    pub intensity: f32,
}

/// Read-only collection of every lit cell, ordered row-major.
#[derive(Clone, Debug, Default)]
pub struct VisibilityView {
    cells: Vec<VisibleCell>,
}

impl VisibilityView {
    /// Creates a new view from the provided cells.
    #[must_use]
    pub fn from_cells(mut cells: Vec<VisibleCell>) -> Self {
        cells.sort_by_key(|visible| (visible.cell.y(), visible.cell.x()));
        Self { cells }
    }

    /// Iterator over the lit cells in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &VisibleCell> {
        self.cells.iter()
    }

    /// Number of lit cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell is lit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Intensity recorded for `cell`, if the cell is lit.
    #[must_use]
    pub fn intensity_at(&self, cell: CellCoord) -> Option<f32> {
        self.cells
            .iter()
            .find(|visible| visible.cell == cell)
            .map(|visible| visible.intensity)
    }

    /// Consumes the view, yielding the underlying cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<VisibleCell> {
        self.cells
    }
}

/// Flat per-frame snapshot handed to presentation adapters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Monotonic count of processed ticks since the world was created.
    pub tick_index: u64,
    /// Current coarse game state.
    pub state: GameState,
    /// Whether the god-mode visibility override is active.
    pub god_mode: bool,
    /// Number of columns in the maze.
    pub width: u32,
    /// Number of rows in the maze.
    pub height: u32,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Unit vector the flashlight points along.
    pub aim: Vec2,
    /// Cell occupied by the pursuer.
    pub pursuer: CellCoord,
    /// Cell where the player spawns.
    pub start: CellCoord,
    /// Cell the player must reach.
    pub prize: CellCoord,
    /// Number of footprints still glowing.
    pub footprints: usize,
}

/// Source of monotonic time used to timestamp footprints.
pub trait Clock: fmt::Debug {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Notifies the clock that the simulation advanced by `dt`.
    ///
    /// Clocks backed by real time ignore the notification.
    fn advance(&mut self, _dt: Duration) {}
}

/// Clock driven exclusively by simulation ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulatedClock {
    elapsed: Duration,
}

impl SimulatedClock {
    /// Creates a clock positioned at its origin.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(Duration::ZERO)
    }

    /// Creates a clock that already reports `elapsed`.
    #[must_use]
    pub const fn starting_at(elapsed: Duration) -> Self {
        Self { elapsed }
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Duration {
        self.elapsed
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}

/// Clock backed by the operating system's monotonic timer.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn coordinate_arithmetic_returns_new_values() {
        let a = CellCoord::new(3, 5);
        let b = CellCoord::new(1, -2);
        assert_eq!(a + b, CellCoord::new(4, 3));
        assert_eq!(a - b, CellCoord::new(2, 7));
        assert_eq!(b.scale(3), CellCoord::new(3, -6));
        assert_eq!(a, CellCoord::new(3, 5));
        assert!((CellCoord::new(0, 0).distance(CellCoord::new(3, 4)) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(4, 3)),
            Some(Direction::East)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 4)),
            Some(Direction::South)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, CellCoord::new(5, 3)), None);
    }

    #[test]
    fn offset_follows_direction_delta() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(origin.offset(Direction::North), CellCoord::new(2, 1));
        assert_eq!(origin.offset(Direction::West), CellCoord::new(1, 2));
        assert_eq!(Direction::South.unit_vector(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn only_walls_block_movement() {
        assert!(!CellKind::Wall.is_walkable());
        assert!(CellKind::Floor.is_walkable());
        assert!(CellKind::Start.is_walkable());
        assert!(CellKind::Prize.is_walkable());
    }

    #[test]
    fn simulated_clock_advances_only_when_told() {
        let mut clock = SimulatedClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(250));
        clock.advance(Duration::from_millis(750));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn visibility_view_orders_cells_row_major() {
        let view = VisibilityView::from_cells(vec![
            VisibleCell {
                kind: CellKind::Floor,
                cell: CellCoord::new(0, 2),
                intensity: 0.5,
            },
            VisibleCell {
                kind: CellKind::Wall,
                cell: CellCoord::new(3, 1),
                intensity: 0.25,
            },
        ]);
        let order: Vec<CellCoord> = view.iter().map(|visible| visible.cell).collect();
        assert_eq!(order, vec![CellCoord::new(3, 1), CellCoord::new(0, 2)]);
        assert_eq!(view.intensity_at(CellCoord::new(0, 2)), Some(0.5));
        assert_eq!(view.intensity_at(CellCoord::new(9, 9)), None);
    }

    #[test]
    fn terminal_states_are_flagged() {
        assert!(GameState::GameOver.is_terminal());
        assert!(GameState::Victory.is_terminal());
        assert!(!GameState::Exploring.is_terminal());
        assert!(!GameState::Paused.is_terminal());
    }
}
