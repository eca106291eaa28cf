//! Maze storage, procedural generation, and fixed layouts.

use dark_maze_core::{tuning::MazeTuning, Cell, CellCoord, CellKind, Direction};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::navigation::DistanceField;

/// Smallest width or height accepted by [`Maze::generate`].
pub const MIN_DIMENSION: u32 = 5;

/// Fixed cell every generated maze starts from.
pub const START_CELL: CellCoord = CellCoord::new(1, 1);

/// Failure modes of procedural maze generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Requested dimensions leave no interior to carve.
    #[error("maze of {width}x{height} is below the minimum of {min}x{min}", min = MIN_DIMENSION)]
    TooSmall {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A tuning knob holds a value generation cannot use.
    #[error("maze tuning `{field}` must be a finite number")]
    InvalidTuning {
        /// Name of the offending tuning field.
        field: &'static str,
    },
    /// Every attempt produced a maze whose prize could not be reached.
    #[error("no solvable maze after {attempts} attempts")]
    Unsolvable {
        /// Number of attempts that were made.
        attempts: u32,
    },
}

/// Failure modes of [`Maze::from_ascii`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no rows or an empty first row.
    #[error("layout is empty")]
    Empty,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of columns in the first row.
        expected: usize,
        /// Number of columns in the offending row.
        found: usize,
    },
    /// A character outside `#`, `.`, `S`, `P` was found.
    #[error("unknown cell symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol {
        /// The unexpected character.
        symbol: char,
        /// Column of the character.
        x: usize,
        /// Row of the character.
        y: usize,
    },
    /// No `S` cell was present.
    #[error("layout has no start cell")]
    MissingStart,
    /// No `P` cell was present.
    #[error("layout has no prize cell")]
    MissingPrize,
    /// More than one `S` cell was present.
    #[error("layout has more than one start cell")]
    DuplicateStart,
    /// More than one `P` cell was present.
    #[error("layout has more than one prize cell")]
    DuplicatePrize,
}

/// Rectangular grid of cells with designated start and prize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
    start: CellCoord,
    prize: CellCoord,
}

impl Maze {
    /// Generates a braided maze using the provided random source.
    ///
    /// Carving starts from [`START_CELL`] and the prize lands on the floor cell
    /// furthest from it in a straight line. Attempts whose prize cannot be
    /// reached are discarded and regenerated up to `max_attempts` times.
    pub fn generate<R>(tuning: &MazeTuning, rng: &mut R) -> Result<Self, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let (width, height) = (tuning.width, tuning.height);
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(GenerationError::TooSmall { width, height });
        }
        if !tuning.braid_density.is_finite() {
            return Err(GenerationError::InvalidTuning {
                field: "braid_density",
            });
        }
        if !tuning.sweep_open_chance.is_finite() {
            return Err(GenerationError::InvalidTuning {
                field: "sweep_open_chance",
            });
        }

        let attempts = tuning.max_attempts.max(1);
        for attempt in 1..=attempts {
            let mut maze = Self::solid(width, height);
            maze.carve(rng);
            let scattered = maze.open_scattered_joints(tuning, rng);
            let swept = maze.sweep_joints(tuning, rng);
            tracing::trace!(attempt, scattered, swept, "opened extra corridor joints");

            let Some(prize) = maze.farthest_floor(START_CELL) else {
                tracing::debug!(attempt, "carved maze has no floor besides the start");
                continue;
            };

            let field = DistanceField::from_maze(&maze, &[START_CELL]);
            if field.distance(prize).is_none() {
                tracing::debug!(attempt, %prize, "prize unreachable from start, regenerating");
                continue;
            }

            maze.designate(START_CELL, prize);
            return Ok(maze);
        }

        Err(GenerationError::Unsolvable { attempts })
    }

    /// Builds a maze from rows of `#` (wall), `.` (floor), `S` (start), and `P` (prize).
    pub fn from_ascii<S>(rows: &[S]) -> Result<Self, LayoutError>
    where
        S: AsRef<str>,
    {
        let expected = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .filter(|columns| *columns > 0)
            .ok_or(LayoutError::Empty)?;

        let mut cells = Vec::with_capacity(expected * rows.len());
        let mut start = None;
        let mut prize = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.as_ref().chars().count();
            if found != expected {
                return Err(LayoutError::Ragged {
                    row: y,
                    expected,
                    found,
                });
            }

            for (x, symbol) in row.as_ref().chars().enumerate() {
                let position = CellCoord::new(coordinate(x), coordinate(y));
                let kind = match symbol {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Floor,
                    'S' => {
                        if start.replace(position).is_some() {
                            return Err(LayoutError::DuplicateStart);
                        }
                        CellKind::Start
                    }
                    'P' => {
                        if prize.replace(position).is_some() {
                            return Err(LayoutError::DuplicatePrize);
                        }
                        CellKind::Prize
                    }
                    _ => return Err(LayoutError::UnknownSymbol { symbol, x, y }),
                };
                cells.push(kind);
            }
        }

        Ok(Self {
            width: dimension(expected),
            height: dimension(rows.len()),
            cells,
            start: start.ok_or(LayoutError::MissingStart)?,
            prize: prize.ok_or(LayoutError::MissingPrize)?,
        })
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell where the player spawns.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell the player must reach.
    #[must_use]
    pub const fn prize(&self) -> CellCoord {
        self.prize
    }

    /// Terrain stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Reports whether actors may stand on `cell`; out-of-bounds cells are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.kind(cell).map_or(false, CellKind::is_walkable)
    }

    /// Orthogonal neighbors of `cell` that are walkable, in north, east, south, west order.
    pub fn walkable_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| cell.offset(direction))
            .filter(move |neighbor| self.is_walkable(*neighbor))
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(index, kind)| Cell {
            kind: *kind,
            position: CellCoord::new(coordinate(index % width), coordinate(index / width)),
        })
    }

    fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Wall; width as usize * height as usize],
            start: START_CELL,
            prize: START_CELL,
        }
    }

    fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = kind;
        }
    }

    fn is_wall(&self, cell: CellCoord) -> bool {
        self.kind(cell) == Some(CellKind::Wall)
    }

    fn is_interior(&self, cell: CellCoord) -> bool {
        let right = coordinate(self.width as usize) - 2;
        let bottom = coordinate(self.height as usize) - 2;
        (1..=right).contains(&cell.x()) && (1..=bottom).contains(&cell.y())
    }

    fn floor_neighbors(&self, cell: CellCoord) -> usize {
        self.walkable_neighbors(cell).count()
    }

    /// Recursive backtracker over the odd lattice with an explicit stack.
    fn carve<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.set(START_CELL, CellKind::Floor);
        let mut stack = vec![START_CELL];

        while let Some(&current) = stack.last() {
            let candidates: Vec<(CellCoord, CellCoord)> = Direction::ALL
                .into_iter()
                .filter_map(|direction| {
                    let next = current + direction.delta().scale(2);
                    (self.is_interior(next) && self.is_wall(next))
                        .then(|| (current.offset(direction), next))
                })
                .collect();

            match candidates.choose(rng) {
                Some(&(between, next)) => {
                    self.set(between, CellKind::Floor);
                    self.set(next, CellKind::Floor);
                    stack.push(next);
                }
                None => {
                    let _ = stack.pop();
                }
            }
        }
    }

    /// Opens random interior walls touching two or three corridors.
    ///
    /// Returns the number of cells opened.
    fn open_scattered_joints<R>(&mut self, tuning: &MazeTuning, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let right = coordinate(self.width as usize) - 1;
        let bottom = coordinate(self.height as usize) - 1;
        let mut opened = 0;

        for _ in 0..tuning.braid_samples() {
            let cell = CellCoord::new(rng.gen_range(1..right), rng.gen_range(1..bottom));
            if self.is_wall(cell) && (2..=3).contains(&self.floor_neighbors(cell)) {
                self.set(cell, CellKind::Floor);
                opened += 1;
            }
        }

        opened
    }

    /// Walks every joint wall between two lattice cells and opens the ones
    /// touching two or more corridors with `sweep_open_chance`.
    ///
    /// Joint walls sit where `x + y` is odd. Returns the number of cells opened.
    fn sweep_joints<R>(&mut self, tuning: &MazeTuning, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let right = coordinate(self.width as usize) - 1;
        let bottom = coordinate(self.height as usize) - 1;
        let chance = f64::from(tuning.sweep_open_chance.clamp(0.0, 1.0));
        let mut opened = 0;

        for y in 1..bottom {
            let first = if y % 2 == 0 { 1 } else { 2 };
            for x in (first..right).step_by(2) {
                let cell = CellCoord::new(x, y);
                if self.is_wall(cell) && self.floor_neighbors(cell) >= 2 && rng.gen_bool(chance) {
                    self.set(cell, CellKind::Floor);
                    opened += 1;
                }
            }
        }

        opened
    }

    /// Floor cell with the greatest straight-line distance from `origin`.
    ///
    /// Ties keep the first cell in row-major order.
    fn farthest_floor(&self, origin: CellCoord) -> Option<CellCoord> {
        let mut best: Option<(CellCoord, f32)> = None;
        for cell in self.cells() {
            if cell.position == origin || !cell.kind.is_walkable() {
                continue;
            }
            let distance = origin.distance(cell.position);
            if best.map_or(true, |(_, furthest)| distance > furthest) {
                best = Some((cell.position, distance));
            }
        }
        best.map(|(cell, _)| cell)
    }

    fn designate(&mut self, start: CellCoord, prize: CellCoord) {
        self.set(start, CellKind::Start);
        self.set(prize, CellKind::Prize);
        self.start = start;
        self.prize = prize;
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = usize::try_from(cell.x()).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        let width = self.width as usize;
        if column >= width || row >= self.height as usize {
            return None;
        }
        Some(row * width + column)
    }
}

fn coordinate(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn dimension(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tuning(width: u32, height: u32) -> MazeTuning {
        MazeTuning {
            width,
            height,
            ..MazeTuning::default()
        }
    }

    #[test]
    fn rejects_dimensions_below_minimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            Maze::generate(&tuning(4, 21), &mut rng),
            Err(GenerationError::TooSmall {
                width: 4,
                height: 21
            })
        );
    }

    #[test]
    fn rejects_non_finite_tuning() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sweep = MazeTuning {
            sweep_open_chance: f32::NAN,
            ..MazeTuning::default()
        };
        assert_eq!(
            Maze::generate(&sweep, &mut rng),
            Err(GenerationError::InvalidTuning {
                field: "sweep_open_chance"
            })
        );

        let density = MazeTuning {
            braid_density: f32::INFINITY,
            ..MazeTuning::default()
        };
        assert_eq!(
            Maze::generate(&density, &mut rng),
            Err(GenerationError::InvalidTuning {
                field: "braid_density"
            })
        );
    }

    #[test]
    fn joint_sweep_opens_more_than_scattered_pass() {
        let tuning = MazeTuning::default();
        let (mut scattered, mut swept) = (0, 0);

        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut maze = Maze::solid(tuning.width, tuning.height);
            maze.carve(&mut rng);
            scattered += maze.open_scattered_joints(&tuning, &mut rng);
            swept += maze.sweep_joints(&tuning, &mut rng);
        }

        assert!(
            swept > scattered,
            "sweep opened {swept} cells, scattered pass opened {scattered}"
        );
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let first = Maze::generate(&tuning(21, 21), &mut ChaCha8Rng::seed_from_u64(99));
        let second = Maze::generate(&tuning(21, 21), &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn generated_maze_marks_one_start_and_one_prize() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let maze = Maze::generate(&tuning(21, 21), &mut rng).expect("maze");

        assert_eq!(maze.start(), START_CELL);
        assert_eq!(maze.kind(START_CELL), Some(CellKind::Start));
        assert_eq!(maze.kind(maze.prize()), Some(CellKind::Prize));
        let starts = maze.cells().filter(|cell| cell.kind == CellKind::Start).count();
        let prizes = maze.cells().filter(|cell| cell.kind == CellKind::Prize).count();
        assert_eq!((starts, prizes), (1, 1));
    }

    #[test]
    fn border_stays_solid() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let maze = Maze::generate(&tuning(15, 11), &mut rng).expect("maze");
        for cell in maze.cells() {
            let (x, y) = (cell.position.x(), cell.position.y());
            if x == 0 || y == 0 || x == 14 || y == 10 {
                assert_eq!(cell.kind, CellKind::Wall, "border opened at {}", cell.position);
            }
        }
    }

    #[test]
    fn prize_is_the_furthest_floor_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let maze = Maze::generate(&tuning(21, 21), &mut rng).expect("maze");
        let prize_distance = START_CELL.distance(maze.prize());
        for cell in maze.cells().filter(|cell| cell.kind.is_walkable()) {
            assert!(START_CELL.distance(cell.position) <= prize_distance);
        }
    }

    #[test]
    fn out_of_bounds_queries_are_answered() {
        let maze = Maze::from_ascii(&["#####", "#S.P#", "#####"]).expect("layout");
        assert_eq!(maze.kind(CellCoord::new(-1, 0)), None);
        assert_eq!(maze.kind(CellCoord::new(5, 1)), None);
        assert!(!maze.is_walkable(CellCoord::new(2, 7)));
        assert!(maze.is_walkable(CellCoord::new(2, 1)));
        assert_eq!(
            maze.walkable_neighbors(CellCoord::new(2, 1)).collect::<Vec<_>>(),
            vec![CellCoord::new(3, 1), CellCoord::new(1, 1)]
        );
    }

    #[test]
    fn from_ascii_reports_malformed_layouts() {
        let empty: [&str; 0] = [];
        assert_eq!(Maze::from_ascii(&empty), Err(LayoutError::Empty));
        assert_eq!(
            Maze::from_ascii(&["#S.P#", "###"]),
            Err(LayoutError::Ragged {
                row: 1,
                expected: 5,
                found: 3
            })
        );
        assert_eq!(
            Maze::from_ascii(&["#S?P#"]),
            Err(LayoutError::UnknownSymbol {
                symbol: '?',
                x: 2,
                y: 0
            })
        );
        assert_eq!(Maze::from_ascii(&["#..P#"]), Err(LayoutError::MissingStart));
        assert_eq!(Maze::from_ascii(&["#S..#"]), Err(LayoutError::MissingPrize));
        assert_eq!(Maze::from_ascii(&["#SSP#"]), Err(LayoutError::DuplicateStart));
        assert_eq!(Maze::from_ascii(&["#SPP#"]), Err(LayoutError::DuplicatePrize));
    }
}
