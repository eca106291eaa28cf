//! Breadth-first distance fields over the maze's walkable cells.

use std::collections::VecDeque;

use dark_maze_core::{CellCoord, Direction};

use crate::Maze;

/// Dense corridor-distance grid seeded from one or more origin cells.
///
/// Distances default to `u16::MAX` for unreachable cells so callers can
/// distinguish walls and sealed pockets from traversable cells.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    width: u32,
    height: u32,
    distances: Vec<u16>,
}

impl DistanceField {
    /// Builds the corridor distances from `origins` across the walkable cells of `maze`.
    pub(crate) fn from_maze(maze: &Maze, origins: &[CellCoord]) -> Self {
        let mut field = Self::default();
        field.rebuild_with(maze.width(), maze.height(), origins, |cell| {
            !maze.is_walkable(cell)
        });
        field
    }

    /// Rebuilds the distances using a breadth-first search from `origins`.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        width: u32,
        height: u32,
        origins: &[CellCoord],
        mut is_blocked: F,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;

        if cell_count == 0 {
            self.distances.clear();
            return;
        }

        if self.distances.len() != cell_count {
            self.distances = vec![u16::MAX; cell_count];
        } else {
            self.distances.fill(u16::MAX);
        }

        let mut queue = VecDeque::new();

        for &origin in origins {
            if is_blocked(origin) {
                continue;
            }

            if let Some(index) = self.index(origin) {
                if self.distances[index] == 0 {
                    continue;
                }

                self.distances[index] = 0;
                queue.push_back(origin);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let current_distance = self.distances[current_index];

            if current_distance >= u16::MAX.saturating_sub(1) {
                continue;
            }

            let next_distance = current_distance + 1;

            for direction in Direction::ALL {
                let neighbor = cell.offset(direction);
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };

                if is_blocked(neighbor) {
                    continue;
                }

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it lies within the field and is reachable.
    #[must_use]
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u16> {
        self.index(cell)
            .and_then(|offset| self.distances.get(offset).copied())
            .filter(|distance| *distance != u16::MAX)
    }

    /// Walks strictly downhill from `from` until reaching an origin.
    ///
    /// Returns the visited cells excluding `from`, or `None` when `from` is
    /// unreachable. Ties between equally close neighbors resolve in north,
    /// east, south, west order.
    #[must_use]
    pub(crate) fn descend(&self, from: CellCoord) -> Option<Vec<CellCoord>> {
        let mut current_distance = self.distance(from)?;
        let mut cell = from;
        let mut route = Vec::with_capacity(usize::from(current_distance));

        while current_distance > 0 {
            let next = Direction::ALL
                .into_iter()
                .map(|direction| cell.offset(direction))
                .find(|neighbor| self.distance(*neighbor) == Some(current_distance - 1))?;
            route.push(next);
            cell = next;
            current_distance -= 1;
        }

        Some(route)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        usize::try_from(row)
            .ok()?
            .checked_mul(width)?
            .checked_add(usize::try_from(column).ok()?)
    }
}
