//! Depth-limited breadth-first route planning.

use std::collections::{HashMap, HashSet, VecDeque};

use dark_maze_core::{CellCoord, Direction};

/// Shortest walkable route from `from` (exclusive) to `to` (inclusive).
///
/// The search explores at most `max_depth` steps away from `from`. An empty
/// route is returned when the target is unreachable within that bound, when it
/// is not walkable, or when `from == to`. Neighbors are expanded in
/// north, east, south, west order, so ties between equally short routes always
/// resolve the same way.
pub fn bounded_path<F>(
    from: CellCoord,
    to: CellCoord,
    max_depth: u32,
    is_walkable: F,
) -> Vec<CellCoord>
where
    F: Fn(CellCoord) -> bool,
{
    if from == to || max_depth == 0 || !is_walkable(to) {
        return Vec::new();
    }

    let mut parents: HashMap<CellCoord, CellCoord> = HashMap::new();
    let mut visited: HashSet<CellCoord> = HashSet::new();
    let mut queue: VecDeque<(CellCoord, u32)> = VecDeque::new();
    let _ = visited.insert(from);
    queue.push_back((from, 0));

    while let Some((cell, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for direction in Direction::ALL {
            let next = cell.offset(direction);
            if !is_walkable(next) || !visited.insert(next) {
                continue;
            }

            let _ = parents.insert(next, cell);
            if next == to {
                return reconstruct(&parents, from, to);
            }
            queue.push_back((next, depth + 1));
        }
    }

    Vec::new()
}

fn reconstruct(
    parents: &HashMap<CellCoord, CellCoord>,
    from: CellCoord,
    to: CellCoord,
) -> Vec<CellCoord> {
    let mut route = vec![to];
    let mut cursor = to;
    while let Some(&parent) = parents.get(&cursor) {
        if parent == from {
            break;
        }
        route.push(parent);
        cursor = parent;
    }
    route.reverse();
    route
}
