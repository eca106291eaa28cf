//! Fair spawn placement for the pursuer.

use dark_maze_core::{tuning::PursuitTuning, CellCoord};
use rand::{seq::SliceRandom, Rng};

/// Floor cell considered for a pursuer spawn, annotated by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnCandidate {
    /// Cell under consideration.
    pub cell: CellCoord,
    /// Corridor distance from the start cell.
    pub start_distance: u32,
    /// Corridor distance from the prize cell.
    pub prize_distance: u32,
    /// Number of walkable orthogonal neighbors.
    pub walkable_neighbors: u8,
}

/// Reports whether spawning at `candidate` leaves the player a way around.
///
/// A cell is unsafe when it sits in a narrow corridor (two or fewer walkable
/// neighbors) and roughly along the straight line from `start` toward `prize`,
/// where it could seal off the only sensible route.
#[must_use]
pub fn is_safe_spawn(
    candidate: &SpawnCandidate,
    start: CellCoord,
    prize: CellCoord,
    axis_alignment: f32,
) -> bool {
    if candidate.walkable_neighbors > 2 {
        return true;
    }

    let axis = (prize - start).to_vec2().normalize_or_zero();
    let heading = (candidate.cell - start).to_vec2().normalize_or_zero();
    axis.dot(heading) <= axis_alignment
}

/// Picks a spawn cell from `candidates`.
///
/// Preference order: safe cells far enough from both start and prize, then any
/// cell far enough from both, then any candidate at all. Returns `None` only
/// when `candidates` is empty.
pub fn choose_spawn<R>(
    candidates: &[SpawnCandidate],
    start: CellCoord,
    prize: CellCoord,
    tuning: &PursuitTuning,
    rng: &mut R,
) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    let distant: Vec<SpawnCandidate> = candidates
        .iter()
        .copied()
        .filter(|candidate| {
            candidate.start_distance >= tuning.min_start_distance
                && candidate.prize_distance >= tuning.min_prize_distance
        })
        .collect();
    let safe: Vec<SpawnCandidate> = distant
        .iter()
        .copied()
        .filter(|candidate| is_safe_spawn(candidate, start, prize, tuning.axis_alignment))
        .collect();

    let chosen = [safe.as_slice(), distant.as_slice(), candidates]
        .into_iter()
        .find(|pool| !pool.is_empty())
        .and_then(|pool| pool.choose(rng))
        .map(|candidate| candidate.cell);
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const START: CellCoord = CellCoord::new(1, 1);
    const PRIZE: CellCoord = CellCoord::new(19, 9);

    fn candidate(x: i32, y: i32, start: u32, prize: u32, neighbors: u8) -> SpawnCandidate {
        SpawnCandidate {
            cell: CellCoord::new(x, y),
            start_distance: start,
            prize_distance: prize,
            walkable_neighbors: neighbors,
        }
    }

    #[test]
    fn corridor_on_main_axis_is_unsafe() {
        let on_axis = candidate(10, 5, 18, 18, 2);
        assert!(!is_safe_spawn(&on_axis, START, PRIZE, 0.7));

        let junction = candidate(10, 5, 18, 18, 3);
        assert!(is_safe_spawn(&junction, START, PRIZE, 0.7));

        let off_axis = candidate(1, 19, 18, 18, 2);
        assert!(is_safe_spawn(&off_axis, START, PRIZE, 0.7));
    }

    #[test]
    fn safe_cells_are_preferred() {
        let tuning = PursuitTuning::default();
        let candidates = [
            candidate(10, 5, 18, 18, 2),
            candidate(1, 19, 18, 18, 2),
            candidate(2, 1, 1, 30, 3),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            let chosen = choose_spawn(&candidates, START, PRIZE, &tuning, &mut rng);
            assert_eq!(chosen, Some(CellCoord::new(1, 19)));
        }
    }

    #[test]
    fn falls_back_to_distant_then_any_cell() {
        let tuning = PursuitTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let distant_only = [candidate(10, 5, 18, 18, 2), candidate(2, 1, 1, 30, 3)];
        assert_eq!(
            choose_spawn(&distant_only, START, PRIZE, &tuning, &mut rng),
            Some(CellCoord::new(10, 5))
        );

        let close_only = [candidate(2, 1, 1, 30, 3)];
        assert_eq!(
            choose_spawn(&close_only, START, PRIZE, &tuning, &mut rng),
            Some(CellCoord::new(2, 1))
        );

        assert_eq!(choose_spawn(&[], START, PRIZE, &tuning, &mut rng), None);
    }
}
