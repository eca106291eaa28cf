//! Sampled line-of-sight test between two grid cells.

use dark_maze_core::CellCoord;
use glam::Vec2;

/// Number of samples taken along a segment of the provided length.
///
/// At least one interior sample is always taken so that adjacent cells are
/// still checked against the occluder predicate.
#[must_use]
pub fn sample_count(distance: f32, samples_per_unit: f32) -> u32 {
    let samples = (distance * samples_per_unit.max(0.0)).ceil();
    if samples.is_finite() && samples >= 1.0 {
        samples as u32
    } else {
        1
    }
}

/// Reports whether no opaque cell lies between `from` and `to`.
///
/// The segment joins the two cell centres and is sampled
/// `sample_count(distance, samples_per_unit)` times. Each sample is floored to
/// the cell containing it. Samples that land on either endpoint are skipped, so
/// an opaque target (a wall face) can still be seen. A segment that grazes a
/// wall corner may pass between two diagonal walls; the outcome only depends
/// on the sampling density.
pub fn line_of_sight<F>(from: CellCoord, to: CellCoord, samples_per_unit: f32, is_opaque: F) -> bool
where
    F: Fn(CellCoord) -> bool,
{
    if from == to {
        return true;
    }

    let start = from.to_vec2() + Vec2::splat(0.5);
    let end = to.to_vec2() + Vec2::splat(0.5);
    let steps = sample_count(start.distance(end), samples_per_unit);

    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let point = start.lerp(end, t);
        let cell = CellCoord::new(point.x.floor() as i32, point.y.floor() as i32);
        if cell == from || cell == to {
            continue;
        }
        if is_opaque(cell) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_is_two_per_unit_rounded_up() {
        assert_eq!(sample_count(3.0, 2.0), 6);
        assert_eq!(sample_count(1.2, 2.0), 3);
        assert_eq!(sample_count(0.0, 2.0), 1);
        assert_eq!(sample_count(5.0, 0.0), 1);
    }

    #[test]
    fn wall_on_straight_segment_blocks() {
        let wall = CellCoord::new(2, 1);
        let blocked = |cell: CellCoord| cell == wall;
        assert!(!line_of_sight(
            CellCoord::new(1, 1),
            CellCoord::new(4, 1),
            2.0,
            blocked
        ));
        assert!(line_of_sight(
            CellCoord::new(1, 1),
            CellCoord::new(1, 4),
            2.0,
            blocked
        ));
    }

    #[test]
    fn endpoints_are_never_treated_as_occluders() {
        let all_opaque = |_: CellCoord| true;
        assert!(line_of_sight(
            CellCoord::new(3, 3),
            CellCoord::new(4, 3),
            2.0,
            all_opaque
        ));
        assert!(line_of_sight(
            CellCoord::new(3, 3),
            CellCoord::new(3, 3),
            2.0,
            all_opaque
        ));
    }

    #[test]
    fn result_is_symmetric_for_axis_aligned_segments() {
        let wall = CellCoord::new(5, 2);
        let blocked = |cell: CellCoord| cell == wall;
        let a = CellCoord::new(5, 0);
        let b = CellCoord::new(5, 4);
        assert_eq!(
            line_of_sight(a, b, 2.0, blocked),
            line_of_sight(b, a, 2.0, blocked)
        );
    }
}
