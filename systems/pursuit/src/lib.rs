#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuer AI that hunts a moving target through the maze.
//!
//! The pursuer keeps a route toward the target it tracks and walks that route
//! one cell at a time. Routes are replanned on a fixed cadence or as soon as
//! the target strays far from where it was when the route was planned. Planning
//! is a depth-limited breadth-first search so that the per-tick cost stays
//! bounded; a target outside that bound simply leaves the pursuer waiting.
//! Walkability is supplied by the caller as a predicate, which keeps this crate
//! independent of how the maze is stored.

mod planner;
mod spawn;

use std::{collections::VecDeque, time::Duration};

use dark_maze_core::{tuning::PursuitTuning, CellCoord};

pub use planner::bounded_path;
pub use spawn::{choose_spawn, is_safe_spawn, SpawnCandidate};

/// Summary of what a single [`Pursuer::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PursuitReport {
    /// Length of the freshly planned route, when a replan happened.
    pub recomputed: Option<usize>,
    /// Cells the pursuer moved between, when it stepped.
    pub step: Option<(CellCoord, CellCoord)>,
    /// Whether a route was dropped because its next waypoint was blocked.
    pub discarded: bool,
}

/// Adversary that tracks a target through walkable cells.
#[derive(Clone, Debug)]
pub struct Pursuer {
    cell: CellCoord,
    path: VecDeque<CellCoord>,
    move_timer: Duration,
    recompute_timer: Duration,
    last_target: Option<CellCoord>,
    tuning: PursuitTuning,
}

impl Pursuer {
    /// Creates a pursuer standing on `cell` with no route yet.
    #[must_use]
    pub fn new(cell: CellCoord, tuning: PursuitTuning) -> Self {
        Self {
            cell,
            path: VecDeque::new(),
            move_timer: Duration::ZERO,
            recompute_timer: Duration::ZERO,
            last_target: None,
            tuning,
        }
    }

    /// Cell currently occupied by the pursuer.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Remaining waypoints of the current route.
    pub fn path(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.path.iter().copied()
    }

    /// Moves the pursuer to `cell` and forgets its route, timers, and target.
    pub fn respawn(&mut self, cell: CellCoord) {
        *self = Self::new(cell, self.tuning.clone());
    }

    /// Reports whether the pursuer stands exactly on `target`.
    #[must_use]
    pub fn has_caught(&self, target: CellCoord) -> bool {
        self.cell == target
    }

    /// Time that must accumulate before the next step at the given light level.
    #[must_use]
    pub fn step_threshold(&self, light: f32) -> Duration {
        let base = self.tuning.step_interval();
        if self.tuning.light_averse && light > self.tuning.light_threshold {
            base.saturating_mul(self.tuning.light_slowdown.max(1))
        } else {
            base
        }
    }

    /// Advances the pursuer by `dt` while it tracks `target`.
    ///
    /// `light` is the illumination measured at the pursuer's own cell and
    /// `is_walkable` answers whether a cell may be entered.
    pub fn tick<F>(
        &mut self,
        dt: Duration,
        target: CellCoord,
        light: f32,
        is_walkable: F,
    ) -> PursuitReport
    where
        F: Fn(CellCoord) -> bool,
    {
        let mut report = PursuitReport::default();
        self.move_timer = self.move_timer.saturating_add(dt);
        self.recompute_timer = self.recompute_timer.saturating_add(dt);

        if self.needs_replan(target) {
            let route = bounded_path(self.cell, target, self.tuning.search_depth, &is_walkable);
            self.path = route.into();
            self.recompute_timer = Duration::ZERO;
            self.last_target = Some(target);
            report.recomputed = Some(self.path.len());
        }

        if self.move_timer > self.step_threshold(light) {
            self.move_timer = Duration::ZERO;
            if let Some(next) = self.path.front().copied() {
                if is_walkable(next) && self.cell.manhattan_distance(next) == 1 {
                    let _ = self.path.pop_front();
                    report.step = Some((self.cell, next));
                    self.cell = next;
                } else {
                    self.path.clear();
                    report.discarded = true;
                }
            }
        }

        report
    }

    fn needs_replan(&self, target: CellCoord) -> bool {
        match self.last_target {
            None => true,
            Some(last) => {
                self.recompute_timer >= self.tuning.recompute_interval()
                    || last.distance(target) > self.tuning.retarget_distance
            }
        }
    }
}
