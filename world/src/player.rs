//! Player actor: position, flashlight aim, and footprint trail.

use std::time::Duration;

use dark_maze_core::{tuning::LightTuning, CellCoord, Direction, INITIAL_AIM};
use dark_maze_system_illumination::{FootprintTrail, Observer};
use glam::Vec2;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    cell: CellCoord,
    aim: Vec2,
    trail: FootprintTrail,
}

impl Player {
    /// Places a player on `cell`, leaving the first footprint there.
    pub(crate) fn spawn(cell: CellCoord, tuning: &LightTuning, now: Duration) -> Self {
        let mut trail = FootprintTrail::from_tuning(tuning);
        trail.record(cell, now);
        Self {
            cell,
            aim: INITIAL_AIM,
            trail,
        }
    }

    pub(crate) fn respawn(&mut self, cell: CellCoord, now: Duration) {
        self.cell = cell;
        self.aim = INITIAL_AIM;
        self.trail.clear();
        self.trail.record(cell, now);
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) const fn aim(&self) -> Vec2 {
        self.aim
    }

    pub(crate) fn trail(&self) -> &FootprintTrail {
        &self.trail
    }

    /// Moves onto `cell`, facing along `direction`. Walkability is checked by the caller.
    pub(crate) fn step_to(&mut self, cell: CellCoord, direction: Direction, now: Duration) {
        self.cell = cell;
        self.aim = direction.unit_vector();
        self.trail.record(cell, now);
    }

    /// Points the flashlight along `direction`; zero or non-finite vectors are ignored.
    pub(crate) fn set_aim(&mut self, direction: Vec2) -> Option<Vec2> {
        let aim = direction.try_normalize()?;
        self.aim = aim;
        Some(aim)
    }

    pub(crate) fn rotate_aim(&mut self, radians: f32) -> Option<Vec2> {
        let rotated = Vec2::from_angle(radians).rotate(self.aim);
        self.set_aim(rotated)
    }

    pub(crate) fn decay_trail(&mut self, now: Duration) -> usize {
        self.trail.decay(now)
    }

    pub(crate) fn observer(&self) -> Observer<'_> {
        Observer {
            position: self.cell,
            aim: self.aim,
            trail: &self.trail,
        }
    }
}
