//! Scripted player that walks the shortest route toward the prize.

use std::time::Duration;

use dark_maze_core::{Command, Direction};
use dark_maze_world::{query, World};

/// Issues at most one move per cooldown, always along the current shortest route.
#[derive(Clone, Debug)]
pub(crate) struct Autopilot {
    cooldown: Duration,
    elapsed: Duration,
}

impl Autopilot {
    pub(crate) fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            elapsed: Duration::ZERO,
        }
    }

    /// Accumulates `dt` and returns the next move once the cooldown has elapsed.
    pub(crate) fn next_command(&mut self, world: &World, dt: Duration) -> Option<Command> {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.cooldown {
            return None;
        }

        let player = query::player_cell(world);
        let prize = query::maze(world).prize();
        let next = query::route(world, player, prize)?.into_iter().next()?;
        let direction = Direction::between(player, next)?;
        self.elapsed = Duration::ZERO;
        Some(Command::MovePlayer { direction })
    }
}
