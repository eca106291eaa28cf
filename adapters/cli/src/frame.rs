//! Plain-text rendering of what the player can currently see.

use dark_maze_core::{CellCoord, CellKind};
use dark_maze_world::{query, World};

const DARK: char = ' ';
const PLAYER: char = '@';
const PURSUER: char = 'M';

/// Renders the lit portion of the maze, one line per row.
///
/// Unlit cells stay blank. Dim floor is drawn with `.` and bright floor with
/// `:`. The pursuer is only drawn when its cell is lit.
pub(crate) fn render(world: &World) -> String {
    let maze = query::maze(world);
    let view = query::visible_cells(world);
    let player = query::player_cell(world);
    let pursuer = query::pursuer_cell(world);

    let width = maze.width() as usize;
    let mut rows: Vec<Vec<char>> = vec![vec![DARK; width]; maze.height() as usize];

    for visible in view.iter() {
        let glyph = if visible.cell == pursuer {
            PURSUER
        } else {
            terrain_glyph(visible.kind, visible.intensity)
        };
        if let Some(slot) = slot_mut(&mut rows, visible.cell) {
            *slot = glyph;
        }
    }

    if let Some(slot) = slot_mut(&mut rows, player) {
        *slot = PLAYER;
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

fn terrain_glyph(kind: CellKind, intensity: f32) -> char {
    match kind {
        CellKind::Wall => '#',
        CellKind::Start => 'S',
        CellKind::Prize => 'P',
        CellKind::Floor if intensity >= 0.5 => ':',
        CellKind::Floor => '.',
    }
}

fn slot_mut(rows: &mut [Vec<char>], cell: CellCoord) -> Option<&mut char> {
    let row = usize::try_from(cell.y()).ok()?;
    let column = usize::try_from(cell.x()).ok()?;
    rows.get_mut(row)?.get_mut(column)
}
