//! The decorative "42" glyph stamped into the middle of every maze large enough
//! to hold it.

use super::Coord;

/// Glyph rows, `1` marks a blocked cell.
const GLYPH: [[u8; 7]; 5] = [
    [1, 0, 0, 0, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 1, 1],
    [0, 0, 1, 0, 1, 0, 0],
    [0, 0, 1, 0, 1, 1, 1],
];

pub const GLYPH_WIDTH: u8 = 7;
pub const GLYPH_HEIGHT: u8 = 5;

/// Why the overlay could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Omitted {
    TooSmall,
    CoversEntry,
    CoversExit,
}

/// Computes the blocked cells of the glyph for the given maze.
///
/// The glyph is centered and unscaled. It needs a free column on each side and
/// a free row below, so mazes narrower than 9 or shorter than 6 cells get no
/// overlay. It is also dropped when it would swallow the entry or the exit.
pub fn overlay_cells(width: u8, height: u8, entry: Coord, exit: Coord) -> Result<Vec<Coord>, Omitted> {
    if width < GLYPH_WIDTH + 2 || height < GLYPH_HEIGHT + 1 {
        return Err(Omitted::TooSmall);
    }
    let offset_x = (width - GLYPH_WIDTH) / 2;
    let offset_y = (height - GLYPH_HEIGHT) / 2;

    let cells = GLYPH
        .iter()
        .enumerate()
        .flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter(|&(_, &bit)| bit == 1)
                .map(move |(col, _)| (offset_x + col as u8, offset_y + row as u8))
        })
        .collect::<Vec<_>>();

    if cells.contains(&entry) {
        return Err(Omitted::CoversEntry);
    }
    if cells.contains(&exit) {
        return Err(Omitted::CoversExit);
    }
    Ok(cells)
}
