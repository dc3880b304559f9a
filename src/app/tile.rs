use crossterm::style::{Color, StyledContent, Stylize};

use std::fmt;

/// One square of the terminal picture. A maze of `w x h` cells is drawn as
/// `(2w + 1) x (2h + 1)` tiles: cells sit on odd coordinates, walls and
/// corners between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
    Entry,
    Exit,
    /// Cell of the "42" overlay
    Pattern,
    /// Part of the shortest displayed solution
    Route,
    /// Part of the second displayed solution of an imperfect maze
    AltRoute,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const WIDTH: u16 = 2;

    /// Tiles for the displayed paths, shortest first.
    pub const ROUTES: [Tile; 2] = [Tile::Route, Tile::AltRoute];

    /// Styled glyph, with walls drawn in `wall_color`.
    pub fn styled(&self, wall_color: Color) -> StyledContent<&'static str> {
        let styled_symbol = match self {
            Tile::Wall => "██".with(wall_color),
            Tile::Open => "  ".with(Color::Reset),
            Tile::Entry => "██".with(Color::Magenta),
            Tile::Exit => "██".with(Color::Red),
            Tile::Pattern => "██".with(Color::DarkBlue),
            Tile::Route => "██".with(Color::Green),
            Tile::AltRoute => "██".with(Color::Blue),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        styled_symbol
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.styled(Color::White))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_tiles_are_two_columns_wide() {
        for tile in [Tile::Wall, Tile::Open, Tile::Entry, Tile::Exit, Tile::Pattern, Tile::Route, Tile::AltRoute] {
            assert_eq!(tile.styled(Color::Cyan).content().width(), 2);
        }
    }
}
