use std::fmt;

use crate::error::ConstraintViolation;

/// Cell coordinate as `(x, y)`, with `(0, 0)` at the top-left corner.
pub type Coord = (u8, u8);

/// One of the four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed enumeration order. The solver expands neighbors in this order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Bit of this wall inside a cell's nibble: `north|south|east|west` from
    /// most to least significant.
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b1000,
            Direction::South => 0b0100,
            Direction::East => 0b0010,
            Direction::West => 0b0001,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Step applied to a coordinate when moving in this direction.
    pub const fn offset(self) -> (i16, i16) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Letter used for this move in the output file.
    pub const fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.letter() == letter)
    }

    /// Direction leading from `from` to the 4-adjacent cell `to`, if they are adjacent.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        let dx = to.0 as i16 - from.0 as i16;
        let dy = to.1 as i16 - from.1 as i16;
        Direction::ALL.into_iter().find(|d| d.offset() == (dx, dy))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{}", name)
    }
}

/// Wall and visit state of a single maze cell.
///
/// Walls are stored redundantly on both sides of every interior edge so that a
/// cell can answer passability queries on its own. Keeping both copies in sync
/// is the job of [`Maze::open_wall`](crate::maze::Maze::open_wall).
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub coord: Coord,
    /// Wall nibble, see [`Direction::bit`]
    walls: u8,
    /// Generation-time scratch flag
    pub visited: bool,
    /// Part of the decorative overlay: all four walls stay closed
    pub immutable: bool,
}

impl Cell {
    pub const ALL_WALLS: u8 = 0b1111;

    /// A fully walled, unvisited cell.
    pub fn new(coord: Coord) -> Self {
        Cell {
            coord,
            walls: Cell::ALL_WALLS,
            visited: false,
            immutable: false,
        }
    }

    pub(crate) fn with_walls(coord: Coord, walls: u8) -> Self {
        Cell {
            coord,
            walls: walls & Cell::ALL_WALLS,
            visited: false,
            immutable: false,
        }
    }

    /// Wall nibble as stored in the hex encoding.
    pub fn walls(&self) -> u8 {
        self.walls
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls & direction.bit() != 0
    }

    /// Whether a move out of this cell in `direction` is possible.
    pub fn is_passable(&self, direction: Direction) -> bool {
        !self.immutable && !self.has_wall(direction)
    }

    /// Number of open sides.
    pub fn open_sides(&self) -> u32 {
        (!self.walls & Cell::ALL_WALLS).count_ones()
    }

    /// Opens the wall on this side only. Overlay cells refuse.
    pub fn open(&mut self, direction: Direction) -> Result<(), ConstraintViolation> {
        if self.immutable {
            return Err(ConstraintViolation::ImmutableWall {
                coord: self.coord,
                direction,
            });
        }
        self.walls &= !direction.bit();
        Ok(())
    }
}

/// `visited` is scratch state and does not take part in equality.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord && self.walls == other.walls && self.immutable == other.immutable
    }
}

impl Eq for Cell {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_north_south_east_west() {
        let bits = Direction::ALL.map(|d| d.bit());
        assert_eq!(bits, [8, 4, 2, 1]);
    }

    #[test]
    fn test_open_wall() {
        let mut cell = Cell::new((0, 0));
        assert!(!cell.is_passable(Direction::East));
        cell.open(Direction::East).unwrap();
        assert!(cell.is_passable(Direction::East));
        assert_eq!(cell.walls(), 0b1101);
        assert_eq!(cell.open_sides(), 1);
    }

    #[test]
    fn test_immutable_cell_rejects_opening() {
        let mut cell = Cell::new((2, 3));
        cell.immutable = true;
        assert_eq!(
            cell.open(Direction::South),
            Err(ConstraintViolation::ImmutableWall {
                coord: (2, 3),
                direction: Direction::South
            })
        );
        assert_eq!(cell.walls(), Cell::ALL_WALLS);
    }

    #[test]
    fn test_between() {
        assert_eq!(Direction::between((1, 1), (1, 0)), Some(Direction::North));
        assert_eq!(Direction::between((1, 1), (0, 1)), Some(Direction::West));
        assert_eq!(Direction::between((1, 1), (2, 2)), None);
        assert_eq!(Direction::between((1, 1), (1, 1)), None);
    }

    #[test]
    fn test_equality_ignores_visited() {
        let a = Cell::new((0, 0));
        let mut b = Cell::new((0, 0));
        b.visited = true;
        assert_eq!(a, b);
    }
}
