pub mod cell;
pub mod grid;
pub mod pattern;

use std::collections::VecDeque;

pub use cell::{Cell, Coord, Direction};
use grid::Grid;

use crate::error::{ConfigError, ConstraintViolation, EncodingError, MazeError};
use crate::generators::Generator;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u8 = 100;

/// A rectangular maze: cells with redundant per-side walls plus the entry,
/// exit and generation metadata.
#[derive(Debug, Clone)]
pub struct Maze {
    cells: Grid<Cell>,
    width: u8,
    height: u8,
    entry: Coord,
    exit: Coord,
    /// Algorithm that built the maze
    pub generator: Generator,
    /// Seed that drove the generator
    pub seed: u64,
    /// Whether the maze was generated without extra loops
    pub perfect: bool,
}

impl Maze {
    /// Creates a fully walled maze with the "42" overlay applied.
    ///
    /// Fails when a dimension is outside `1..=100`, when entry or exit lies outside
    /// the maze or when they coincide.
    pub fn new(width: u8, height: u8, entry: Coord, exit: Coord) -> Result<Self, MazeError> {
        Maze::validate(width, height, entry, exit)?;
        let mut maze = Maze {
            cells: Grid::from_fn(width, height, Cell::new),
            width,
            height,
            entry,
            exit,
            generator: Generator::default(),
            seed: 0,
            perfect: true,
        };
        maze.apply_overlay(true);
        Ok(maze)
    }

    fn validate(width: u8, height: u8, entry: Coord, exit: Coord) -> Result<(), ConfigError> {
        for (name, value) in [("width", width), ("height", height)] {
            if !(1..=MAX_DIMENSION).contains(&value) {
                return Err(ConfigError::DimensionOutOfRange {
                    name,
                    value: value as i64,
                    max: MAX_DIMENSION,
                });
            }
        }
        for (name, coord) in [("entry", entry), ("exit", exit)] {
            if coord.0 >= width || coord.1 >= height {
                return Err(ConfigError::CoordOutOfBounds {
                    name,
                    coord: (coord.0 as i64, coord.1 as i64),
                    width,
                    height,
                });
            }
        }
        if entry == exit {
            return Err(ConfigError::EntryEqualsExit);
        }
        Ok(())
    }

    /// Marks the overlay cells immutable. They keep all four walls, which also
    /// closes the facing wall of each neighbor since walls are mirrored.
    fn apply_overlay(&mut self, log: bool) {
        match pattern::overlay_cells(self.width, self.height, self.entry, self.exit) {
            Ok(cells) => {
                for coord in cells {
                    self.cells[coord].immutable = true;
                }
            }
            Err(reason) if log => {
                tracing::warn!(
                    "The '42' pattern is omitted for the {}x{} maze: {:?}",
                    self.width,
                    self.height,
                    reason
                );
            }
            Err(_) => {}
        }
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn entry(&self) -> Coord {
        self.entry
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    /// Whether the cell belongs to the decorative overlay.
    pub fn is_blocked(&self, coord: Coord) -> bool {
        self.cells.get(coord).is_some_and(|c| c.immutable)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        &mut self.cells[coord]
    }

    /// The cell one step away in `direction`, if it exists.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        let (dx, dy) = direction.offset();
        let x = coord.0 as i16 + dx;
        let y = coord.1 as i16 + dy;
        if x < 0 || y < 0 || x >= self.width as i16 || y >= self.height as i16 {
            return None;
        }
        Some((x as u8, y as u8))
    }

    /// In-bounds neighbors of a cell, in [`Direction::ALL`] order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.neighbor(coord, d).map(|n| (d, n)))
    }

    /// Whether a wall separates `coord` from its neighbor in `direction`.
    /// Sides on the outer boundary always count as walled.
    pub fn has_wall(&self, coord: Coord, direction: Direction) -> bool {
        match self.neighbor(coord, direction) {
            Some(_) => self.cells[coord].has_wall(direction),
            None => true,
        }
    }

    /// Whether a move from `coord` in `direction` stays inside the maze and crosses no wall.
    pub fn can_move(&self, coord: Coord, direction: Direction) -> bool {
        match self.neighbor(coord, direction) {
            Some(next) => {
                self.cells[coord].is_passable(direction)
                    && self.cells[next].is_passable(direction.opposite())
            }
            None => false,
        }
    }

    /// Removes the wall between `from` and its neighbor in `direction`, on both sides.
    ///
    /// Returns `true` if a wall was removed and `false` if the passage was
    /// already open. Overlay cells and the outer boundary are never opened.
    pub fn open_wall(&mut self, from: Coord, direction: Direction) -> Result<bool, ConstraintViolation> {
        let to = self
            .neighbor(from, direction)
            .ok_or(ConstraintViolation::NoNeighbor {
                coord: from,
                direction,
            })?;
        for (coord, side) in [(from, direction), (to, direction.opposite())] {
            if self.cells[coord].immutable {
                return Err(ConstraintViolation::ImmutableWall {
                    coord,
                    direction: side,
                });
            }
        }
        if !self.cells[from].has_wall(direction) {
            return Ok(false);
        }
        self.cells[from].open(direction)?;
        self.cells[to].open(direction.opposite())?;
        Ok(true)
    }

    /// Opens a wall unless doing so would leave a 2x2 block with no interior wall.
    pub fn carve(&mut self, from: Coord, direction: Direction) -> Result<bool, ConstraintViolation> {
        if self.would_open_room(from, direction) {
            return Err(ConstraintViolation::OpenRoom {
                coord: from,
                direction,
            });
        }
        self.open_wall(from, direction)
    }

    /// Checks both 2x2 blocks containing the edge between `from` and its
    /// neighbor in `direction`, as if that edge were already open.
    pub fn would_open_room(&self, from: Coord, direction: Direction) -> bool {
        let Some(to) = self.neighbor(from, direction) else {
            return false;
        };
        // Normalize to the upper or left cell of the pair
        let (anchor, horizontal) = match direction {
            Direction::East => (from, true),
            Direction::West => (to, true),
            Direction::South => (from, false),
            Direction::North => (to, false),
        };
        let (x, y) = anchor;
        let candidates: [Option<Coord>; 2] = if horizontal {
            // The edge is a vertical wall segment: blocks above and below it
            [y.checked_sub(1).map(|y| (x, y)), Some((x, y))]
        } else {
            // The edge is a horizontal wall segment: blocks left and right of it
            [x.checked_sub(1).map(|x| (x, y)), Some((x, y))]
        };
        let target = if horizontal {
            (anchor, Direction::East)
        } else {
            (anchor, Direction::South)
        };
        candidates
            .into_iter()
            .flatten()
            .any(|top_left| self.is_open_block(top_left, target))
    }

    /// Whether all four interior walls of the 2x2 block at `top_left` are open,
    /// counting `assume_open` as open.
    fn is_open_block(&self, top_left: Coord, assume_open: (Coord, Direction)) -> bool {
        let (x, y) = top_left;
        if x as u16 + 1 >= self.width as u16 || y as u16 + 1 >= self.height as u16 {
            return false;
        }
        let edges = [
            ((x, y), Direction::East),
            ((x, y), Direction::South),
            ((x + 1, y), Direction::South),
            ((x, y + 1), Direction::East),
        ];
        edges
            .into_iter()
            .all(|edge| edge == assume_open || !self.cells[edge.0].has_wall(edge.1))
    }

    /// Whether some 2x2 block of the maze is fully open.
    pub fn has_open_room(&self) -> bool {
        let sentinel = ((u8::MAX, u8::MAX), Direction::North);
        (0..self.height.saturating_sub(1))
            .flat_map(|y| (0..self.width.saturating_sub(1)).map(move |x| (x, y)))
            .any(|top_left| self.is_open_block(top_left, sentinel))
    }

    /// Number of open interior walls, each edge counted once.
    pub fn open_wall_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|&d| self.neighbor(cell.coord, d).is_some() && !cell.has_wall(d))
                    .count()
            })
            .sum()
    }

    /// Number of cells outside the overlay.
    pub fn reachable_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.immutable).count()
    }

    /// Number of cells reachable from the entry through open walls.
    pub fn connected_cell_count(&self) -> usize {
        let mut seen = Grid::new(self.width, self.height, false);
        let mut queue = VecDeque::from([self.entry]);
        seen[self.entry] = true;
        let mut count = 0;
        while let Some(coord) = queue.pop_front() {
            count += 1;
            for direction in Direction::ALL {
                if let Some(next) = self.neighbor(coord, direction) {
                    if !seen[next] && self.can_move(coord, direction) {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        count
    }

    /// Encodes the walls as one uppercase hex digit per cell, row-major.
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .map(|cell| char::from_digit(cell.walls() as u32, 16).unwrap_or('F'))
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Encoded walls split into one line per row.
    pub fn encode_rows(&self) -> Vec<String> {
        let encoded = self.encode();
        encoded
            .as_bytes()
            .chunks(self.width as usize)
            .map(|row| String::from_utf8_lossy(row).into_owned())
            .collect()
    }

    /// Rebuilds a maze from its hex encoding.
    ///
    /// The overlay is re-derived from the dimensions, entry and exit. Both copies
    /// of every interior wall must agree.
    pub fn decode(
        width: u8,
        height: u8,
        entry: Coord,
        exit: Coord,
        encoded: &str,
    ) -> Result<Self, MazeError> {
        Maze::validate(width, height, entry, exit)?;
        let expected = width as usize * height as usize;
        let actual = encoded.chars().count();
        if actual != expected {
            return Err(EncodingError::WrongLength { expected, actual }.into());
        }
        let digits = encoded
            .chars()
            .enumerate()
            .map(|(index, ch)| {
                ch.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(EncodingError::InvalidDigit { index, ch })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut maze = Maze {
            cells: Grid::from_fn(width, height, |(x, y)| {
                Cell::with_walls((x, y), digits[y as usize * width as usize + x as usize])
            }),
            width,
            height,
            entry,
            exit,
            generator: Generator::default(),
            seed: 0,
            perfect: true,
        };
        maze.apply_overlay(false);

        for cell in maze.cells.iter() {
            for direction in [Direction::East, Direction::South] {
                if let Some(next) = maze.neighbor(cell.coord, direction) {
                    if cell.has_wall(direction) != maze.cells[next].has_wall(direction.opposite()) {
                        return Err(EncodingError::AsymmetricWall {
                            a: cell.coord,
                            b: next,
                        }
                        .into());
                    }
                }
            }
            if cell.immutable && cell.walls() != Cell::ALL_WALLS {
                return Err(EncodingError::Malformed(format!(
                    "overlay cell {:?} has an open wall",
                    cell.coord
                ))
                .into());
            }
        }
        // A decoded maze is complete: every cell a generator would reach counts as visited
        maze.cells.data.iter_mut().for_each(|c| c.visited = !c.immutable);
        Ok(maze)
    }
}

/// Two mazes are equal when their layout matches. Generation metadata is ignored.
impl PartialEq for Maze {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.entry == other.entry
            && self.exit == other.exit
            && self.cells == other.cells
    }
}

impl Eq for Maze {}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[index]
    }
}
