mod bfs;

use std::fmt;

pub use bfs::{solve_bfs, solve_bfs_paths};

use crate::error::MazeError;
use crate::maze::{Coord, Direction, Maze};

/// Ordered cells from the start to the goal, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Coord>,
}

impl Path {
    /// Builds a path by walking `directions` from `start` through open walls.
    /// Returns `None` if a move leaves the maze or crosses a wall.
    pub fn walk(maze: &Maze, start: Coord, directions: &[Direction]) -> Option<Path> {
        let mut cells = vec![start];
        let mut current = start;
        for &direction in directions {
            if !maze.can_move(current, direction) {
                return None;
            }
            current = maze.neighbor(current, direction)?;
            cells.push(current);
        }
        Some(Path { cells })
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Number of cells on the path.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves, one less than the number of cells.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Coord> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Coord> {
        self.cells.last().copied()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// The path as a sequence of moves.
    pub fn directions(&self) -> Vec<Direction> {
        self.cells
            .windows(2)
            .filter_map(|pair| Direction::between(pair[0], pair[1]))
            .collect()
    }
}

/// Formats the moves as `N`, `S`, `E`, `W` letters.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.directions()
            .into_iter()
            .try_for_each(|d| write!(f, "{}", d.letter()))
    }
}

/// Shortest path from the maze's entry to its exit.
///
/// An `UnreachableExit` error means the maze lost its connectivity, which a
/// generated maze never does.
pub fn solve_maze(maze: &Maze) -> Result<Path, MazeError> {
    let path = solve_bfs(maze, maze.entry(), maze.exit())?;
    tracing::debug!("Solved maze in {} steps", path.steps());
    Ok(path)
}

/// Up to `count` distinct paths from the entry to the exit, shortest first.
///
/// A perfect maze always yields exactly one.
pub fn solve_paths(maze: &Maze, count: usize) -> Result<Vec<Path>, MazeError> {
    solve_bfs_paths(maze, maze.entry(), maze.exit(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_directions() {
        let mut maze = Maze::new(2, 2, (0, 0), (1, 0)).unwrap();
        maze.open_wall((0, 0), Direction::South).unwrap();
        maze.open_wall((0, 1), Direction::East).unwrap();
        maze.open_wall((1, 1), Direction::North).unwrap();
        let path = solve_maze(&maze).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.steps(), 3);
        assert_eq!(path.start(), Some((0, 0)));
        assert_eq!(path.end(), Some((1, 0)));
        assert_eq!(path.to_string(), "SEN");
    }

    #[test]
    fn test_walk() {
        let mut maze = Maze::new(2, 2, (0, 0), (1, 0)).unwrap();
        maze.open_wall((0, 0), Direction::South).unwrap();
        let path = Path::walk(&maze, (0, 0), &[Direction::South]).unwrap();
        assert_eq!(path.cells(), &[(0, 0), (0, 1)]);
        assert_eq!(Path::walk(&maze, (0, 0), &[Direction::East]), None);
        assert_eq!(Path::walk(&maze, (0, 0), &[Direction::North]), None);
    }

    #[test]
    fn test_solve_paths_on_imperfect_maze() {
        // 3x3 with the centre ring opened around (1, 1): two routes from the entry to the exit
        let mut maze = Maze::new(3, 3, (0, 0), (2, 2)).unwrap();
        maze.open_wall((0, 0), Direction::East).unwrap();
        maze.open_wall((1, 0), Direction::East).unwrap();
        maze.open_wall((2, 0), Direction::South).unwrap();
        maze.open_wall((2, 1), Direction::South).unwrap();
        maze.open_wall((0, 0), Direction::South).unwrap();
        maze.open_wall((0, 1), Direction::South).unwrap();
        maze.open_wall((0, 2), Direction::East).unwrap();
        maze.open_wall((1, 2), Direction::East).unwrap();

        let paths = solve_paths(&maze, 2).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], solve_maze(&maze).unwrap());
        assert_eq!(paths[0].to_string(), "SSEE");
        assert_eq!(paths[1].to_string(), "EESS");
    }
}
