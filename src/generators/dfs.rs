use rand::{Rng, rngs::StdRng};

use super::GridEvent;
use crate::maze::{Coord, Direction, Maze};

/// Randomized depth-first backtracker, started from the entry.
pub(super) struct DfsState {
    /// Path from the entry to the cell currently being extended
    stack: Vec<Coord>,
}

impl DfsState {
    pub(super) fn new(maze: &mut Maze) -> Self {
        let start = maze.entry();
        maze.cell_mut(start).visited = true;
        DfsState { stack: vec![start] }
    }

    /// Carves until one wall has been opened. Returns `None` once every
    /// reachable cell has been visited and the stack is empty.
    pub(super) fn step(&mut self, maze: &mut Maze, rng: &mut StdRng) -> Option<GridEvent> {
        while let Some(&cell) = self.stack.last() {
            let mut candidates = maze
                .neighbors(cell)
                .filter(|&(_, c)| !maze[c].visited && !maze.is_blocked(c))
                .collect::<Vec<(Direction, Coord)>>();

            while !candidates.is_empty() {
                let (direction, neighbor) = candidates.swap_remove(rng.random_range(0..candidates.len()));
                match maze.carve(cell, direction) {
                    Ok(_) => {
                        maze.cell_mut(neighbor).visited = true;
                        // Carve the maze in that neighbor's direction next
                        self.stack.push(neighbor);
                        return Some(GridEvent {
                            from: cell,
                            direction,
                            to: neighbor,
                        });
                    }
                    Err(violation) => {
                        tracing::debug!("Rejected DFS candidate: {}", violation);
                    }
                }
            }
            // Dead end, backtrack
            self.stack.pop();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_randomized_dfs() {
        let mut maze = Maze::new(7, 7, (0, 0), (6, 6)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = DfsState::new(&mut maze);
        let first = state.step(&mut maze, &mut rng).unwrap();
        // The walk starts at the entry
        assert_eq!(first.from, (0, 0));
        while state.step(&mut maze, &mut rng).is_some() {}
        // Every cell outside the overlay is visited and connected
        assert!(maze.cells().all(|c| c.visited != c.immutable));
        assert_eq!(maze.connected_cell_count(), maze.reachable_cell_count());
        assert_eq!(maze.open_wall_count(), maze.reachable_cell_count() - 1);
    }
}
