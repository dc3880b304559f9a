use rand::{Rng, rngs::StdRng, seq::SliceRandom};

use super::GridEvent;
use crate::maze::{Coord, Direction, Maze, grid::Grid};

/// Randomized Prim expansion from the entry.
pub(super) struct PrimState {
    /// Unvisited cells adjacent to the visited region
    frontier: Vec<Coord>,
    /// Membership flags for `frontier`, so no cell is queued twice
    in_frontier: Grid<bool>,
}

impl PrimState {
    pub(super) fn new(maze: &mut Maze) -> Self {
        let start = maze.entry();
        maze.cell_mut(start).visited = true;
        let mut state = PrimState {
            frontier: Vec::new(),
            in_frontier: Grid::new(maze.width(), maze.height(), false),
        };
        state.extend_frontier(maze, start);
        state
    }

    fn extend_frontier(&mut self, maze: &Maze, coord: Coord) {
        for (_, neighbor) in maze.neighbors(coord) {
            if maze[neighbor].visited || maze.is_blocked(neighbor) || self.in_frontier[neighbor] {
                continue;
            }
            self.in_frontier[neighbor] = true;
            self.frontier.push(neighbor);
        }
    }

    /// Attaches frontier cells until one wall has been opened. Returns `None`
    /// when the frontier is empty.
    ///
    /// A frontier cell whose every connector would create a 2x2 open room is
    /// marked visited without an opening and pushed to `anomalies`.
    pub(super) fn step(
        &mut self,
        maze: &mut Maze,
        rng: &mut StdRng,
        anomalies: &mut Vec<Coord>,
    ) -> Option<GridEvent> {
        while !self.frontier.is_empty() {
            // Randomly select a cell from the frontier
            let idx = rng.random_range(0..self.frontier.len());
            let cell = self.frontier.swap_remove(idx);

            let mut connectors = maze
                .neighbors(cell)
                .filter(|&(_, c)| maze[c].visited && !maze.is_blocked(c))
                .collect::<Vec<(Direction, Coord)>>();
            connectors.shuffle(rng);

            let opened = connectors
                .into_iter()
                .find(|&(direction, _)| match maze.carve(cell, direction) {
                    Ok(_) => true,
                    Err(violation) => {
                        tracing::debug!("Rejected Prim connector: {}", violation);
                        false
                    }
                });

            maze.cell_mut(cell).visited = true;
            self.extend_frontier(maze, cell);

            match opened {
                Some((direction, neighbor)) => {
                    return Some(GridEvent {
                        from: neighbor,
                        direction: direction.opposite(),
                        to: cell,
                    });
                }
                None => {
                    tracing::warn!("No valid connector for frontier cell {:?}, left unconnected", cell);
                    anomalies.push(cell);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_frontier_has_no_duplicates() {
        let mut maze = Maze::new(4, 4, (1, 1), (3, 3)).unwrap();
        let state = PrimState::new(&mut maze);
        let mut frontier = state.frontier.clone();
        frontier.sort();
        assert_eq!(frontier, vec![(0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_randomized_prim() {
        let mut maze = Maze::new(10, 8, (0, 0), (9, 7)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut anomalies = Vec::new();
        let mut state = PrimState::new(&mut maze);
        let mut opened = 0;
        while let Some(event) = state.step(&mut maze, &mut rng, &mut anomalies) {
            // Each opening attaches a new cell to an already visited one
            assert!(maze.can_move(event.from, event.direction));
            opened += 1;
        }
        assert!(anomalies.is_empty());
        assert_eq!(opened, maze.reachable_cell_count() - 1);
        assert_eq!(maze.connected_cell_count(), maze.reachable_cell_count());
        // Overlay cells stay untouched
        assert!(maze.cells().filter(|c| c.immutable).all(|c| !c.visited));
    }

    #[test]
    fn test_cell_without_connector() {
        let mut maze = Maze::new(3, 3, (0, 0), (2, 2)).unwrap();
        let mut state = PrimState::new(&mut maze);
        // Three walls of the top-left block are open, so (1, 1) can only attach
        // to (1, 0) by opening the fourth
        maze.open_wall((0, 0), Direction::East).unwrap();
        maze.open_wall((0, 0), Direction::South).unwrap();
        maze.open_wall((0, 1), Direction::East).unwrap();
        maze.cell_mut((1, 0)).visited = true;
        state.frontier = vec![(1, 1)];
        state.in_frontier = Grid::new(3, 3, false);
        state.in_frontier[(1, 1)] = true;

        let mut rng = StdRng::seed_from_u64(1);
        let mut anomalies = Vec::new();
        state.step(&mut maze, &mut rng, &mut anomalies);
        assert_eq!(anomalies, vec![(1, 1)]);
        assert!(maze[(1, 1)].visited);
        assert!(maze.has_wall((1, 1), Direction::North));
        assert!(!maze.has_open_room());

        // The rest of the maze is still attached without creating a room
        while state.step(&mut maze, &mut rng, &mut anomalies).is_some() {}
        assert_eq!(anomalies, vec![(1, 1)]);
        assert!(maze.cells().all(|c| c.visited));
        assert!(!maze.has_open_room());
    }
}
