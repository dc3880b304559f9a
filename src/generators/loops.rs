use rand::{rngs::StdRng, seq::SliceRandom};

use super::GridEvent;
use crate::maze::{Coord, Direction, Maze};

/// Second pass for imperfect mazes: opens a bounded number of extra walls in
/// random order, creating cycles.
pub(super) struct LoopState {
    /// Shuffled interior edges, consumed from the back
    candidates: Vec<(Coord, Direction)>,
    /// Openings still allowed
    remaining: usize,
}

impl LoopState {
    /// One extra opening per twenty cells, and at least one.
    pub(super) fn budget(maze: &Maze) -> usize {
        (maze.width() as usize * maze.height() as usize / 20).max(1)
    }

    pub(super) fn new(maze: &Maze, rng: &mut StdRng) -> Self {
        let (width, height) = (maze.width(), maze.height());
        let mut candidates = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .flat_map(|(x, y)| {
                [
                    (y + 1 < height).then_some(((x, y), Direction::South)),
                    (x + 1 < width).then_some(((x, y), Direction::East)),
                ]
            })
            .flatten()
            .collect::<Vec<_>>();
        candidates.shuffle(rng);
        LoopState {
            candidates,
            remaining: LoopState::budget(maze),
        }
    }

    /// Opens the next eligible wall. Returns `None` once the budget is spent or
    /// no candidate is left.
    pub(super) fn step(&mut self, maze: &mut Maze) -> Option<GridEvent> {
        while self.remaining > 0 {
            let (cell, direction) = self.candidates.pop()?;
            let Some(neighbor) = maze.neighbor(cell, direction) else {
                continue;
            };
            if maze.is_blocked(cell) || maze.is_blocked(neighbor) || !maze.has_wall(cell, direction) {
                continue;
            }
            match maze.carve(cell, direction) {
                Ok(true) => {
                    self.remaining -= 1;
                    return Some(GridEvent {
                        from: cell,
                        direction,
                        to: neighbor,
                    });
                }
                Ok(false) => {}
                Err(violation) => {
                    tracing::debug!("Rejected loop candidate: {}", violation);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Generator, MazeParams, generate_maze};
    use rand::SeedableRng;

    #[test]
    fn test_budget() {
        let small = Maze::new(3, 3, (0, 0), (2, 2)).unwrap();
        assert_eq!(LoopState::budget(&small), 1);
        let large = Maze::new(20, 10, (0, 0), (19, 9)).unwrap();
        assert_eq!(LoopState::budget(&large), 10);
    }

    #[test]
    fn test_adds_cycles_without_rooms() {
        let params = MazeParams {
            width: 20,
            height: 10,
            entry: (0, 0),
            exit: (19, 9),
            perfect: true,
            seed: Some(3),
            generator: Generator::Dfs,
        };
        let mut maze = generate_maze(&params).unwrap();
        let tree_edges = maze.open_wall_count();

        let mut rng = StdRng::seed_from_u64(3);
        let mut state = LoopState::new(&maze, &mut rng);
        let mut added = 0;
        while state.step(&mut maze).is_some() {
            added += 1;
        }
        assert!(added > 0 && added <= 10);
        assert_eq!(maze.open_wall_count(), tree_edges + added);
        assert!(!maze.has_open_room());
    }
}
