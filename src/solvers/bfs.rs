use std::collections::VecDeque;

use super::Path;
use crate::error::MazeError;
use crate::maze::{Coord, Direction, Maze, grid::Grid};

/// Breadth-first search over open walls, only following moves `allowed` accepts.
fn search(maze: &Maze, start: Coord, goal: Coord, allowed: impl Fn(Coord, Coord) -> bool) -> Option<Vec<Coord>> {
    if !maze.is_in_bounds(start) || !maze.is_in_bounds(goal) {
        return None;
    }

    // Predecessor of every discovered cell; the start points to itself
    let mut parents: Grid<Option<Coord>> = Grid::new(maze.width(), maze.height(), None);
    parents[start] = Some(start);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            // Backtrack to build the path
            let mut cells = vec![current];
            let mut child = current;
            while child != start {
                let parent = parents[child]?;
                cells.push(parent);
                child = parent;
            }
            cells.reverse();
            return Some(cells);
        }

        for direction in Direction::ALL {
            let Some(next) = maze.neighbor(current, direction) else {
                continue;
            };
            if parents[next].is_none() && maze.can_move(current, direction) && allowed(current, next) {
                parents[next] = Some(current);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Breadth-first search from `start` to `goal` over open walls.
///
/// Neighbors are expanded in [`Direction::ALL`] order, so among several
/// shortest paths the same one is always returned.
pub fn solve_bfs(maze: &Maze, start: Coord, goal: Coord) -> Result<Path, MazeError> {
    match search(maze, start, goal, |_, _| true) {
        Some(cells) => Ok(Path { cells }),
        None => {
            tracing::warn!("No path from {:?} to {:?}", start, goal);
            Err(MazeError::UnreachableExit {
                entry: start,
                exit: goal,
            })
        }
    }
}

/// Up to `count` distinct simple paths from `start` to `goal`, shortest first.
///
/// The first path is the one [`solve_bfs`] returns. Each further path is the
/// shortest detour found by leaving an earlier path at one of its cells
/// through a move no earlier path with the same prefix took, without
/// revisiting the prefix. Fewer paths come back when the maze has no more.
pub fn solve_bfs_paths(maze: &Maze, start: Coord, goal: Coord, count: usize) -> Result<Vec<Path>, MazeError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let mut paths = vec![solve_bfs(maze, start, goal)?];
    let mut candidates: Vec<Path> = Vec::new();

    while paths.len() < count {
        let Some(last) = paths.last().map(|p| p.cells.clone()) else {
            break;
        };
        for (i, &spur) in last.iter().enumerate().take(last.len().saturating_sub(1)) {
            let root = &last[..=i];
            let mut on_root = Grid::new(maze.width(), maze.height(), false);
            root[..i].iter().for_each(|&c| on_root[c] = true);
            let taken = paths
                .iter()
                .filter(|p| p.cells.len() > i + 1 && p.cells[..=i] == *root)
                .map(|p| p.cells[i + 1])
                .collect::<Vec<_>>();

            let detour = search(maze, spur, goal, |from, to| {
                !on_root[to] && !(from == spur && taken.contains(&to))
            });
            if let Some(tail) = detour {
                let mut cells = root[..i].to_vec();
                cells.extend(tail);
                let candidate = Path { cells };
                if !paths.contains(&candidate) && !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }

        // Shortest candidate, earliest found on ties
        let Some(next) = candidates
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.len())
            .map(|(idx, _)| idx)
        else {
            break;
        };
        paths.push(candidates.remove(next));
    }
    tracing::debug!("Found {} of {} requested paths", paths.len(), count);
    Ok(paths)
}
