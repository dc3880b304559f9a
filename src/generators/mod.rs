use rand::{Rng, SeedableRng, rngs::StdRng};

mod dfs;
mod loops;
mod prim;

use dfs::DfsState;
use loops::LoopState;
use prim::PrimState;

use crate::error::{ConfigError, MazeError};
use crate::maze::{Coord, Direction, Maze};

/// Resolves the seed, drawing one from the OS-seeded thread RNG when none is given.
/// The resolved value is stored on the maze so any run can be replayed.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random())
}

/// Get a random number generator seeded for reproducibility.
fn get_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Maze generation algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    /// Randomized depth-first backtracking
    #[default]
    Dfs,
    /// Randomized Prim frontier expansion
    Prim,
}

impl Generator {
    /// Name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Dfs => "DFS",
            Generator::Prim => "PRIM",
        }
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Dfs => write!(f, "Randomized Depth-First Search (DFS)"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
        }
    }
}

impl std::str::FromStr for Generator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DFS" => Ok(Generator::Dfs),
            "PRIM" => Ok(Generator::Prim),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Validated inputs of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeParams {
    pub width: u8,
    pub height: u8,
    pub entry: Coord,
    pub exit: Coord,
    /// Skip the loop-adding pass so the maze stays a spanning tree
    pub perfect: bool,
    /// Fixed seed, or `None` to draw a fresh one
    pub seed: Option<u64>,
    pub generator: Generator,
}

impl MazeParams {
    /// Perfect DFS maze with a fresh seed.
    pub fn new(width: u8, height: u8, entry: Coord, exit: Coord) -> Self {
        MazeParams {
            width,
            height,
            entry,
            exit,
            perfect: true,
            seed: None,
            generator: Generator::default(),
        }
    }
}

/// One wall opening, reported to animation consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEvent {
    pub from: Coord,
    pub direction: Direction,
    pub to: Coord,
}

enum Phase {
    Dfs(DfsState),
    Prim(PrimState),
    /// Extra openings for imperfect mazes
    Loops(LoopState),
    Done,
}

/// A generation run that can be driven one wall at a time.
///
/// Every call to [`Iterator::next`] opens exactly one wall and returns what was
/// opened; [`Generation::maze`] shows the state in between. The sequence is
/// finite and cannot be restarted: build a new `Generation` to replay it.
pub struct Generation {
    maze: Maze,
    rng: StdRng,
    phase: Phase,
    perfect: bool,
    /// Cells Prim had to attach without a connector
    anomalies: Vec<Coord>,
    steps: usize,
}

impl Generation {
    /// Validates the parameters, applies the overlay and prepares the selected algorithm.
    pub fn new(params: &MazeParams) -> Result<Self, MazeError> {
        let mut maze = Maze::new(params.width, params.height, params.entry, params.exit)?;
        let seed = resolve_seed(params.seed);
        maze.seed = seed;
        maze.generator = params.generator;
        maze.perfect = params.perfect;

        let phase = match params.generator {
            Generator::Dfs => Phase::Dfs(DfsState::new(&mut maze)),
            Generator::Prim => Phase::Prim(PrimState::new(&mut maze)),
        };
        tracing::debug!(
            "Starting {} on a {}x{} maze with seed {}",
            params.generator.name(),
            params.width,
            params.height,
            seed
        );

        Ok(Generation {
            maze,
            rng: get_rng(seed),
            phase,
            perfect: params.perfect,
            anomalies: Vec::new(),
            steps: 0,
        })
    }

    /// Read-only view of the maze as built so far.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn seed(&self) -> u64 {
        self.maze.seed
    }

    /// Frontier cells that were attached to the visited region without an opening.
    pub fn anomalies(&self) -> &[Coord] {
        &self.anomalies
    }

    /// Number of walls opened so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    /// Runs the remaining steps and returns the finished maze.
    pub fn finish(mut self) -> Maze {
        self.by_ref().for_each(drop);
        self.maze
    }

    fn advance_phase(&mut self) {
        self.phase = match self.phase {
            Phase::Dfs(_) | Phase::Prim(_) if !self.perfect => {
                tracing::debug!("Spanning tree done after {} openings, adding loops", self.steps);
                Phase::Loops(LoopState::new(&self.maze, &mut self.rng))
            }
            _ => {
                self.log_summary();
                Phase::Done
            }
        };
    }

    fn log_summary(&self) {
        let reachable = self.maze.reachable_cell_count();
        let connected = self.maze.connected_cell_count();
        if connected != reachable {
            tracing::warn!(
                "Only {} of {} cells are connected to the entry",
                connected,
                reachable
            );
        }
        tracing::info!(
            "Generated {}x{} {} maze with {} (seed {}): {} open walls",
            self.maze.width(),
            self.maze.height(),
            if self.perfect { "perfect" } else { "imperfect" },
            self.maze.generator.name(),
            self.maze.seed,
            self.maze.open_wall_count()
        );
    }
}

impl Iterator for Generation {
    type Item = GridEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let opened = match &mut self.phase {
                Phase::Dfs(state) => state.step(&mut self.maze, &mut self.rng),
                Phase::Prim(state) => state.step(&mut self.maze, &mut self.rng, &mut self.anomalies),
                Phase::Loops(state) => state.step(&mut self.maze),
                Phase::Done => return None,
            };
            match opened {
                Some(event) => {
                    self.steps += 1;
                    return Some(event);
                }
                None => self.advance_phase(),
            }
        }
    }
}

/// Generates a complete maze.
pub fn generate_maze(params: &MazeParams) -> Result<Maze, MazeError> {
    Ok(Generation::new(params)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(generator: Generator, perfect: bool) -> MazeParams {
        MazeParams {
            width: 12,
            height: 9,
            entry: (0, 0),
            exit: (11, 8),
            perfect,
            seed: Some(42),
            generator,
        }
    }

    #[test]
    fn test_generator_from_str() {
        assert_eq!("DFS".parse::<Generator>(), Ok(Generator::Dfs));
        assert_eq!("prim".parse::<Generator>(), Ok(Generator::Prim));
        assert_eq!(
            "KRUSKAL".parse::<Generator>(),
            Err(ConfigError::UnknownAlgorithm("KRUSKAL".to_string()))
        );
    }

    #[test]
    fn test_seed_is_captured() {
        let mut p = params(Generator::Dfs, true);
        p.seed = None;
        let generation = Generation::new(&p).unwrap();
        let seed = generation.seed();
        let first = generation.finish();
        assert_eq!(first.seed, seed);

        p.seed = Some(seed);
        let replay = generate_maze(&p).unwrap();
        assert_eq!(first.encode(), replay.encode());
    }

    #[test]
    fn test_one_event_per_wall() {
        for generator in [Generator::Dfs, Generator::Prim] {
            let mut generation = Generation::new(&params(generator, true)).unwrap();
            let mut count = 0;
            while let Some(event) = generation.next() {
                count += 1;
                // The snapshot already reflects the opened wall
                assert!(generation.maze().can_move(event.from, event.direction));
                assert_eq!(generation.maze().open_wall_count(), count);
            }
            assert!(generation.is_done());
            assert_eq!(generation.next(), None);
            assert_eq!(count, generation.maze().reachable_cell_count() - 1);
        }
    }

    #[test]
    fn test_animation_matches_direct_generation() {
        for perfect in [true, false] {
            let p = params(Generator::Prim, perfect);
            let mut generation = Generation::new(&p).unwrap();
            let events = generation.by_ref().collect::<Vec<_>>();
            assert_eq!(events.len(), generation.steps());
            assert_eq!(generation.finish(), generate_maze(&p).unwrap());
        }
    }

    #[test]
    fn test_invalid_params() {
        let mut p = params(Generator::Dfs, true);
        p.exit = p.entry;
        assert!(matches!(
            Generation::new(&p),
            Err(MazeError::Config(ConfigError::EntryEqualsExit))
        ));
    }
}
