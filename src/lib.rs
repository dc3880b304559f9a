pub mod app;
pub mod config;
pub mod error;
pub mod generators;
pub mod maze;
pub mod output;
pub mod solvers;

pub use error::{MazeError, Result};
pub use generators::{Generation, Generator, MazeParams, generate_maze};
pub use maze::Maze;
pub use solvers::{Path, solve_maze, solve_paths};
