//! Error types shared by the maze model, the generators, the solver and the
//! configuration loader.

use thiserror::Error;

use crate::maze::{Coord, Direction};

/// Result type for maze operations
pub type Result<T> = std::result::Result<T, MazeError>;

/// Top-level error returned by the public API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// Invalid dimensions, coordinates, algorithm name or configuration file content
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A wall mutation broke a structural rule. Generators handle these internally.
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// The solver could not reach the exit. Indicates a broken generator invariant.
    #[error("exit {exit:?} is unreachable from entry {entry:?}")]
    UnreachableExit { entry: Coord, exit: Coord },

    /// Malformed wall encoding
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be between 1 and {max}, got {value}")]
    DimensionOutOfRange {
        name: &'static str,
        value: i64,
        max: u8,
    },

    #[error("{name} {coord:?} is outside the {width}x{height} maze")]
    CoordOutOfBounds {
        name: &'static str,
        coord: (i64, i64),
        width: u8,
        height: u8,
    },

    #[error("entry and exit must be different")]
    EntryEqualsExit,

    #[error("unknown algorithm '{0}', expected DFS or PRIM")]
    UnknownAlgorithm(String),

    #[error("invalid syntax at line {line}: expected KEY=VALUE")]
    InvalidSyntax { line: usize },

    #[error("missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),

    #[error("{key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstraintViolation {
    #[error("wall {direction} of cell {coord:?} belongs to the overlay")]
    ImmutableWall { coord: Coord, direction: Direction },

    #[error("opening wall {direction} of cell {coord:?} would create a 2x2 open room")]
    OpenRoom { coord: Coord, direction: Direction },

    #[error("cell {coord:?} has no neighbor to the {direction}")]
    NoNeighbor { coord: Coord, direction: Direction },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("expected {expected} hex digits, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("invalid hex digit {ch:?} at position {index}")]
    InvalidDigit { index: usize, ch: char },

    #[error("walls of cells {a:?} and {b:?} disagree")]
    AsymmetricWall { a: Coord, b: Coord },

    #[error("malformed output file: {0}")]
    Malformed(String),
}
