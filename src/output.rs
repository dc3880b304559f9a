//! Output file: the hex wall rows, a blank line, the entry, the exit and the
//! solution as `N`/`S`/`E`/`W` moves.

use std::io::Write;

use crate::error::{EncodingError, MazeError};
use crate::maze::{Coord, Direction, Maze};
use crate::solvers::Path;

/// Contents of an output file read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeFile {
    pub maze: Maze,
    pub path: Path,
}

/// Renders the output file contents.
pub fn format_output(maze: &Maze, path: &Path) -> String {
    let mut out = maze.encode_rows().join("\n");
    let (entry, exit) = (maze.entry(), maze.exit());
    out.push_str(&format!(
        "\n\n{},{}\n{},{}\n{}\n",
        entry.0, entry.1, exit.0, exit.1, path
    ));
    out
}

pub fn write_output(file_path: &str, maze: &Maze, path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::create(file_path)?;
    file.write_all(format_output(maze, path).as_bytes())?;
    file.flush()?;
    tracing::info!("Wrote maze and solution to {}", file_path);
    Ok(())
}

fn malformed(reason: impl Into<String>) -> MazeError {
    EncodingError::Malformed(reason.into()).into()
}

fn parse_coord(line: Option<&str>, name: &str) -> Result<Coord, MazeError> {
    line.and_then(|line| {
        let (x, y) = line.trim().split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    })
    .ok_or_else(|| malformed(format!("missing or invalid {} line", name)))
}

/// Parses an output file, checking that the stored path walks from the entry
/// to the exit through open walls.
pub fn parse_output(content: &str) -> Result<MazeFile, MazeError> {
    let (grid, rest) = content
        .split_once("\n\n")
        .ok_or_else(|| malformed("missing blank line after the wall rows"))?;
    let rows = grid.lines().map(str::trim).collect::<Vec<_>>();
    let height = u8::try_from(rows.len()).map_err(|_| malformed("too many rows"))?;
    let width = rows
        .first()
        .map(|row| row.chars().count())
        .and_then(|w| u8::try_from(w).ok())
        .ok_or_else(|| malformed("invalid first row"))?;
    if rows.iter().any(|row| row.chars().count() != width as usize) {
        return Err(malformed("rows have different lengths"));
    }

    let mut lines = rest.lines();
    let entry = parse_coord(lines.next(), "entry")?;
    let exit = parse_coord(lines.next(), "exit")?;
    let maze = Maze::decode(width, height, entry, exit, &rows.concat())?;

    let moves = lines
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| Direction::from_letter(c).ok_or_else(|| malformed(format!("invalid move {:?}", c))))
        .collect::<Result<Vec<_>, _>>()?;
    let path = Path::walk(&maze, entry, &moves)
        .filter(|p| p.end() == Some(exit))
        .ok_or_else(|| malformed("path does not lead from entry to exit"))?;

    Ok(MazeFile { maze, path })
}
