use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    app::tile::Tile,
    generators::GridEvent,
    maze::{Coord, Direction, Maze, grid::Grid},
    solvers::Path,
};

/// Wall colours cycled through by the viewer.
const WALL_COLORS: [Color; 3] = [Color::White, Color::Cyan, Color::Yellow];

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    wall_color_idx: usize,
}

impl Renderer {
    /// Rows reserved below the maze for the status line.
    pub const NUM_STATUS_ROWS: u16 = 1;

    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            wall_color_idx: 0,
        }
    }

    pub fn rotate_wall_color(&mut self) {
        self.wall_color_idx = (self.wall_color_idx + 1) % WALL_COLORS.len();
    }

    fn wall_color(&self) -> Color {
        WALL_COLORS[self.wall_color_idx]
    }

    /// Terminal size in tiles needed to show the whole maze plus the status line.
    fn required_size(maze: &Maze) -> (u16, u16) {
        (
            (maze.width() as u16 * 2 + 1) * Tile::WIDTH,
            maze.height() as u16 * 2 + 1 + Renderer::NUM_STATUS_ROWS,
        )
    }

    /// Check if terminal size is sufficient for the given maze.
    /// If not, display a message and return Ok(false).
    fn check_size(&mut self, maze: &Maze) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let (width, height) = Renderer::required_size(maze);
        if term_width < width || term_height < height {
            let msg = format!(
                "Terminal size is too small ({}x{}) for the {}x{} maze, which needs {}x{}. Please resize the terminal.\r\n",
                term_width,
                term_height,
                maze.width(),
                maze.height(),
                width,
                height
            );
            queue!(
                self.stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
                style::PrintStyledContent(
                    "Press Esc to exit...\r\n"
                        .with(Color::Blue)
                        .attribute(Attribute::Bold)
                )
            )?;
            self.stdout.flush()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Tile coordinate of a cell.
    fn cell_tile(coord: Coord) -> Coord {
        (coord.0 * 2 + 1, coord.1 * 2 + 1)
    }

    /// Tile coordinate of the wall segment between two adjacent cell tiles.
    fn between_tile(a: Coord, b: Coord) -> Coord {
        let mid = |p: u8, q: u8| ((p as u16 + q as u16) / 2) as u8;
        (mid(a.0, b.0), mid(a.1, b.1))
    }

    /// Tile shown at tile coordinate `(tx, ty)`. `routes` holds the path tiles
    /// in tile coordinates and only replaces open tiles.
    fn tile_at(maze: &Maze, routes: Option<&Grid<Option<Tile>>>, tx: u16, ty: u16) -> Tile {
        let base = Renderer::layout_tile(maze, tx, ty);
        match routes.and_then(|r| r.get((tx as u8, ty as u8)).copied().flatten()) {
            Some(route) if base == Tile::Open => route,
            _ => base,
        }
    }

    fn layout_tile(maze: &Maze, tx: u16, ty: u16) -> Tile {
        let cell = |t: u16| ((t - 1) / 2) as u8;
        let passage = |from: Coord, direction: Direction| {
            if maze.has_wall(from, direction) {
                Tile::Wall
            } else {
                Tile::Open
            }
        };
        match (tx % 2 == 1, ty % 2 == 1) {
            // Cell
            (true, true) => {
                let coord = (cell(tx), cell(ty));
                if coord == maze.entry() {
                    Tile::Entry
                } else if coord == maze.exit() {
                    Tile::Exit
                } else if maze.is_blocked(coord) {
                    Tile::Pattern
                } else {
                    Tile::Open
                }
            }
            // Wall segment between two cells, east of (x, y)
            (false, true) if tx > 0 && tx < maze.width() as u16 * 2 => {
                passage((cell(tx - 1), cell(ty)), Direction::East)
            }
            // Wall segment between two cells, south of (x, y)
            (true, false) if ty > 0 && ty < maze.height() as u16 * 2 => {
                passage((cell(tx), cell(ty - 1)), Direction::South)
            }
            // Corners and the outer boundary
            _ => Tile::Wall,
        }
    }

    /// Marks the cells and passages of each path with its route tile.
    fn route_tiles(maze: &Maze, paths: &[Path]) -> Option<Grid<Option<Tile>>> {
        if paths.is_empty() {
            return None;
        }
        let mut tiles = Grid::new(maze.width() * 2 + 1, maze.height() * 2 + 1, None);
        // Later paths first so the shortest one stays on top where they share tiles
        for (path, route) in paths.iter().zip(Tile::ROUTES).rev() {
            for pair in path.cells().windows(2) {
                let (a, b) = (Renderer::cell_tile(pair[0]), Renderer::cell_tile(pair[1]));
                for tile in [a, Renderer::between_tile(a, b), b] {
                    tiles[tile] = Some(route);
                }
            }
        }
        Some(tiles)
    }

    /// Redraw the whole maze and the status line.
    pub fn draw(&mut self, maze: &Maze, paths: &[Path], status: &str) -> std::io::Result<()> {
        if !self.check_size(maze)? {
            return Ok(());
        }
        let routes = Renderer::route_tiles(maze, paths);
        let wall_color = self.wall_color();
        let (tiles_x, tiles_y) = (maze.width() as u16 * 2 + 1, maze.height() as u16 * 2 + 1);

        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let tile = Renderer::tile_at(maze, routes.as_ref(), tx, ty);
                self.stdout.queue(style::PrintStyledContent(tile.styled(wall_color)))?;
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }
        self.draw_status(maze, status)?;
        self.stdout.flush()
    }

    /// Redraw only the tiles touched by one generation step.
    pub fn draw_event(&mut self, maze: &Maze, event: &GridEvent) -> std::io::Result<()> {
        let (term_width, term_height) = terminal::size()?;
        let (width, height) = Renderer::required_size(maze);
        if term_width < width || term_height < height {
            return Ok(());
        }
        let wall_color = self.wall_color();
        let (a, b) = (Renderer::cell_tile(event.from), Renderer::cell_tile(event.to));
        for (tx, ty) in [a, Renderer::between_tile(a, b), b].map(|(x, y)| (x as u16, y as u16)) {
            let tile = Renderer::tile_at(maze, None, tx, ty);
            queue!(
                self.stdout,
                cursor::MoveTo(tx * Tile::WIDTH, ty),
                style::PrintStyledContent(tile.styled(wall_color))
            )?;
        }
        self.stdout.flush()
    }

    /// Status line below the maze, truncated to the terminal width.
    pub fn draw_status(&mut self, maze: &Maze, status: &str) -> std::io::Result<()> {
        let (term_width, _) = terminal::size()?;
        let (truncated, _) = status.unicode_truncate(term_width as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(0, maze.height() as u16 * 2 + 1),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(truncated.with(Color::Cyan).attribute(Attribute::Bold))
        )?;
        self.stdout.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
