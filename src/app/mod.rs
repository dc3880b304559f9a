mod renderer;
mod tile;

use std::{
    io::{Stdout, Write},
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::Renderer,
    config::Config,
    error::MazeError,
    generators::{Generation, MazeParams},
    maze::Maze,
    output::write_output,
    solvers::{Path, solve_paths},
};

/// How often to check for input while no animation is running
const IDLE_POLL_TIMEOUT: Duration = Duration::from_millis(250);
const MIN_FRAME_TIME: Duration = Duration::from_millis(1);
const MAX_FRAME_TIME: Duration = Duration::from_millis(500);

fn to_io(err: MazeError) -> std::io::Error {
    std::io::Error::other(err)
}

/// Interactive terminal viewer.
///
/// Everything runs on the calling thread: animation frames are produced by
/// pulling one step from a [`Generation`] each time input polling times out.
pub struct App {
    config: Config,
    /// Time between animation frames
    frame_time: Duration,
    maze: Maze,
    /// Shortest path first, plus a second one for imperfect mazes
    paths: Vec<Path>,
    show_path: bool,
    /// Generation being played back, if any
    animation: Option<Generation>,
    /// Result of the last output file write
    last_save: Option<String>,
}

impl App {
    /// Generates the first maze with the configured seed.
    pub fn new(config: Config) -> Result<Self, MazeError> {
        let maze = Generation::new(&config.maze_params())?.finish();
        let paths = App::solve(&maze)?;
        let mut app = App {
            config,
            frame_time: Duration::from_millis(20),
            maze,
            paths,
            show_path: false,
            animation: None,
            last_save: None,
        };
        app.save();
        Ok(app)
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// One path for a perfect maze, up to two otherwise.
    fn solve(maze: &Maze) -> Result<Vec<Path>, MazeError> {
        solve_paths(maze, if maze.perfect { 1 } else { 2 })
    }

    fn shortest_path(&self) -> Option<&Path> {
        self.paths.first()
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Fresh parameters for a regeneration: same config, new seed.
    fn next_params(&self) -> MazeParams {
        MazeParams {
            seed: None,
            ..self.config.maze_params()
        }
    }

    fn status(&self) -> String {
        let maze = self.current_maze();
        let mut status = format!(
            "{}x{} {} {} seed {}",
            maze.width(),
            maze.height(),
            if maze.perfect { "Perfect" } else { "Not-perfect" },
            maze.generator.name(),
            maze.seed
        );
        match &self.animation {
            Some(generation) => status.push_str(&format!(" | animating, {} walls opened", generation.steps())),
            None => {
                let steps = self.paths.iter().map(|p| p.steps().to_string()).collect::<Vec<_>>();
                status.push_str(&format!(" | path {} steps", steps.join("/")));
            }
        }
        if let Some(save) = &self.last_save {
            status.push_str(" | ");
            status.push_str(save);
        }
        status.push_str(" | 1 new  2 path  3 colour  4 animate  +/- speed  Esc quit");
        status
    }

    fn current_maze(&self) -> &Maze {
        self.animation.as_ref().map(Generation::maze).unwrap_or(&self.maze)
    }

    fn redraw(&self, renderer: &mut Renderer) -> std::io::Result<()> {
        let paths = if self.show_path && self.animation.is_none() {
            self.paths.as_slice()
        } else {
            &[]
        };
        renderer.draw(self.current_maze(), paths, &self.status())
    }

    /// Writes the current maze and its solution to the configured output file.
    fn save(&mut self) {
        let Some(path) = self.shortest_path() else {
            return;
        };
        let result = write_output(&self.config.output_file, &self.maze, path);
        self.last_save = Some(match result {
            Ok(()) => format!("saved to {}", self.config.output_file),
            Err(e) => {
                tracing::error!("Failed to write {}: {}", self.config.output_file, e);
                format!("save failed: {}", e)
            }
        });
    }

    /// Replaces the displayed maze with a finished one.
    fn complete(&mut self, maze: Maze) -> std::io::Result<()> {
        self.paths = App::solve(&maze).map_err(to_io)?;
        self.maze = maze;
        self.save();
        Ok(())
    }

    fn regenerate(&mut self, animate: bool) -> std::io::Result<()> {
        self.show_path = false;
        let generation = Generation::new(&self.next_params()).map_err(to_io)?;
        if animate {
            tracing::debug!("Starting animated generation with seed {}", generation.seed());
            self.animation = Some(generation);
            Ok(())
        } else {
            self.animation = None;
            self.complete(generation.finish())
        }
    }

    /// Pull one step of the running animation, if any.
    fn advance_animation(&mut self, renderer: &mut Renderer) -> std::io::Result<()> {
        let Some(generation) = self.animation.as_mut() else {
            return Ok(());
        };
        match generation.next() {
            Some(event) => renderer.draw_event(generation.maze(), &event),
            None => {
                if let Some(generation) = self.animation.take() {
                    self.complete(generation.finish())?;
                }
                self.redraw(renderer)
            }
        }
    }

    /// Main application loop. Returns when the user presses Esc or `q`.
    pub fn run(&mut self) -> std::io::Result<()> {
        let mut renderer = Renderer::new();
        self.redraw(&mut renderer)?;
        tracing::info!("Started main app loop");

        loop {
            let timeout = if self.animation.is_some() {
                self.frame_time
            } else {
                IDLE_POLL_TIMEOUT
            };
            if event::poll(timeout)? {
                match event::read()? {
                    event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                        match key_event.code {
                            KeyCode::Esc | KeyCode::Char('q') => {
                                tracing::debug!("[app loop] exit requested");
                                break;
                            }
                            KeyCode::Char('1') => {
                                self.regenerate(false)?;
                                self.redraw(&mut renderer)?;
                            }
                            KeyCode::Char('2') if self.animation.is_none() => {
                                self.show_path = !self.show_path;
                                self.redraw(&mut renderer)?;
                            }
                            KeyCode::Char('3') => {
                                renderer.rotate_wall_color();
                                self.redraw(&mut renderer)?;
                            }
                            KeyCode::Char('4') => {
                                self.regenerate(true)?;
                                self.redraw(&mut renderer)?;
                            }
                            KeyCode::Char('+') | KeyCode::Up => {
                                self.frame_time = (self.frame_time / 2).max(MIN_FRAME_TIME);
                            }
                            KeyCode::Char('-') | KeyCode::Down => {
                                self.frame_time = (self.frame_time * 2).min(MAX_FRAME_TIME);
                            }
                            _ => {} // Ignore other keys
                        }
                    }
                    event::Event::Resize(_, _) => self.redraw(&mut renderer)?,
                    _ => {}
                }
            }
            self.advance_animation(&mut renderer)?;
        }
        tracing::info!("Exiting main app loop");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Generator;

    fn config(output_file: String) -> Config {
        Config {
            width: 10,
            height: 8,
            entry: (0, 0),
            exit: (9, 7),
            output_file,
            perfect: false,
            seed: Some(5),
            generator: Generator::Prim,
        }
    }

    fn temp_output(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("mazegen-{}-{}.txt", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_new_app_saves_first_maze() {
        let output = temp_output("app");
        let app = App::new(config(output.clone())).unwrap();
        assert_eq!(app.maze().seed, 5);
        assert!(app.status().contains("Not-perfect PRIM seed 5"));
        let content = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&output).ok();
        let file = crate::output::parse_output(&content).unwrap();
        assert_eq!(&file.maze, app.maze());
        assert_eq!(Some(&file.path), app.shortest_path());
    }

    #[test]
    fn test_imperfect_maze_gets_two_routes() {
        let output = temp_output("routes");
        let mut perfect = config(output.clone());
        perfect.perfect = true;
        let app = App::new(perfect).unwrap();
        assert_eq!(app.paths.len(), 1);

        // Imperfect 10x8 PRIM maze with seed 5 opens loops; the viewer asks for two routes
        let app = App::new(config(output.clone())).unwrap();
        std::fs::remove_file(&output).ok();
        assert!(!app.paths.is_empty() && app.paths.len() <= 2);
        assert_eq!(app.paths, solve_paths(app.maze(), 2).unwrap());
    }

    #[test]
    fn test_regeneration_draws_a_new_seed() {
        let output = temp_output("regen");
        let app = App::new(config(output.clone())).unwrap();
        std::fs::remove_file(&output).ok();
        assert_eq!(app.next_params().seed, None);
        assert_eq!(app.next_params().generator, Generator::Prim);
    }
}
