use std::process::ExitCode;

use mazegen::{app::App, config::Config, generate_maze, output::write_output, solve_maze};
use tracing::Level;

const LOG_FILE: &str = "mazegen.log";
const USAGE: &str = "Usage: mazegen <config_file> [--headless]";

/// Log level from `MAZEGEN_LOG`, `info` when unset or unparsable.
fn log_level() -> Level {
    std::env::var("MAZEGEN_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(Level::INFO)
}

/// Generate, solve and save without opening the terminal viewer.
fn run_headless(config: &Config) -> Result<(), String> {
    let maze = generate_maze(&config.maze_params()).map_err(|e| e.to_string())?;
    let path = solve_maze(&maze).map_err(|e| e.to_string())?;
    write_output(&config.output_file, &maze, &path)
        .map_err(|e| format!("Failed to write {}: {}", config.output_file, e))?;
    println!(
        "{}x{} {} maze, {}, seed {}: path of {} steps written to {}",
        maze.width(),
        maze.height(),
        if maze.perfect { "perfect" } else { "imperfect" },
        maze.generator,
        maze.seed,
        path.steps(),
        config.output_file
    );
    Ok(())
}

fn run_interactive(config: Config) -> Result<(), String> {
    let mut app = App::new(config).map_err(|e| e.to_string())?;
    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout).map_err(|e| e.to_string())?;
    let result = app.run();
    App::restore_terminal(&mut stdout).map_err(|e| e.to_string())?;
    result.map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1); // Skip executable name
    let (Some(config_path), flag) = (args.next(), args.next()) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };
    let headless = match flag.as_deref() {
        None => false,
        Some("--headless") => true,
        Some(other) => {
            eprintln!("Unknown argument: {}\n{}", other, USAGE);
            return ExitCode::FAILURE;
        }
    };

    let (writer, _guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(".", LOG_FILE));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(log_level())
        .init();

    let result = Config::load(&config_path)
        .map_err(|e| format!("Invalid configuration: {}", e))
        .and_then(|config| {
            if headless {
                run_headless(&config)
            } else {
                run_interactive(config)
            }
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{}", message);
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}
