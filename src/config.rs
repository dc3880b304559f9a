//! Loader for `KEY=VALUE` configuration files.
//!
//! ```text
//! # comment
//! WIDTH=20
//! HEIGHT=15
//! ENTRY=0,0
//! EXIT=19,14
//! OUTPUT_FILE=maze.txt
//! PERFECT=True
//! SEED=42
//! ALGO=PRIM
//! ```

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::generators::{Generator, MazeParams};
use crate::maze::{Coord, MAX_DIMENSION};

const REQUIRED_KEYS: [&str; 6] = ["WIDTH", "HEIGHT", "ENTRY", "EXIT", "OUTPUT_FILE", "PERFECT"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub width: u8,
    pub height: u8,
    pub entry: Coord,
    pub exit: Coord,
    pub output_file: String,
    pub perfect: bool,
    pub seed: Option<u64>,
    pub generator: Generator,
}

impl Config {
    /// Reads and parses a configuration file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let config = Config::parse(&content)?;
        tracing::info!("Loaded config from {}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let values = read_pairs(content)?;

        let mut missing = REQUIRED_KEYS
            .into_iter()
            .filter(|key| !values.contains_key(*key))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(ConfigError::MissingKeys(missing));
        }

        let width = parse_dimension("WIDTH", value_of(&values, "WIDTH"))?;
        let height = parse_dimension("HEIGHT", value_of(&values, "HEIGHT"))?;
        let entry = parse_coord("ENTRY", value_of(&values, "ENTRY"), width, height)?;
        let exit = parse_coord("EXIT", value_of(&values, "EXIT"), width, height)?;
        let output_file = parse_output_file(value_of(&values, "OUTPUT_FILE"))?;
        let perfect = parse_bool("PERFECT", value_of(&values, "PERFECT"))?;
        if entry == exit {
            return Err(ConfigError::EntryEqualsExit);
        }
        let seed = values
            .get("SEED")
            .map(|value| parse_seed(value))
            .transpose()?;
        let generator = values
            .get("ALGO")
            .map(|value| value.parse::<Generator>())
            .transpose()?
            .unwrap_or_default();

        Ok(Config {
            width,
            height,
            entry,
            exit,
            output_file,
            perfect,
            seed,
            generator,
        })
    }

    pub fn maze_params(&self) -> MazeParams {
        MazeParams {
            width: self.width,
            height: self.height,
            entry: self.entry,
            exit: self.exit,
            perfect: self.perfect,
            seed: self.seed,
            generator: self.generator,
        }
    }
}

/// Splits lines into trimmed key/value pairs. Keys are uppercased, blank lines
/// and `#` comments are skipped.
fn read_pairs(content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut values = HashMap::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or(ConfigError::InvalidSyntax { line: idx + 1 })?;
        values.insert(key.trim().to_ascii_uppercase(), value.trim().to_string());
    }
    Ok(values)
}

fn value_of<'a>(values: &'a HashMap<String, String>, key: &str) -> &'a str {
    values.get(key).map(String::as_str).unwrap_or_default()
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        reason: reason.into(),
    }
}

fn parse_dimension(key: &'static str, value: &str) -> Result<u8, ConfigError> {
    let n = value
        .parse::<i64>()
        .map_err(|_| invalid(key, "must be an integer"))?;
    if !(1..=MAX_DIMENSION as i64).contains(&n) {
        return Err(ConfigError::DimensionOutOfRange {
            name: key,
            value: n,
            max: MAX_DIMENSION,
        });
    }
    Ok(n as u8)
}

fn parse_coord(key: &'static str, value: &str, width: u8, height: u8) -> Result<Coord, ConfigError> {
    let (x, y) = value
        .split_once(',')
        .and_then(|(x, y)| Some((x.trim().parse::<i64>().ok()?, y.trim().parse::<i64>().ok()?)))
        .ok_or_else(|| invalid(key, "must be in format x,y"))?;
    if !(0..width as i64).contains(&x) || !(0..height as i64).contains(&y) {
        return Err(ConfigError::CoordOutOfBounds {
            name: key,
            coord: (x, y),
            width,
            height,
        });
    }
    Ok((x as u8, y as u8))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(key, "must be True or False")),
    }
}

fn parse_output_file(value: &str) -> Result<String, ConfigError> {
    if !value.ends_with(".txt") {
        return Err(invalid("OUTPUT_FILE", "must end with .txt"));
    }
    Ok(value.to_string())
}

fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(seed) if seed > 0 => Ok(seed),
        _ => Err(invalid("SEED", "must be a positive integer")),
    }
}
