//! Configuration file loading and command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use dark_maze_core::tuning::Config;

/// Field overrides collected from command-line flags.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) god_mode_floor: Option<f32>,
}

/// Reads the optional TOML file at `path`; missing sections keep their defaults.
pub(crate) fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
}

pub(crate) fn parse(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

pub(crate) fn apply_overrides(mut config: Config, overrides: Overrides) -> Config {
    if let Some(width) = overrides.width {
        config.maze.width = width;
    }
    if let Some(height) = overrides.height {
        config.maze.height = height;
    }
    if let Some(floor) = overrides.god_mode_floor {
        config.god_mode_floor = floor;
    }
    config
}
