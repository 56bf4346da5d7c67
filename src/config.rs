use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for a pathfinding sandbox: grid dimensions, animation speed and maze seed.
/// Every field is optional in TOML; missing ones take the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_cols")]
    pub cols: usize,
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Number of search steps performed per animation frame.
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: usize,
    /// Seed for maze generation. A random seed is drawn when absent.
    #[serde(default)]
    pub maze_seed: Option<u64>,
}

fn default_cols() -> usize {
    50
}

fn default_rows() -> usize {
    25
}

fn default_steps_per_tick() -> usize {
    20
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cols: default_cols(),
            rows: default_rows(),
            steps_per_tick: default_steps_per_tick(),
            maze_seed: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Config::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("cols", self.cols),
            ("rows", self.rows),
            ("steps_per_tick", self.steps_per_tick),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { field });
            }
        }
        Ok(())
    }
}
