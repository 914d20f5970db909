//! Configuration loading and typed config structures for the Forage simulation.
//!
//! The canonical configuration lives in `forage-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and a loader that reads the file, applies environment
//! overrides, and checks the values that would make generation impossible.

use std::path::Path;

use forage_agents::BehaviorConfig;
use forage_world::MazeSpec;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Values parsed but cannot produce a simulation.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `forage-config.yaml`. Every field has a
/// default, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Maze size and contents.
    #[serde(default)]
    pub maze: MazeConfig,

    /// World-level settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Batch run settings.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Per-team utility weights.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FORAGE_SEED` overrides `world.seed`
    /// - `FORAGE_RUNS` overrides `batch.runs`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `FORAGE_SEED` and `FORAGE_RUNS` if set and well-formed.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = env_override("FORAGE_SEED") {
            self.world.seed = seed;
        }
        if let Some(runs) = env_override("FORAGE_RUNS") {
            self.batch.runs = runs;
        }
    }

    /// Check the static preconditions for generating a maze.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero or oversized dimensions, a
    /// density outside `[1, 2]`, more objects than cells, or a zero turn
    /// limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.maze
            .to_spec()
            .validate()
            .map_err(|err| ConfigError::Invalid {
                reason: err.to_string(),
            })?;
        if self.batch.max_turns == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("batch.max_turns must be positive"),
            });
        }
        Ok(())
    }
}

/// Read and parse an environment override, warning on malformed values.
fn env_override<T: core::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(key, value = %raw, "ignoring malformed environment override");
    }
    parsed
}

/// Maze size and contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Number of columns (default: 20).
    #[serde(default = "default_dimension")]
    pub width: u32,

    /// Number of rows (default: 20).
    #[serde(default = "default_dimension")]
    pub height: u32,

    /// Items to scatter (default: 10).
    #[serde(default = "default_item_count")]
    pub item_count: u32,

    /// Robots per team (default: 2).
    #[serde(default = "default_robots_per_team")]
    pub robots_per_team: u32,

    /// Density coefficient in `[1, 2]` (default: 1.3).
    #[serde(default = "default_density")]
    pub density: Decimal,
}

impl MazeConfig {
    /// The generator parameters described by this section.
    pub const fn to_spec(&self) -> MazeSpec {
        MazeSpec {
            width: self.width,
            height: self.height,
            item_count: self.item_count,
            robots_per_team: self.robots_per_team,
            density: self.density,
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            item_count: default_item_count(),
            robots_per_team: default_robots_per_team(),
            density: default_density(),
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility (default: 42).
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Batch run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Simulations to run; `0` runs a single simulation instead
    /// (default: 0).
    #[serde(default)]
    pub runs: u32,

    /// Turns after which a run stops even if items remain
    /// (default: 10000).
    #[serde(default = "default_max_turns")]
    pub max_turns: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: 0,
            max_turns: default_max_turns(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_dimension() -> u32 {
    20
}

const fn default_item_count() -> u32 {
    10
}

const fn default_robots_per_team() -> u32 {
    2
}

const fn default_density() -> Decimal {
    Decimal::from_parts(13, 0, 0, false, 1)
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_turns() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
