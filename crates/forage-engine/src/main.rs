//! Engine binary for the Forage simulation.
//!
//! Loads configuration, installs logging, and then either plays a single
//! game to the end or, when `batch.runs` is positive, plays a seeded batch
//! and prints the win statistics as JSON on stdout.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `forage-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Validate configuration
//! 4. Run a single game or a batch
//! 5. Log or print the result

mod error;

use std::path::Path;

use forage_core::{SimulationConfig, SimulationState, run_batch, run_to_completion};
use forage_types::TeamKind;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "forage-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is unusable or a run fails.
fn main() -> Result<(), EngineError> {
    let (config, from_file) = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("forage-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    config.validate()?;
    info!(
        width = config.maze.width,
        height = config.maze.height,
        items = config.maze.item_count,
        robots_per_team = config.maze.robots_per_team,
        density = %config.maze.density,
        seed = config.world.seed,
        runs = config.batch.runs,
        "Configuration loaded"
    );

    if config.batch.runs > 0 {
        let summary = run_batch(&config, config.batch.runs)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut state = SimulationState::generate(&config)?;
    let result = run_to_completion(&mut state, config.batch.max_turns)?;
    info!(
        turns = result.turns,
        cooperative = state.score(TeamKind::Cooperative),
        self_interested = state.score(TeamKind::SelfInterested),
        end_reason = ?result.end_reason,
        winner = result.winner().map_or("draw", TeamKind::as_str),
        "Simulation finished"
    );
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], or defaults if it is absent.
///
/// Returns whether the file was found alongside the configuration.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((SimulationConfig::from_file(config_path)?, true))
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}
