//! Error types for the forage-core crate.

use forage_agents::AgentError;
use forage_types::TeamKind;
use forage_world::WorldError;

use crate::config::ConfigError;

/// Errors that can occur while building or advancing a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Configuration could not be loaded or is unusable.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Maze generation or grid access failed.
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// A robot or team operation failed.
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// The grid has no delivery point tagged for a team.
    #[error("no delivery point tagged for the {0} team")]
    MissingDeliveryPoint(TeamKind),
}
