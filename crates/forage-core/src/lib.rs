//! Configuration, team coordination, simulation state, and batch runs for
//! the Forage simulation.
//!
//! This crate drives whole games. It generates a maze from configuration,
//! forms the two teams, advances them turn by turn, and aggregates many
//! seeded games into win statistics.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration ([`SimulationConfig`])
//! - [`error`] -- Error types ([`SimulationError`])
//! - [`runner`] -- Run-to-completion and batch statistics ([`run_batch`])
//! - [`simulation`] -- Game state: grid plus both teams ([`SimulationState`])
//! - [`team`] -- Per-team turn sequencing and score ([`Team`])

pub mod config;
pub mod error;
pub mod runner;
pub mod simulation;
pub mod team;

pub use config::{ConfigError, SimulationConfig};
pub use error::SimulationError;
pub use runner::{BatchSummary, EndReason, SimulationResult, run_batch, run_to_completion};
pub use simulation::{Observer, SimulationState, TurnSummary};
pub use team::{Team, TeamTurn};
