//! Robot perception, team knowledge, and utility-based decisions for the
//! Forage simulation.
//!
//! This crate holds the logic layer for robots -- everything a robot does
//! between reading the grid and reporting what happened. It sits between
//! `forage-world` (grid, memory, path estimation) and `forage-core`, which
//! sequences whole teams through turns.
//!
//! # Modules
//!
//! - [`config`] -- Per-team utility weights ([`UtilityWeights`], [`BehaviorConfig`])
//! - [`decision`] -- Utility scoring and move selection ([`decide_action`])
//! - [`error`] -- Error types for robot and knowledge operations ([`AgentError`])
//! - [`knowledge`] -- Memory plus discovered-item pools, shared or private ([`TeamKnowledge`])
//! - [`perception`] -- Vision window, memory updates, discovery gain, congestion
//! - [`robot`] -- Robot state and the per-turn move/pickup/deliver sequence ([`Robot`])

pub mod config;
pub mod decision;
pub mod error;
pub mod knowledge;
pub mod perception;
pub mod robot;

// Re-export primary types at crate root for convenience.
pub use config::{BehaviorConfig, UtilityWeights};
pub use decision::{DecisionContext, decide_action, utility};
pub use error::AgentError;
pub use knowledge::{PrivateKnowledge, SharedKnowledge, TeamKnowledge};
pub use perception::{VISION_RADIUS, VisionWindow, congestion, discovery_gain, observe, vision};
pub use robot::{Robot, TurnContext, TurnOutcome};
