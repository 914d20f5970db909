//! Error types for the forage-agents crate.
//!
//! Target reservation problems indicate broken team bookkeeping rather
//! than anything a caller could retry; they are surfaced as errors so the
//! simulation can stop cleanly instead of panicking.

use forage_types::{ItemId, RobotId};
use forage_world::WorldError;

/// Errors that can occur while a robot acts or a team updates knowledge.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An item is already reserved by a different teammate.
    #[error("{claimant} cannot reserve {item}: already held by {holder}")]
    ReservationConflict {
        /// The contested item.
        item: ItemId,
        /// The robot currently holding the reservation.
        holder: RobotId,
        /// The robot attempting to reserve it.
        claimant: RobotId,
    },

    /// A robot asked for a new target while still holding one.
    #[error("{robot} already holds a reservation on {held}")]
    DuplicateClaim {
        /// The claiming robot.
        robot: RobotId,
        /// The item it still holds.
        held: ItemId,
    },

    /// A team has no knowledge store for one of its robots.
    #[error("no knowledge store for {robot}")]
    MissingKnowledge {
        /// The robot left without one.
        robot: RobotId,
    },

    /// A grid or memory access failed.
    #[error("world error: {0}")]
    World(#[from] WorldError),
}
