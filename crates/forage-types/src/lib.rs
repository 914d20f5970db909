//! Shared type definitions for the Forage simulation.
//!
//! This crate is the single source of truth for the small value types that
//! flow between the world, agent, and core crates: identifiers, grid
//! coordinates, movement directions, team kinds, and the closed set of
//! cell variants.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for robot and item identifiers
//! - [`enums`] -- Team kinds and movement directions
//! - [`structs`] -- Positions, grid cells, memory cells, and item references

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Direction, TeamKind};
pub use ids::{ItemId, RobotId};
pub use structs::{Cell, ItemRef, MemoryCell, Position};
