//! Error types for the `forage-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use forage_types::Position;
use rust_decimal::Decimal;

/// Errors that can occur during grid access or maze generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// Width or height is zero or too large to address.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The density coefficient lies outside `[1, 2]`.
    #[error("density coefficient {density} must be between 1 and 2")]
    InvalidDensity {
        /// The rejected coefficient.
        density: Decimal,
    },

    /// More objects were requested than the grid has cells for.
    #[error("cannot place {requested} objects on a grid with {available} cells")]
    InsufficientCells {
        /// Cells needed for items, delivery points, and robots.
        requested: usize,
        /// Cells in the grid.
        available: usize,
    },

    /// The wall budget exceeds the cells left after carving.
    #[error("wall target {walls} exceeds {free} free cells")]
    InfeasibleWallDensity {
        /// Walls the density coefficient asks for.
        walls: usize,
        /// Cells neither carved nor occupied.
        free: usize,
    },

    /// Random placement gave up after its attempt budget.
    #[error("failed to place {what} after {attempts} attempts")]
    PlacementExhausted {
        /// What was being placed.
        what: &'static str,
        /// Attempts made before giving up.
        attempts: usize,
    },

    /// A coordinate lies outside the grid.
    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),

    /// Path carving exhausted the grid without reaching its target.
    #[error("no carvable route from {from} to {to}")]
    CarveFailed {
        /// Carving origin.
        from: Position,
        /// Carving target.
        to: Position,
    },
}
