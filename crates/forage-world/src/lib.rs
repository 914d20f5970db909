//! Grid, memory, path estimation, and maze generation for the Forage simulation.
//!
//! This crate models the physical maze and what observers know about it.
//! It has no notion of robots as actors; it only answers spatial questions.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid access and maze generation.
//! - [`layer`] -- [`Layer`], the fixed-size 2D storage behind both grids.
//! - [`grid`] -- [`Grid`], the ground-truth cells of the maze.
//! - [`memory`] -- [`Memory`], one observer's partial map of the grid.
//! - [`pathfinding`] -- Conservative and optimistic BFS, the combined
//!   path estimate, and nearest-frontier search.
//! - [`generator`] -- Random placement, connectivity-preserving path
//!   carving, and wall fill.

pub mod error;
pub mod generator;
pub mod grid;
pub mod layer;
pub mod memory;
pub mod pathfinding;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use generator::{GeneratedMaze, GenerationStats, MazeSpec, RobotSpawn, generate_maze};
pub use grid::Grid;
pub use layer::Layer;
pub use memory::Memory;
pub use pathfinding::{PathLength, PathMode, estimate_path, nearest_frontier, shortest_path};
