//! One observer's partial map of the grid.

use forage_types::{Cell, MemoryCell, Position};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::grid::Grid;
use crate::layer::Layer;

/// Same-shape companion to a [`Grid`] where each coordinate is either
/// unknown or the last cell observed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    /// Per-coordinate knowledge.
    cells: Layer<MemoryCell>,
}

impl Memory {
    /// A memory in which nothing has been observed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] for zero or oversized
    /// dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        Ok(Self {
            cells: Layer::filled(width, height, MemoryCell::Unknown)?,
        })
    }

    /// A blank memory shaped like `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            cells: grid.layer().map(|_| MemoryCell::Unknown),
        }
    }

    /// A memory that has observed every cell of `grid`.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            cells: grid.layer().map(MemoryCell::Known),
        }
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.cells.width()
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.cells.height()
    }

    /// Whether `pos` lies inside the remembered area.
    pub const fn contains(&self, pos: Position) -> bool {
        self.cells.contains(pos)
    }

    /// What is remembered at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<MemoryCell> {
        self.cells.get(pos)
    }

    /// Record an observation of `cell` at `pos`.
    ///
    /// Returns whether the remembered value changed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `pos` is outside the memory.
    pub fn record(&mut self, pos: Position, cell: Cell) -> Result<bool, WorldError> {
        let known = MemoryCell::Known(cell);
        self.cells
            .replace(pos, known)
            .map(|previous| previous != known)
            .ok_or(WorldError::OutOfBounds(pos))
    }

    /// Whether `pos` is in bounds and has never been observed.
    pub fn is_unknown(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(MemoryCell::is_unknown)
    }

    /// Whether `pos` is remembered as a wall.
    pub fn is_known_wall(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(MemoryCell::is_known_wall)
    }

    /// Number of coordinates never observed.
    pub fn unknown_count(&self) -> usize {
        self.cells.count(MemoryCell::is_unknown)
    }

    /// Fill every unknown coordinate with what `other` knows there.
    ///
    /// Coordinates this memory already knows are left untouched, so when
    /// several memories are merged in turn the first to know a cell wins.
    /// Shapes must match; coordinates outside `self` are ignored.
    pub fn merge_from(&mut self, other: &Self) {
        for (pos, theirs) in other.cells.iter() {
            if theirs.is_unknown() {
                continue;
            }
            if self.is_unknown(pos) {
                let _previous = self.cells.replace(pos, theirs);
            }
        }
    }

    /// The underlying storage, for shape-preserving scratch layers.
    pub const fn layer(&self) -> &Layer<MemoryCell> {
        &self.cells
    }
}
