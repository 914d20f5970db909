//! Ground-truth maze cells.

use forage_types::{Cell, ItemId, ItemRef, Position, TeamKind};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::layer::Layer;

/// The authoritative contents of the maze.
///
/// Walls never change after generation. Item cells become untagged floor
/// when a robot picks the item up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Cell storage.
    cells: Layer<Cell>,
}

impl Grid {
    /// Create an all-floor grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] for zero or oversized
    /// dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        Ok(Self {
            cells: Layer::filled(width, height, Cell::EMPTY)?,
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.cells.width()
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.cells.height()
    }

    /// Whether `pos` lies on the grid.
    pub const fn contains(&self, pos: Position) -> bool {
        self.cells.contains(pos)
    }

    /// The cell at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos)
    }

    /// Overwrite the cell at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `pos` is off the grid.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<(), WorldError> {
        self.cells.set(pos, cell)
    }

    /// Remove the item at `pos`, leaving untagged floor behind.
    ///
    /// Returns the removed item, or `None` if `pos` held no item.
    pub fn take_item(&mut self, pos: Position) -> Option<ItemId> {
        let id = self.get(pos)?.item()?;
        self.cells.replace(pos, Cell::EMPTY)?;
        Some(id)
    }

    /// All items still lying on the grid, row by row.
    pub fn items(&self) -> Vec<ItemRef> {
        self.cells
            .iter()
            .filter_map(|(pos, cell)| cell.item().map(|id| ItemRef::new(id, pos)))
            .collect()
    }

    /// The delivery point tagged for `team`, if one exists.
    pub fn delivery_point(&self, team: TeamKind) -> Option<Position> {
        self.cells
            .iter()
            .find(|(_, cell)| cell.delivery_point() == Some(team))
            .map(|(pos, _)| pos)
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.cells.count(Cell::is_wall)
    }

    /// The underlying storage, for shape-preserving scratch layers.
    pub const fn layer(&self) -> &Layer<Cell> {
        &self.cells
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_floor() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.wall_count(), 0);
        assert!(grid.items().is_empty());
        assert_eq!(grid.get(Position::new(2, 3)), Some(Cell::EMPTY));
    }

    #[test]
    fn take_item_clears_cell() {
        let mut grid = Grid::new(3, 3).unwrap();
        let pos = Position::new(1, 2);
        grid.set(pos, Cell::Item(ItemId::new(4))).unwrap();
        assert_eq!(grid.items(), vec![ItemRef::new(ItemId::new(4), pos)]);

        assert_eq!(grid.take_item(pos), Some(ItemId::new(4)));
        assert_eq!(grid.get(pos), Some(Cell::EMPTY));
        assert_eq!(grid.take_item(pos), None);
    }

    #[test]
    fn take_item_leaves_walls_alone() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(Position::new(0, 1), Cell::Wall).unwrap();
        assert_eq!(grid.take_item(Position::new(0, 1)), None);
        assert_eq!(grid.wall_count(), 1);
    }

    #[test]
    fn delivery_points_found_by_team() {
        let mut grid = Grid::new(4, 4).unwrap();
        let coop = Position::new(3, 0);
        grid.set(
            coop,
            Cell::Empty {
                delivery: Some(TeamKind::Cooperative),
            },
        )
        .unwrap();
        assert_eq!(grid.delivery_point(TeamKind::Cooperative), Some(coop));
        assert_eq!(grid.delivery_point(TeamKind::SelfInterested), None);
    }
}
