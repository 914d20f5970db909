//! Core value structs: grid coordinates, cells, and item references.

use serde::{Deserialize, Serialize};

use crate::enums::{Direction, TeamKind};
use crate::ids::ItemId;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A grid coordinate. `x` is the column, `y` is the row.
///
/// Coordinates are signed so that neighbor arithmetic can step off the
/// grid; bounds are checked by the owning grid, never assumed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Position {
    /// Create a position from column and row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|ax - bx| + |ay - by|`.
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// The position one step in `direction`.
    pub const fn step(self, direction: Direction) -> Self {
        self.offset(direction.offset())
    }

    /// The position shifted by `(dx, dy)`.
    pub const fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The four orthogonal neighbors in [`Direction::ALL`] order.
    ///
    /// Out-of-grid neighbors are included; callers filter by bounds.
    pub fn neighbors(self) -> [Self; 4] {
        Direction::ALL.map(|dir| self.step(dir))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// Ground-truth content of one grid coordinate.
///
/// Exactly one variant occupies each coordinate. Robots are tracked by
/// position on their own and never appear as cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Cell {
    /// Walkable floor, optionally tagged as a team's delivery point.
    Empty {
        /// Team whose retrieval point this is, if any.
        delivery: Option<TeamKind>,
    },
    /// Impassable wall. Walls never move once generated.
    Wall,
    /// An item waiting to be picked up.
    Item(ItemId),
}

impl Cell {
    /// Untagged floor.
    pub const EMPTY: Self = Self::Empty { delivery: None };

    /// Whether this cell is a wall.
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Whether a robot may stand on this cell.
    pub const fn is_passable(self) -> bool {
        !self.is_wall()
    }

    /// The item on this cell, if any.
    pub const fn item(self) -> Option<ItemId> {
        match self {
            Self::Item(id) => Some(id),
            Self::Empty { .. } | Self::Wall => None,
        }
    }

    /// The team whose delivery point this cell is, if any.
    pub const fn delivery_point(self) -> Option<TeamKind> {
        match self {
            Self::Empty { delivery } => delivery,
            Self::Wall | Self::Item(_) => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One coordinate of an observer's memory.
///
/// Memory only moves from `Unknown` to `Known`. A known item cell may later
/// be overwritten with the floor seen in its place once the item is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "cell", rename_all = "snake_case")]
pub enum MemoryCell {
    /// Never observed.
    #[default]
    Unknown,
    /// Last observed ground truth.
    Known(Cell),
}

impl MemoryCell {
    /// Whether this coordinate has never been observed.
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether this coordinate is remembered as a wall.
    pub const fn is_known_wall(self) -> bool {
        matches!(self, Self::Known(Cell::Wall))
    }

    /// Whether this coordinate is remembered as floor or an item.
    pub const fn is_known_passable(self) -> bool {
        matches!(self, Self::Known(Cell::Empty { .. } | Cell::Item(_)))
    }

    /// Whether this coordinate still shows `item`.
    pub fn shows_item(self, item: ItemId) -> bool {
        self == Self::Known(Cell::Item(item))
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A handle to an item: its identity plus the fixed coordinate it lies on.
///
/// Items never move until picked up, so the coordinate stays valid for
/// the item's lifetime. Robots and team pools hold these by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    /// The item's identity.
    pub id: ItemId,
    /// Where the item lies.
    pub position: Position,
}

impl ItemRef {
    /// Create a reference to `id` lying at `position`.
    pub const fn new(id: ItemId, position: Position) -> Self {
        Self { id, position }
    }
}
