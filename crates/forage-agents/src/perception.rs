//! What a robot can see and how crowded a candidate cell is.
//!
//! Robots see ground truth in a square window of Chebyshev radius
//! [`VISION_RADIUS`] around themselves. Everything here is a free function
//! over explicit state so both team behaviors share it unchanged.

use forage_types::{Cell, ItemRef, Position};
use forage_world::{Grid, Memory, WorldError};

/// Chebyshev radius of the vision window (a 5x5 square).
pub const VISION_RADIUS: i32 = 2;

/// Every coordinate in the window around `center`, row by row, including
/// ones off the grid.
fn window(center: Position) -> impl Iterator<Item = Position> {
    (-VISION_RADIUS..=VISION_RADIUS).flat_map(move |dy| {
        (-VISION_RADIUS..=VISION_RADIUS).map(move |dx| center.offset((dx, dy)))
    })
}

/// Whether `pos` falls inside the window around `center`.
const fn in_window(center: Position, pos: Position) -> bool {
    let radius = VISION_RADIUS.unsigned_abs();
    center.x.abs_diff(pos.x) <= radius && center.y.abs_diff(pos.y) <= radius
}

/// Ground truth visible from one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionWindow {
    /// Where the observer stands.
    pub center: Position,
    /// Window cells row by row; `None` where the window leaves the grid.
    pub cells: Vec<(Position, Option<Cell>)>,
}

impl VisionWindow {
    /// The cells that lie on the grid.
    pub fn visible(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .iter()
            .filter_map(|&(pos, cell)| cell.map(|c| (pos, c)))
    }

    /// Items in view, row by row.
    pub fn items(&self) -> impl Iterator<Item = ItemRef> + '_ {
        self.visible()
            .filter_map(|(pos, cell)| cell.item().map(|id| ItemRef::new(id, pos)))
    }
}

/// The window of ground truth around `pos`.
pub fn vision(grid: &Grid, pos: Position) -> VisionWindow {
    VisionWindow {
        center: pos,
        cells: window(pos).map(|p| (p, grid.get(p))).collect(),
    }
}

/// Copy everything visible from `pos` into `memory`.
///
/// Items that were picked up since the last look are overwritten by the
/// floor now seen there. Returns the items in view so the caller can add
/// them to its discovered pool. Repeating the call with an unchanged grid
/// leaves `memory` unchanged.
pub fn observe(grid: &Grid, memory: &mut Memory, pos: Position) -> Result<Vec<ItemRef>, WorldError> {
    let view = vision(grid, pos);
    for (cell_pos, cell) in view.visible() {
        memory.record(cell_pos, cell)?;
    }
    Ok(view.items().collect())
}

/// Number of never-observed coordinates in the window around `pos`.
pub fn discovery_gain(memory: &Memory, pos: Position) -> u32 {
    let unknown = window(pos).filter(|p| memory.is_unknown(*p)).count();
    u32::try_from(unknown).unwrap_or(u32::MAX)
}

/// How contested `candidate` is for a robot currently at `current`.
///
/// Counts the `others` inside the window around `candidate` that are
/// strictly closer to `candidate` than to `current`, capped at `cap`.
pub fn congestion(candidate: Position, current: Position, others: &[Position], cap: u32) -> u32 {
    let contested = others
        .iter()
        .filter(|other| in_window(candidate, **other))
        .filter(|other| other.manhattan_distance(candidate) < other.manhattan_distance(current))
        .count();
    u32::try_from(contested).unwrap_or(u32::MAX).min(cap)
}
