//! Breadth-first path estimation over an observer's [`Memory`].
//!
//! Robots never see the whole maze, so every distance they reason about is
//! an estimate built from memory:
//!
//! - [`PathMode::Conservative`] walks only coordinates known to be floor or
//!   items. It never underestimates but may miss routes through unexplored
//!   territory.
//! - [`PathMode::Optimistic`] also walks unknown coordinates, assuming they
//!   are open. It never overestimates the true distance.
//! - [`estimate_path`] picks between the two with the density coefficient
//!   `D`: the known length wins when `known * D > optimistic`, otherwise the
//!   optimistic length is used.
//!
//! [`nearest_frontier`] finds the closest unknown coordinate reachable
//! without crossing a known wall.

use std::collections::VecDeque;

use forage_types::{MemoryCell, Position};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::memory::Memory;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which remembered coordinates a search may step onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// Only coordinates known to be floor or items.
    Conservative,
    /// Known floor or items, plus anything never observed.
    Optimistic,
}

impl PathMode {
    /// Whether a search in this mode may step onto `cell`.
    pub const fn admits(self, cell: MemoryCell) -> bool {
        match self {
            Self::Conservative => cell.is_known_passable(),
            Self::Optimistic => cell.is_known_passable() || cell.is_unknown(),
        }
    }
}

/// Length of a path, or the absence of one.
///
/// Ordering places every finite length below [`PathLength::Unreachable`],
/// so "shorter" comparisons treat unreachable targets as infinitely far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathLength {
    /// Reachable in this many steps.
    Steps(u32),
    /// No admissible route exists.
    Unreachable,
}

impl PathLength {
    /// Whether a route exists.
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Steps(_))
    }
}

impl core::fmt::Display for PathLength {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Steps(n) => write!(f, "{n}"),
            Self::Unreachable => f.write_str("unreachable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Searches
// ---------------------------------------------------------------------------

/// Shortest 4-connected path length from `start` to `target` through
/// coordinates `mode` admits.
///
/// The start coordinate itself is only rejected when it is known to be a
/// wall, which lets a robot standing on unexplored ground plan from it.
/// The target must be admitted by `mode` to be reached.
pub fn shortest_path(memory: &Memory, start: Position, target: Position, mode: PathMode) -> PathLength {
    let Some(origin) = memory.get(start) else {
        return PathLength::Unreachable;
    };
    if origin.is_known_wall() {
        return PathLength::Unreachable;
    }
    if start == target {
        return PathLength::Steps(0);
    }

    let mut visited = memory.layer().map(|_| false);
    let _ = visited.replace(start, true);
    let mut queue = VecDeque::new();
    queue.push_back((start, 0_u32));

    while let Some((current, distance)) = queue.pop_front() {
        let next_distance = distance.saturating_add(1);
        for next in current.neighbors() {
            let admitted = memory.get(next).is_some_and(|cell| mode.admits(cell));
            if !admitted || visited.replace(next, true) != Some(false) {
                continue;
            }
            if next == target {
                return PathLength::Steps(next_distance);
            }
            queue.push_back((next, next_distance));
        }
    }

    PathLength::Unreachable
}

/// Combined estimate of the remaining distance from `start` to `target`.
///
/// With known length `k` and optimistic length `u`, returns `k` when
/// `k * density > u` and `u` otherwise. If no known route exists the
/// optimistic length is returned, which is itself unreachable only when
/// even unexplored ground cannot connect the two.
pub fn estimate_path(memory: &Memory, start: Position, target: Position, density: Decimal) -> PathLength {
    let known = shortest_path(memory, start, target, PathMode::Conservative);
    let optimistic = shortest_path(memory, start, target, PathMode::Optimistic);
    match (known, optimistic) {
        (PathLength::Steps(k), PathLength::Steps(u)) => {
            let weighted = density.checked_mul(Decimal::from(k));
            if weighted.is_some_and(|w| w > Decimal::from(u)) {
                known
            } else {
                optimistic
            }
        }
        (PathLength::Steps(_), PathLength::Unreachable) => known,
        (PathLength::Unreachable, _) => optimistic,
    }
}

/// The closest never-observed coordinate reachable from `start` without
/// crossing a known wall.
///
/// Returns `start` itself when it is unknown, and `None` when every
/// reachable coordinate has been observed.
pub fn nearest_frontier(memory: &Memory, start: Position) -> Option<Position> {
    let origin = memory.get(start)?;
    if origin.is_unknown() {
        return Some(start);
    }
    if origin.is_known_wall() {
        return None;
    }

    let mut visited = memory.layer().map(|_| false);
    let _ = visited.replace(start, true);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            let Some(cell) = memory.get(next) else {
                continue;
            };
            if cell.is_known_wall() || visited.replace(next, true) != Some(false) {
                continue;
            }
            if cell.is_unknown() {
                return Some(next);
            }
            queue.push_back(next);
        }
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forage_types::Cell;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::grid::Grid;

    /// Parse a map where `#` is a wall, `?` unknown, and anything else floor.
    fn memory_from(rows: &[&str]) -> Memory {
        let height = u32::try_from(rows.len()).unwrap();
        let width = u32::try_from(rows.first().unwrap().len()).unwrap();
        let mut memory = Memory::new(width, height).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let pos = Position::new(i32::try_from(x).unwrap(), i32::try_from(y).unwrap());
                match ch {
                    '#' => {
                        memory.record(pos, Cell::Wall).unwrap();
                    }
                    '?' => {}
                    _ => {
                        memory.record(pos, Cell::EMPTY).unwrap();
                    }
                }
            }
        }
        memory
    }

    #[test]
    fn same_cell_is_zero() {
        let memory = memory_from(&["..", ".."]);
        let p = Position::new(1, 1);
        assert_eq!(
            shortest_path(&memory, p, p, PathMode::Conservative),
            PathLength::Steps(0)
        );
    }

    #[test]
    fn wall_start_is_unreachable() {
        let memory = memory_from(&["#.", ".."]);
        assert_eq!(
            shortest_path(&memory, Position::new(0, 0), Position::new(1, 1), PathMode::Optimistic),
            PathLength::Unreachable
        );
    }

    #[test]
    fn conservative_routes_around_unknown() {
        let memory = memory_from(&[
            "...", //
            ".?.", //
            "...",
        ]);
        let from = Position::new(1, 0);
        let to = Position::new(1, 2);
        assert_eq!(
            shortest_path(&memory, from, to, PathMode::Conservative),
            PathLength::Steps(4)
        );
        assert_eq!(
            shortest_path(&memory, from, to, PathMode::Optimistic),
            PathLength::Steps(2)
        );
    }

    #[test]
    fn walls_block_both_modes() {
        let memory = memory_from(&[
            ".#.", //
            ".#.", //
            ".#.",
        ]);
        let from = Position::new(0, 0);
        let to = Position::new(2, 2);
        assert_eq!(
            shortest_path(&memory, from, to, PathMode::Conservative),
            PathLength::Unreachable
        );
        assert_eq!(
            shortest_path(&memory, from, to, PathMode::Optimistic),
            PathLength::Unreachable
        );
    }

    #[test]
    fn optimistic_never_exceeds_conservative() {
        let memory = memory_from(&[
            "..?..", //
            ".#?#.", //
            "..?..", //
            "?#..?",
        ]);
        for start in memory.layer().positions() {
            for target in memory.layer().positions() {
                let known = shortest_path(&memory, start, target, PathMode::Conservative);
                let guess = shortest_path(&memory, start, target, PathMode::Optimistic);
                assert!(guess <= known, "{start} -> {target}: {guess} > {known}");
            }
        }
    }

    #[test]
    fn fully_known_grid_modes_agree() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(Position::new(1, 1), Cell::Wall).unwrap();
        grid.set(Position::new(2, 1), Cell::Wall).unwrap();
        let memory = Memory::from_grid(&grid);
        let from = Position::new(0, 2);
        let to = Position::new(3, 0);
        let known = shortest_path(&memory, from, to, PathMode::Conservative);
        assert_eq!(known, PathLength::Steps(5));
        assert_eq!(known, shortest_path(&memory, from, to, PathMode::Optimistic));
    }

    #[test]
    fn estimate_prefers_known_route_when_detour_is_long() {
        // Known detour is 4, optimistic shortcut is 2.
        let memory = memory_from(&[
            "...", //
            ".?.", //
            "...",
        ]);
        let from = Position::new(1, 0);
        let to = Position::new(1, 2);
        // 4 * 1.3 = 5.2 > 2, so the known route is trusted.
        assert_eq!(estimate_path(&memory, from, to, dec!(1.3)), PathLength::Steps(4));
    }

    #[test]
    fn estimate_prefers_optimistic_when_equal() {
        let memory = memory_from(&["...."]);
        let from = Position::new(0, 0);
        let to = Position::new(3, 0);
        // 3 * 1 = 3 is not greater than 3.
        assert_eq!(estimate_path(&memory, from, to, dec!(1)), PathLength::Steps(3));
    }

    #[test]
    fn estimate_falls_back_to_optimistic() {
        let memory = memory_from(&["..??"]);
        assert_eq!(
            estimate_path(&memory, Position::new(0, 0), Position::new(3, 0), dec!(1.5)),
            PathLength::Steps(3)
        );
    }

    #[test]
    fn estimate_unreachable_when_walled_off() {
        let memory = memory_from(&[".#?"]);
        assert_eq!(
            estimate_path(&memory, Position::new(0, 0), Position::new(2, 0), dec!(1.5)),
            PathLength::Unreachable
        );
    }

    #[test]
    fn frontier_is_nearest_unknown() {
        let memory = memory_from(&[
            "...?", //
            ".#..", //
            "?...",
        ]);
        assert_eq!(
            nearest_frontier(&memory, Position::new(0, 0)),
            Some(Position::new(0, 2))
        );
    }

    #[test]
    fn frontier_does_not_cross_walls() {
        let memory = memory_from(&[".#?"]);
        assert_eq!(nearest_frontier(&memory, Position::new(0, 0)), None);
    }

    #[test]
    fn unreachable_orders_after_steps() {
        assert!(PathLength::Steps(u32::MAX) < PathLength::Unreachable);
        assert!(PathLength::Steps(3) < PathLength::Steps(4));
    }
}
