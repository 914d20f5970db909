//! Random maze generation with guaranteed connectivity.
//!
//! Generation runs in four stages:
//!
//! 1. **Placement** -- items, then one delivery point per team, then robot
//!    spawns, each drawn uniformly from the cells still free for it.
//! 2. **Carving** -- every point of interest is joined to the growing
//!    network by a randomized depth-first walk ([`carve_path`]) whose
//!    neighbor order is biased toward the walk's target
//!    ([`weighted_order`]). Carved cells are reserved as floor.
//! 3. **Wall budget** -- `floor(free * (D - 1))` walls, where `free` counts
//!    the cells left uncarved and `D` is the density coefficient.
//! 4. **Wall fill** -- walls are dropped on random uncarved floor.
//!
//! Walls never land on a carved cell, so every item, spawn, and delivery
//! point stays mutually reachable in the finished grid.

use std::collections::BTreeSet;

use forage_types::{Cell, ItemId, ItemRef, Position, RobotId, TeamKind};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::grid::Grid;
use crate::layer::Layer;

/// Carving weight of a neighbor strictly closer to the walk's target.
pub const NEAR_WEIGHT: u32 = 15;

/// Carving weight of any other neighbor.
pub const FAR_WEIGHT: u32 = 1;

/// Random placement tries this many candidates per grid cell before
/// reporting [`WorldError::PlacementExhausted`].
const PLACEMENT_ATTEMPTS_PER_CELL: usize = 64;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Parameters for one generated maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSpec {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Items to scatter.
    pub item_count: u32,
    /// Robots on each of the two teams.
    pub robots_per_team: u32,
    /// Density coefficient `D` in `[1, 2]`. `1` places no walls.
    pub density: Decimal,
}

impl MazeSpec {
    /// Total robots across both teams.
    pub const fn robot_count(&self) -> u32 {
        self.robots_per_team.saturating_mul(2)
    }

    /// Reject parameters that cannot produce a maze.
    ///
    /// Items and the two delivery points each need their own cell, and
    /// robots (which may share cells with one another) need at least one
    /// cell left over.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`],
    /// [`WorldError::InvalidDensity`], or [`WorldError::InsufficientCells`].
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.density < Decimal::ONE || self.density > Decimal::TWO {
            return Err(WorldError::InvalidDensity {
                density: self.density,
            });
        }
        let available = Layer::filled(self.width, self.height, ())?.len();
        let robot_cells = usize::from(self.robots_per_team > 0);
        let requested = usize::try_from(self.item_count)
            .ok()
            .and_then(|items| items.checked_add(TeamKind::ALL.len()))
            .and_then(|n| n.checked_add(robot_cells))
            .unwrap_or(usize::MAX);
        if requested > available {
            return Err(WorldError::InsufficientCells {
                requested,
                available,
            });
        }
        Ok(())
    }
}

/// Where one robot starts and which team it joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotSpawn {
    /// Identity assigned in spawn order.
    pub id: RobotId,
    /// Even spawn indices are cooperative, odd are self-interested.
    pub team: TeamKind,
    /// Starting coordinate.
    pub position: Position,
}

/// Counters describing how a maze was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Cells reserved by path carving.
    pub carved_cells: usize,
    /// Cells left uncarved before walls were placed.
    pub free_cells: usize,
    /// Walls placed.
    pub walls_placed: usize,
}

/// A freshly generated maze with everything needed to start a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMaze {
    /// Ground-truth cells, including items, walls, and tagged delivery
    /// points.
    pub grid: Grid,
    /// Robot spawns in spawn order.
    pub spawns: Vec<RobotSpawn>,
    /// Delivery points in [`TeamKind::ALL`] order.
    pub delivery_points: [Position; 2],
    /// Items in id order.
    pub items: Vec<ItemRef>,
    /// Construction counters.
    pub stats: GenerationStats,
}

impl GeneratedMaze {
    /// The delivery point assigned to `team`.
    pub const fn delivery_point(&self, team: TeamKind) -> Position {
        match team {
            TeamKind::Cooperative => self.delivery_points[0],
            TeamKind::SelfInterested => self.delivery_points[1],
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a maze from `spec`.
///
/// # Errors
///
/// Returns a [`WorldError`] when `spec` is invalid, random placement runs
/// out of attempts, or carving fails.
pub fn generate_maze(spec: &MazeSpec, rng: &mut impl Rng) -> Result<GeneratedMaze, WorldError> {
    spec.validate()?;
    let mut grid = Grid::new(spec.width, spec.height)?;
    let attempts = grid.layer().len().saturating_mul(PLACEMENT_ATTEMPTS_PER_CELL);

    let mut items = Vec::new();
    for raw in 0..spec.item_count {
        let position = sample_cell(&grid, rng, attempts, "item", |cell| cell == Cell::EMPTY)?;
        let id = ItemId::new(raw);
        grid.set(position, Cell::Item(id))?;
        items.push(ItemRef::new(id, position));
    }

    let mut delivery_points = [Position::new(0, 0); 2];
    for (slot, team) in delivery_points.iter_mut().zip(TeamKind::ALL) {
        let position = sample_cell(&grid, rng, attempts, "delivery point", |cell| {
            cell == Cell::EMPTY
        })?;
        grid.set(
            position,
            Cell::Empty {
                delivery: Some(team),
            },
        )?;
        *slot = position;
    }

    // Robots may share a cell but never start on an item or delivery point.
    let mut spawns = Vec::new();
    for index in 0..spec.robot_count() {
        let position = sample_cell(&grid, rng, attempts, "robot", |cell| cell == Cell::EMPTY)?;
        spawns.push(RobotSpawn {
            id: RobotId::new(index),
            team: TeamKind::for_spawn_index(index),
            position,
        });
    }

    let mut points: Vec<Position> = Vec::new();
    let mut seen = BTreeSet::new();
    let candidates = items
        .iter()
        .map(|item| item.position)
        .chain(spawns.iter().map(|spawn| spawn.position))
        .chain(delivery_points);
    for position in candidates {
        if seen.insert(position) {
            points.push(position);
        }
    }

    let mut carved = grid.layer().map(|_| false);
    connect_points(points, &mut carved, rng)?;
    let carved_cells = carved.count(|c| c);

    let free_cells = carved.len().saturating_sub(carved_cells);
    let wall_target = wall_budget(free_cells, spec.density);
    if wall_target > free_cells {
        return Err(WorldError::InfeasibleWallDensity {
            walls: wall_target,
            free: free_cells,
        });
    }
    debug!(carved_cells, free_cells, wall_target, "carved connectivity paths");

    for _ in 0..wall_target {
        let position = sample_position(&grid, rng, attempts, "wall", |pos| {
            carved.get(pos) == Some(false) && grid.get(pos) == Some(Cell::EMPTY)
        })?;
        grid.set(position, Cell::Wall)?;
    }

    let stats = GenerationStats {
        carved_cells,
        free_cells,
        walls_placed: wall_target,
    };
    debug!(
        width = spec.width,
        height = spec.height,
        items = items.len(),
        robots = spawns.len(),
        walls = stats.walls_placed,
        "maze generated"
    );

    Ok(GeneratedMaze {
        grid,
        spawns,
        delivery_points,
        items,
        stats,
    })
}

/// `floor(free * (density - 1))`, clamped at zero.
fn wall_budget(free: usize, density: Decimal) -> usize {
    let fraction = density.checked_sub(Decimal::ONE).unwrap_or(Decimal::ZERO);
    Decimal::from(free)
        .checked_mul(fraction)
        .and_then(|walls| walls.floor().to_usize())
        .unwrap_or(0)
}

/// Draw a uniformly random position whose cell satisfies `accept`.
fn sample_cell(
    grid: &Grid,
    rng: &mut impl Rng,
    attempts: usize,
    what: &'static str,
    mut accept: impl FnMut(Cell) -> bool,
) -> Result<Position, WorldError> {
    sample_position(grid, rng, attempts, what, |pos| {
        grid.get(pos).is_some_and(&mut accept)
    })
}

/// Draw a uniformly random in-bounds position satisfying `accept`.
fn sample_position(
    grid: &Grid,
    rng: &mut impl Rng,
    attempts: usize,
    what: &'static str,
    mut accept: impl FnMut(Position) -> bool,
) -> Result<Position, WorldError> {
    let invalid = |_e| WorldError::InvalidDimensions {
        width: grid.width(),
        height: grid.height(),
    };
    let width = i32::try_from(grid.width()).map_err(invalid)?;
    let height = i32::try_from(grid.height()).map_err(invalid)?;
    for _ in 0..attempts {
        let candidate = Position::new(rng.random_range(0..width), rng.random_range(0..height));
        if accept(candidate) {
            return Ok(candidate);
        }
    }
    Err(WorldError::PlacementExhausted { what, attempts })
}

/// Join every point into one carved network.
///
/// Two random points are connected first. Each remaining point, taken in
/// random order, is then carved toward a random point already joined.
fn connect_points(
    mut pending: Vec<Position>,
    carved: &mut Layer<bool>,
    rng: &mut impl Rng,
) -> Result<(), WorldError> {
    let Some(first) = take_random(&mut pending, rng) else {
        return Ok(());
    };
    let _ = carved.replace(first, true);
    let mut joined = vec![first];

    while let Some(next) = take_random(&mut pending, rng) {
        let index = rng.random_range(0..joined.len());
        let anchor = joined
            .get(index)
            .copied()
            .ok_or(WorldError::CarveFailed { from: next, to: first })?;
        carve_path(next, anchor, carved, rng)?;
        joined.push(next);
    }
    Ok(())
}

/// Remove and return a uniformly random element.
fn take_random<T>(values: &mut Vec<T>, rng: &mut impl Rng) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let index = rng.random_range(0..values.len());
    Some(values.swap_remove(index))
}

/// Carve a random, target-biased path from `start` to `target`.
///
/// Runs a depth-first search that marks cells visited when they are pushed
/// and explores neighbors in the order produced by [`weighted_order`]:
/// neighbors are pushed in reverse sampled order, so the first sample is
/// popped and explored first.
/// On reaching `target` the predecessor chain back to `start` is marked in
/// `carved`. The search ignores existing carving, so paths may cross.
///
/// Returns the number of cells newly marked.
///
/// # Errors
///
/// Returns [`WorldError::CarveFailed`] if `target` cannot be reached, which
/// only happens when it lies outside the layer.
pub fn carve_path(
    start: Position,
    target: Position,
    carved: &mut Layer<bool>,
    rng: &mut impl Rng,
) -> Result<usize, WorldError> {
    if !carved.contains(start) || !carved.contains(target) {
        return Err(WorldError::CarveFailed { from: start, to: target });
    }

    let mut came_from: Layer<Option<Position>> = carved.map(|_| None);
    let mut visited = carved.map(|_| false);
    let _ = visited.replace(start, true);
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if current == target {
            let mut marked = usize::from(carved.replace(current, true) == Some(false));
            let mut cursor = current;
            while let Some(previous) = came_from.get(cursor).flatten() {
                if carved.replace(previous, true) == Some(false) {
                    marked = marked.saturating_add(1);
                }
                cursor = previous;
            }
            return Ok(marked);
        }

        let neighbors = carved.neighbors(current).collect();
        // The stack pops last-in first, so push the preferred neighbor last.
        for next in weighted_order(current, neighbors, target, rng).into_iter().rev() {
            if visited.replace(next, true) == Some(false) {
                let _ = came_from.replace(next, Some(current));
                stack.push(next);
            }
        }
    }

    Err(WorldError::CarveFailed { from: start, to: target })
}

/// Order `candidates` by weighted sampling without replacement.
///
/// Candidates strictly closer to `target` than `current` carry
/// [`NEAR_WEIGHT`]; the rest carry [`FAR_WEIGHT`]. Each draw picks one
/// remaining candidate with probability proportional to its weight.
pub fn weighted_order(
    current: Position,
    candidates: Vec<Position>,
    target: Position,
    rng: &mut impl Rng,
) -> Vec<Position> {
    let here = current.manhattan_distance(target);
    let mut weighted: Vec<(Position, u32)> = candidates
        .into_iter()
        .map(|pos| {
            let weight = if pos.manhattan_distance(target) < here {
                NEAR_WEIGHT
            } else {
                FAR_WEIGHT
            };
            (pos, weight)
        })
        .collect();

    let mut ordered = Vec::with_capacity(weighted.len());
    while !weighted.is_empty() {
        let total = weighted
            .iter()
            .fold(0_u32, |sum, &(_, weight)| sum.saturating_add(weight));
        let roll = rng.random_range(0..total);
        let chosen = weighted
            .iter()
            .scan(0_u32, |cumulative, &(_, weight)| {
                *cumulative = cumulative.saturating_add(weight);
                Some(*cumulative)
            })
            .position(|cumulative| roll < cumulative)
            .unwrap_or(0);
        ordered.push(weighted.remove(chosen).0);
    }
    ordered
}
