//! Utility scoring and move selection.
//!
//! Each turn a robot scores the four orthogonal moves with [`utility`] and
//! takes the best. When nothing scores above zero it heads for the nearest
//! unexplored cell instead, and when even the best move is strongly
//! negative it stays put.

use forage_types::{Direction, Position};
use forage_world::{Memory, PathLength, estimate_path, nearest_frontier};
use rust_decimal::Decimal;

use crate::config::UtilityWeights;
use crate::perception::{congestion, discovery_gain};

/// Everything a robot consults when choosing a move.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// The memory the robot plans with.
    pub memory: &'a Memory,
    /// Where the robot stands.
    pub position: Position,
    /// Coordinate of the reserved item, if any.
    pub target: Option<Position>,
    /// Whether the robot is carrying an item.
    pub carrying: bool,
    /// The team's delivery point.
    pub retrieval: Position,
    /// Positions of the other robots on the team.
    pub teammates: &'a [Position],
    /// Team-specific score adjustments.
    pub weights: &'a UtilityWeights,
    /// Density coefficient used by path estimates.
    pub density: Decimal,
}

impl DecisionContext<'_> {
    /// Estimated steps from `from` to `to` through remembered terrain.
    fn estimate(&self, from: Position, to: Position) -> PathLength {
        estimate_path(self.memory, from, to, self.density)
    }

    /// Whether stepping to `candidate` shortens the estimate to `goal`.
    ///
    /// Unreachable estimates compare as infinitely long, so a move never
    /// counts as progress by landing somewhere with no route at all.
    fn progresses(&self, candidate: Position, goal: Position) -> bool {
        self.estimate(candidate, goal) < self.estimate(self.position, goal)
    }
}

/// Score of moving to `candidate`.
///
/// Starts from the unknown cells around `candidate`. Moves off the grid or
/// into a remembered wall short-circuit to their penalty. Otherwise a
/// robot without cargo is rewarded for reaching or approaching its target,
/// a carrying robot for reaching or approaching the retrieval point, and
/// crowding by teammates is deducted.
pub fn utility(ctx: &DecisionContext<'_>, candidate: Position) -> i32 {
    let weights = ctx.weights;
    if !ctx.memory.contains(candidate) {
        return weights.out_of_bounds_penalty;
    }
    if ctx.memory.is_known_wall(candidate) {
        return weights.wall_penalty;
    }

    let gain = discovery_gain(ctx.memory, candidate)
        .checked_div(weights.discovery_divisor.max(1))
        .unwrap_or(0);
    let mut score = i32::try_from(gain).unwrap_or(i32::MAX);

    if ctx.carrying {
        if candidate == ctx.retrieval {
            score = score.saturating_add(weights.delivery_bonus);
        } else if ctx.progresses(candidate, ctx.retrieval) {
            score = score.saturating_add(weights.delivery_progress_bonus);
        }
    } else if let Some(target) = ctx.target {
        if candidate == target {
            score = score.saturating_add(weights.target_reached_bonus);
        } else if ctx.progresses(candidate, target) {
            score = score.saturating_add(weights.target_progress_bonus);
        }
    }

    let crowd = congestion(candidate, ctx.position, ctx.teammates, weights.congestion_cap);
    score.saturating_sub(i32::try_from(crowd).unwrap_or(i32::MAX))
}

/// Choose a move, or `None` to stay in place.
///
/// In-bounds directions are scored in [`Direction::ALL`] order and the
/// first strictly best one wins. If that best score is not positive, the
/// first direction (same order) that is not a remembered wall and
/// shortens the estimate to the nearest frontier is taken instead. A best
/// score below the idle threshold leaves the robot where it is.
pub fn decide_action(ctx: &DecisionContext<'_>) -> Option<Direction> {
    let mut best: Option<(Direction, i32)> = None;
    for direction in Direction::ALL {
        let candidate = ctx.position.step(direction);
        if !ctx.memory.contains(candidate) {
            continue;
        }
        let score = utility(ctx, candidate);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((direction, score));
        }
    }
    let (mut choice, best_score) = best?;

    if best_score <= 0 {
        if let Some(frontier) = nearest_frontier(ctx.memory, ctx.position) {
            let toward = Direction::ALL.into_iter().find(|&direction| {
                let next = ctx.position.step(direction);
                ctx.memory.contains(next)
                    && !ctx.memory.is_known_wall(next)
                    && ctx.progresses(next, frontier)
            });
            if let Some(direction) = toward {
                choice = direction;
            }
        }
    }

    if best_score < ctx.weights.idle_threshold {
        return None;
    }
    Some(choice)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forage_types::Cell;
    use forage_world::Grid;
    use rust_decimal_macros::dec;

    use super::*;

    const COOP: UtilityWeights = UtilityWeights::cooperative();
    const SELFISH: UtilityWeights = UtilityWeights::self_interested();

    fn context<'a>(memory: &'a Memory, position: Position, weights: &'a UtilityWeights) -> DecisionContext<'a> {
        DecisionContext {
            memory,
            position,
            target: None,
            carrying: false,
            retrieval: Position::new(0, 0),
            teammates: &[],
            weights,
            density: dec!(1.3),
        }
    }

    fn known_grid(width: u32, height: u32, walls: &[Position]) -> Memory {
        let mut grid = Grid::new(width, height).unwrap();
        for wall in walls {
            grid.set(*wall, Cell::Wall).unwrap();
        }
        Memory::from_grid(&grid)
    }

    #[test]
    fn out_of_bounds_penalty_differs_by_team() {
        let memory = known_grid(3, 3, &[]);
        let outside = Position::new(-1, 0);
        assert_eq!(utility(&context(&memory, Position::new(0, 0), &COOP), outside), -5);
        assert_eq!(utility(&context(&memory, Position::new(0, 0), &SELFISH), outside), -1);
    }

    #[test]
    fn known_wall_is_penalized() {
        let memory = known_grid(3, 3, &[Position::new(1, 0)]);
        let ctx = context(&memory, Position::new(0, 0), &SELFISH);
        assert_eq!(utility(&ctx, Position::new(1, 0)), -5);
    }

    #[test]
    fn target_bonuses() {
        let memory = known_grid(5, 1, &[]);
        let mut ctx = context(&memory, Position::new(2, 0), &COOP);
        ctx.target = Some(Position::new(3, 0));
        assert_eq!(utility(&ctx, Position::new(3, 0)), 12);
        assert_eq!(utility(&ctx, Position::new(1, 0)), 0);

        ctx.target = Some(Position::new(4, 0));
        assert_eq!(utility(&ctx, Position::new(3, 0)), 8);
        let selfish = DecisionContext {
            weights: &SELFISH,
            ..ctx
        };
        assert_eq!(utility(&selfish, Position::new(3, 0)), 4);
    }

    #[test]
    fn carrying_ignores_target_and_seeks_retrieval() {
        let memory = known_grid(5, 1, &[]);
        let mut ctx = context(&memory, Position::new(2, 0), &COOP);
        ctx.carrying = true;
        ctx.target = Some(Position::new(4, 0));
        ctx.retrieval = Position::new(0, 0);
        assert_eq!(utility(&ctx, Position::new(1, 0)), 7);
        assert_eq!(utility(&ctx, Position::new(3, 0)), 0);

        ctx.position = Position::new(1, 0);
        assert_eq!(utility(&ctx, Position::new(0, 0)), 10);
    }

    #[test]
    fn unknown_cells_add_exploration_bonus() {
        let grid = Grid::new(9, 9).unwrap();
        let memory = Memory::for_grid(&grid);
        let ctx = context(&memory, Position::new(4, 4), &COOP);
        assert_eq!(utility(&ctx, Position::new(5, 4)), 25);

        let halved = UtilityWeights {
            discovery_divisor: 2,
            ..COOP
        };
        let ctx = context(&memory, Position::new(4, 4), &halved);
        assert_eq!(utility(&ctx, Position::new(5, 4)), 12);
    }

    #[test]
    fn congestion_is_deducted() {
        let memory = known_grid(5, 1, &[]);
        let mut ctx = context(&memory, Position::new(2, 0), &COOP);
        ctx.target = Some(Position::new(4, 0));
        let teammates = [Position::new(4, 0)];
        ctx.teammates = &teammates;
        assert_eq!(utility(&ctx, Position::new(3, 0)), 7);
    }

    #[test]
    fn ties_go_to_first_direction() {
        // Fully known and nothing to do: every move scores 0, frontier is
        // absent, so the first in-bounds direction (left) stands.
        let memory = known_grid(3, 3, &[]);
        let ctx = context(&memory, Position::new(1, 1), &COOP);
        assert_eq!(decide_action(&ctx), Some(Direction::Left));
    }

    #[test]
    fn heads_for_target() {
        let memory = known_grid(5, 5, &[]);
        let mut ctx = context(&memory, Position::new(2, 2), &COOP);
        ctx.target = Some(Position::new(2, 4));
        assert_eq!(decide_action(&ctx), Some(Direction::Down));
    }

    #[test]
    fn frontier_fallback_when_nothing_scores() {
        // Known corridor leading right into unexplored ground beyond the
        // vision range of every candidate.
        let grid = Grid::new(12, 1).unwrap();
        let mut memory = Memory::for_grid(&grid);
        for x in 0..=8 {
            memory.record(Position::new(x, 0), Cell::EMPTY).unwrap();
        }
        let ctx = context(&memory, Position::new(2, 0), &COOP);
        assert_eq!(decide_action(&ctx), Some(Direction::Right));
    }

    /// A fully remembered grid with one unexplored coordinate, far enough
    /// from the robot that no move gains discovery score.
    fn known_except(walls: &[Position], unknown: Position) -> Memory {
        let mut grid = Grid::new(12, 12).unwrap();
        for wall in walls {
            grid.set(*wall, Cell::Wall).unwrap();
        }
        let mut memory = Memory::for_grid(&grid);
        for pos in grid.layer().positions() {
            if pos != unknown {
                memory.record(pos, grid.get(pos).unwrap()).unwrap();
            }
        }
        memory
    }

    #[test]
    fn frontier_fallback_prefers_left_over_up() {
        let memory = known_except(&[], Position::new(0, 0));
        let ctx = context(&memory, Position::new(4, 4), &COOP);
        assert_eq!(decide_action(&ctx), Some(Direction::Left));
    }

    #[test]
    fn frontier_fallback_prefers_right_over_down() {
        // Left scores as well as anything, but only Right and Down approach
        // the frontier, and Right comes first.
        let memory = known_except(&[], Position::new(11, 11));
        let ctx = context(&memory, Position::new(4, 4), &COOP);
        assert_eq!(decide_action(&ctx), Some(Direction::Right));
    }

    #[test]
    fn frontier_fallback_skips_known_wall() {
        // Left would approach the frontier first but is a remembered wall.
        let memory = known_except(&[Position::new(3, 4)], Position::new(0, 0));
        let ctx = context(&memory, Position::new(4, 4), &COOP);
        assert_eq!(utility(&ctx, Position::new(3, 4)), -5);
        assert_eq!(decide_action(&ctx), Some(Direction::Up));
    }

    #[test]
    fn boxed_in_robot_idles() {
        let memory = known_grid(
            3,
            3,
            &[
                Position::new(0, 1),
                Position::new(2, 1),
                Position::new(1, 0),
                Position::new(1, 2),
            ],
        );
        let ctx = context(&memory, Position::new(1, 1), &COOP);
        assert_eq!(decide_action(&ctx), None);
    }

    #[test]
    fn single_cell_grid_has_no_moves() {
        let memory = known_grid(1, 1, &[]);
        let ctx = context(&memory, Position::new(0, 0), &COOP);
        assert_eq!(decide_action(&ctx), None);
    }
}
