//! Robot state and the per-turn action sequence.
//!
//! A turn runs in a fixed order:
//!
//! 1. Choose a move with [`decide_action`] and, if one was chosen, step and
//!    observe from the new position.
//! 2. Release the current target if memory no longer shows it.
//! 3. With neither target nor cargo, claim a new target.
//! 4. Standing on the target, pick it up. Otherwise, carrying and standing
//!    on the retrieval point, deliver.
//!
//! The robot never mutates the grid. A pickup is reported through
//! [`TurnOutcome::picked_up`] and the caller clears the cell.

use forage_types::{Cell, Direction, ItemRef, Position, RobotId, TeamKind};
use forage_world::Grid;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UtilityWeights;
use crate::decision::{DecisionContext, decide_action};
use crate::error::AgentError;
use crate::knowledge::TeamKnowledge;
use crate::perception::observe;

/// One foraging robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    /// Stable identity.
    pub id: RobotId,
    /// Team membership, fixed at spawn.
    pub team: TeamKind,
    /// Current coordinate.
    pub position: Position,
    /// The item being carried, if any.
    pub carrying: Option<ItemRef>,
    /// The item being pursued, if any. Never set while carrying.
    pub target: Option<ItemRef>,
}

/// Team-level inputs for one robot's turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    /// The team's delivery point.
    pub retrieval: Position,
    /// Positions of the other robots on the team, as of this robot's turn.
    pub teammates: &'a [Position],
    /// Team-specific score adjustments.
    pub weights: &'a UtilityWeights,
    /// Density coefficient used by path estimates.
    pub density: Decimal,
}

/// What happened during one robot's turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// The direction moved, if the robot moved.
    pub moved: Option<Direction>,
    /// The item picked up; its grid cell must be cleared by the caller.
    pub picked_up: Option<ItemRef>,
    /// The item delivered to the retrieval point.
    pub delivered: Option<ItemRef>,
}

impl Robot {
    /// A robot with no cargo and no target.
    pub const fn new(id: RobotId, team: TeamKind, position: Position) -> Self {
        Self {
            id,
            team,
            position,
            carrying: None,
            target: None,
        }
    }

    /// Record everything visible from the current position and add any
    /// items in view to the discovered pool.
    ///
    /// Returns the number of items newly added to the pool.
    pub fn observe(&self, grid: &Grid, knowledge: &mut dyn TeamKnowledge) -> Result<usize, AgentError> {
        let seen = observe(grid, knowledge.memory_mut(), self.position)?;
        let mut added = 0_usize;
        for item in seen {
            if knowledge.record_sighting(item) {
                debug!(robot = %self.id, item = %item.id, position = %item.position, "item discovered");
                added = added.saturating_add(1);
            }
        }
        Ok(added)
    }

    /// Initial look around plus a first target claim, run once at spawn.
    pub fn initialize(&mut self, grid: &Grid, knowledge: &mut dyn TeamKnowledge) -> Result<(), AgentError> {
        self.observe(grid, knowledge)?;
        if self.target.is_none() && self.carrying.is_none() {
            self.target = knowledge.claim_target(self.id)?;
        }
        Ok(())
    }

    /// Take one turn.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the team's reservation bookkeeping is
    /// inconsistent or an observation falls outside the memory.
    pub fn take_turn(
        &mut self,
        grid: &Grid,
        knowledge: &mut dyn TeamKnowledge,
        ctx: &TurnContext<'_>,
    ) -> Result<TurnOutcome, AgentError> {
        let mut outcome = TurnOutcome::default();

        let decision = decide_action(&DecisionContext {
            memory: knowledge.memory(),
            position: self.position,
            target: self.target.map(|item| item.position),
            carrying: self.carrying.is_some(),
            retrieval: ctx.retrieval,
            teammates: ctx.teammates,
            weights: ctx.weights,
            density: ctx.density,
        });
        if let Some(direction) = decision {
            self.position = self.position.step(direction);
            outcome.moved = Some(direction);
            self.observe(grid, knowledge)?;
        }

        if let Some(target) = self.target {
            let still_there = knowledge
                .memory()
                .get(target.position)
                .is_some_and(|cell| cell.shows_item(target.id));
            if !still_there {
                debug!(robot = %self.id, item = %target.id, "target vanished, releasing");
                knowledge.forget(target.id);
                self.target = None;
            }
        }

        if self.target.is_none() && self.carrying.is_none() {
            self.target = knowledge.claim_target(self.id)?;
        }

        if let Some(target) = self.target {
            let on_target = target.position == self.position
                && grid.get(self.position).and_then(Cell::item) == Some(target.id);
            if on_target {
                knowledge.forget(target.id);
                self.carrying = Some(target);
                self.target = None;
                outcome.picked_up = Some(target);
                debug!(robot = %self.id, item = %target.id, "item picked up");
            }
        } else if self.position == ctx.retrieval {
            if let Some(item) = self.carrying.take() {
                outcome.delivered = Some(item);
                debug!(robot = %self.id, item = %item.id, team = %self.team, "item delivered");
            }
        }

        Ok(outcome)
    }
}
