//! Team coordination: membership, knowledge, turn order, and score.
//!
//! A [`Team`] owns its robots and everything they know. The cooperative
//! team keeps one [`SharedKnowledge`] for all members; the self-interested
//! team keeps one [`PrivateKnowledge`] per member, aligned by index with
//! the robot list.
//!
//! Robots act one at a time in spawn order. A pickup clears its grid cell
//! before the next robot acts, so later robots in the same turn already
//! see the item gone.

use forage_agents::{
    AgentError, PrivateKnowledge, Robot, SharedKnowledge, TeamKnowledge, TurnContext, UtilityWeights,
};
use forage_types::{ItemRef, Position, RobotId, TeamKind};
use forage_world::{Grid, Memory, RobotSpawn};
use rust_decimal::Decimal;
use tracing::debug;

/// Where a team keeps its memory and discovered items.
#[derive(Debug, Clone)]
enum Knowledge {
    /// One store written by every member.
    Shared(SharedKnowledge),
    /// One store per member, same order as the robot list.
    Private(Vec<PrivateKnowledge>),
}

/// Items that changed hands during one team turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamTurn {
    /// Items picked up, in the order robots acted.
    pub pickups: Vec<ItemRef>,
    /// Items delivered, in the order robots acted.
    pub deliveries: Vec<ItemRef>,
}

/// A team of robots sharing a retrieval point and a score.
#[derive(Debug, Clone)]
pub struct Team {
    /// Cooperative or self-interested.
    kind: TeamKind,
    /// Members in turn order.
    robots: Vec<Robot>,
    /// Memory and discovered items.
    knowledge: Knowledge,
    /// Where members deliver items.
    retrieval: Position,
    /// Utility weights for every member.
    weights: UtilityWeights,
    /// Items delivered so far.
    score: u32,
}

impl Team {
    /// Form a team from `spawns` and let every member take its first look
    /// around and claim an initial target.
    ///
    /// Spawns belonging to the other team are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if initial observation or target claiming
    /// fails.
    pub fn new(
        kind: TeamKind,
        spawns: &[RobotSpawn],
        grid: &Grid,
        retrieval: Position,
        weights: UtilityWeights,
    ) -> Result<Self, AgentError> {
        let mut robots: Vec<Robot> = spawns
            .iter()
            .filter(|spawn| spawn.team == kind)
            .map(|spawn| Robot::new(spawn.id, kind, spawn.position))
            .collect();

        let knowledge = match kind {
            TeamKind::Cooperative => {
                let mut shared = SharedKnowledge::for_grid(grid);
                for robot in &mut robots {
                    robot.initialize(grid, &mut shared)?;
                }
                Knowledge::Shared(shared)
            }
            TeamKind::SelfInterested => {
                let mut stores = Vec::with_capacity(robots.len());
                for robot in &mut robots {
                    let mut own = PrivateKnowledge::for_grid(grid);
                    robot.initialize(grid, &mut own)?;
                    stores.push(own);
                }
                Knowledge::Private(stores)
            }
        };

        debug!(team = %kind, members = robots.len(), %retrieval, "team formed");
        Ok(Self {
            kind,
            robots,
            knowledge,
            retrieval,
            weights,
            score: 0,
        })
    }

    /// Run one turn for every member in order.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if a member's turn fails.
    pub fn turn(&mut self, grid: &mut Grid, density: Decimal) -> Result<TeamTurn, AgentError> {
        let mut report = TeamTurn::default();

        for index in 0..self.robots.len() {
            let teammates: Vec<Position> = self
                .robots
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != index)
                .map(|(_, robot)| robot.position)
                .collect();
            let ctx = TurnContext {
                retrieval: self.retrieval,
                teammates: &teammates,
                weights: &self.weights,
                density,
            };

            let Some(robot) = self.robots.get_mut(index) else {
                break;
            };
            let knowledge: &mut dyn TeamKnowledge = match &mut self.knowledge {
                Knowledge::Shared(shared) => shared,
                Knowledge::Private(stores) => stores
                    .get_mut(index)
                    .ok_or(AgentError::MissingKnowledge { robot: robot.id })?,
            };

            let outcome = robot.take_turn(grid, knowledge, &ctx)?;
            if let Some(item) = outcome.picked_up {
                grid.take_item(item.position);
                report.pickups.push(item);
            }
            if let Some(item) = outcome.delivered {
                self.score = self.score.saturating_add(1);
                report.deliveries.push(item);
            }
        }

        if !report.deliveries.is_empty() {
            debug!(team = %self.kind, score = self.score, "team scored");
        }
        Ok(report)
    }

    /// Items delivered so far.
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Members in turn order.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Where members deliver items.
    pub const fn retrieval(&self) -> Position {
        self.retrieval
    }

    /// Everything the team knows.
    ///
    /// For the cooperative team this is its shared memory. For the
    /// self-interested team it is the union of private memories, with the
    /// earliest member's value kept where they disagree. `None` for a team
    /// with no members and no shared memory.
    pub fn memory_view(&self) -> Option<Memory> {
        match &self.knowledge {
            Knowledge::Shared(shared) => Some(shared.memory().clone()),
            Knowledge::Private(stores) => {
                let (first, rest) = stores.split_first()?;
                let mut combined = first.memory().clone();
                for store in rest {
                    combined.merge_from(store.memory());
                }
                Some(combined)
            }
        }
    }

    /// The memory `robot` plans with, if it belongs to this team.
    pub fn robot_memory(&self, robot: RobotId) -> Option<Memory> {
        let index = self.robots.iter().position(|member| member.id == robot)?;
        match &self.knowledge {
            Knowledge::Shared(shared) => Some(shared.memory().clone()),
            Knowledge::Private(stores) => stores.get(index).map(|store| store.memory().clone()),
        }
    }

    /// Targets currently held by members, in member order.
    pub fn targets(&self) -> Vec<(RobotId, ItemRef)> {
        self.robots
            .iter()
            .filter_map(|robot| robot.target.map(|target| (robot.id, target)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forage_types::{Cell, ItemId};
    use rust_decimal_macros::dec;

    use super::*;

    fn spawn(raw: u32, team: TeamKind, x: i32, y: i32) -> RobotSpawn {
        RobotSpawn {
            id: RobotId::new(raw),
            team,
            position: Position::new(x, y),
        }
    }

    #[test]
    fn team_keeps_only_its_own_spawns() {
        let grid = Grid::new(6, 6).unwrap();
        let spawns = [
            spawn(0, TeamKind::Cooperative, 0, 0),
            spawn(1, TeamKind::SelfInterested, 5, 5),
            spawn(2, TeamKind::Cooperative, 1, 0),
        ];
        let team = Team::new(
            TeamKind::Cooperative,
            &spawns,
            &grid,
            Position::new(3, 3),
            UtilityWeights::cooperative(),
        )
        .unwrap();
        let ids: Vec<RobotId> = team.robots().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RobotId::new(0), RobotId::new(2)]);
        assert_eq!(team.score(), 0);
    }

    #[test]
    fn cooperative_init_claims_distinct_targets() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(Position::new(2, 0), Cell::Item(ItemId::new(0))).unwrap();
        grid.set(Position::new(2, 1), Cell::Item(ItemId::new(1))).unwrap();
        let spawns = [
            spawn(0, TeamKind::Cooperative, 0, 0),
            spawn(2, TeamKind::Cooperative, 0, 1),
        ];
        let team = Team::new(
            TeamKind::Cooperative,
            &spawns,
            &grid,
            Position::new(4, 4),
            UtilityWeights::cooperative(),
        )
        .unwrap();
        let targets = team.targets();
        assert_eq!(targets.len(), 2);
        assert_ne!(targets[0].1, targets[1].1);
    }

    #[test]
    fn self_interested_members_may_share_a_target() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(Position::new(2, 0), Cell::Item(ItemId::new(0))).unwrap();
        let spawns = [
            spawn(1, TeamKind::SelfInterested, 0, 0),
            spawn(3, TeamKind::SelfInterested, 1, 1),
        ];
        let team = Team::new(
            TeamKind::SelfInterested,
            &spawns,
            &grid,
            Position::new(4, 4),
            UtilityWeights::self_interested(),
        )
        .unwrap();
        let targets = team.targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].1, targets[1].1);
    }

    #[test]
    fn pickup_clears_grid_within_the_turn() {
        let mut grid = Grid::new(4, 1).unwrap();
        let item = Position::new(1, 0);
        grid.set(item, Cell::Item(ItemId::new(0))).unwrap();
        let spawns = [spawn(0, TeamKind::Cooperative, 0, 0)];
        let mut team = Team::new(
            TeamKind::Cooperative,
            &spawns,
            &grid,
            Position::new(3, 0),
            UtilityWeights::cooperative(),
        )
        .unwrap();

        let report = team.turn(&mut grid, dec!(1.3)).unwrap();
        assert_eq!(report.pickups.len(), 1);
        assert_eq!(grid.get(item), Some(Cell::EMPTY));
        assert!(grid.items().is_empty());
    }

    #[test]
    fn combined_view_unions_private_memories() {
        let grid = Grid::new(12, 1).unwrap();
        let spawns = [
            spawn(1, TeamKind::SelfInterested, 0, 0),
            spawn(3, TeamKind::SelfInterested, 11, 0),
        ];
        let team = Team::new(
            TeamKind::SelfInterested,
            &spawns,
            &grid,
            Position::new(6, 0),
            UtilityWeights::self_interested(),
        )
        .unwrap();

        let first = team.robot_memory(RobotId::new(1)).unwrap();
        assert_eq!(first.unknown_count(), 9);
        let combined = team.memory_view().unwrap();
        assert_eq!(combined.unknown_count(), 6);
        assert_eq!(team.robot_memory(RobotId::new(0)), None);
    }
}
