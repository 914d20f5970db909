//! The complete state of one game: the grid and both teams.
//!
//! Each [`SimulationState::turn`] runs the cooperative team, then the
//! self-interested team, against the same grid. Turn execution uses no
//! randomness; all of it is spent during generation.

use forage_agents::BehaviorConfig;
use forage_types::{RobotId, TeamKind};
use forage_world::{Grid, MazeSpec, Memory, RobotSpawn, generate_maze};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::team::Team;

/// Whose knowledge to snapshot with [`SimulationState::memory_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observer {
    /// Everything a team knows.
    Team(TeamKind),
    /// The memory one robot plans with.
    Robot(RobotId),
}

/// What one call to [`SimulationState::turn`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// One-based number of the turn just played.
    pub turn: u64,
    /// Scores in [`TeamKind::ALL`] order after the turn.
    pub scores: [u32; 2],
    /// Items picked up during the turn.
    pub pickups: usize,
    /// Items delivered during the turn.
    pub deliveries: usize,
    /// Whether this turn delivered the last item.
    pub completed: bool,
}

/// A running game.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Ground truth shared by every robot.
    grid: Grid,
    /// Both teams, in [`TeamKind::ALL`] order.
    teams: [Team; 2],
    /// Turns played so far.
    turn: u64,
    /// Items on the grid when the game began.
    total_items: u32,
    /// Density coefficient used by path estimates.
    density: Decimal,
}

impl SimulationState {
    /// Generate a game from `config`, seeding randomness from `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] for unusable configuration, or
    /// another [`SimulationError`] if generation or team setup fails.
    pub fn generate(config: &SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        Self::generate_with(&config.maze.to_spec(), &config.behavior, &mut rng)
    }

    /// Generate a game from explicit parameters and a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationError`] if generation or team setup fails.
    pub fn generate_with(
        spec: &MazeSpec,
        behavior: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, SimulationError> {
        let maze = generate_maze(spec, rng)?;
        info!(
            width = spec.width,
            height = spec.height,
            items = maze.items.len(),
            robots = maze.spawns.len(),
            walls = maze.stats.walls_placed,
            "maze generated"
        );
        Self::from_layout(maze.grid, &maze.spawns, behavior, spec.density)
    }

    /// Start a game on a prepared grid.
    ///
    /// Delivery points are read from the grid's tags. Robots observe their
    /// surroundings and claim initial targets immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::MissingDeliveryPoint`] if either team has
    /// no tagged delivery point, or [`SimulationError::Agent`] if team setup
    /// fails.
    pub fn from_layout(
        grid: Grid,
        spawns: &[RobotSpawn],
        behavior: &BehaviorConfig,
        density: Decimal,
    ) -> Result<Self, SimulationError> {
        let form = |kind: TeamKind| -> Result<Team, SimulationError> {
            let retrieval = grid
                .delivery_point(kind)
                .ok_or(SimulationError::MissingDeliveryPoint(kind))?;
            Ok(Team::new(kind, spawns, &grid, retrieval, *behavior.weights(kind))?)
        };
        let teams = [form(TeamKind::Cooperative)?, form(TeamKind::SelfInterested)?];
        let total_items = u32::try_from(grid.items().len()).unwrap_or(u32::MAX);

        Ok(Self {
            grid,
            teams,
            turn: 0,
            total_items,
            density,
        })
    }

    /// Advance both teams by one turn, cooperative first.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Agent`] if a robot's turn fails.
    pub fn turn(&mut self) -> Result<TurnSummary, SimulationError> {
        let was_complete = self.is_complete();
        self.turn = self.turn.saturating_add(1);

        let mut pickups = 0_usize;
        let mut deliveries = 0_usize;
        for team in &mut self.teams {
            let report = team.turn(&mut self.grid, self.density)?;
            pickups = pickups.saturating_add(report.pickups.len());
            deliveries = deliveries.saturating_add(report.deliveries.len());
        }

        let summary = TurnSummary {
            turn: self.turn,
            scores: self.scores(),
            pickups,
            deliveries,
            completed: !was_complete && self.is_complete(),
        };
        debug!(
            turn = summary.turn,
            cooperative = summary.scores[0],
            self_interested = summary.scores[1],
            pickups,
            deliveries,
            "turn complete"
        );
        Ok(summary)
    }

    /// Items delivered by `team`.
    pub const fn score(&self, team: TeamKind) -> u32 {
        self.team(team).score()
    }

    /// Scores in [`TeamKind::ALL`] order.
    pub const fn scores(&self) -> [u32; 2] {
        [self.teams[0].score(), self.teams[1].score()]
    }

    /// A snapshot of what `observer` knows, or `None` for an unknown robot
    /// or an empty self-interested team.
    pub fn memory_view(&self, observer: Observer) -> Option<Memory> {
        match observer {
            Observer::Team(kind) => self.team(kind).memory_view(),
            Observer::Robot(id) => self.teams.iter().find_map(|team| team.robot_memory(id)),
        }
    }

    /// Whether every item that started on the grid has been delivered.
    pub const fn is_complete(&self) -> bool {
        let [a, b] = self.scores();
        a.saturating_add(b) >= self.total_items
    }

    /// The team of `kind`.
    pub const fn team(&self, kind: TeamKind) -> &Team {
        match kind {
            TeamKind::Cooperative => &self.teams[0],
            TeamKind::SelfInterested => &self.teams[1],
        }
    }

    /// Ground truth as of the last turn.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Turns played so far.
    pub const fn turns(&self) -> u64 {
        self.turn
    }

    /// Items on the grid when the game began.
    pub const fn total_items(&self) -> u32 {
        self.total_items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forage_types::{Cell, ItemId, Position};
    use rust_decimal_macros::dec;

    use super::*;

    fn tagged(grid: &mut Grid, pos: Position, team: TeamKind) {
        grid.set(pos, Cell::Empty { delivery: Some(team) }).unwrap();
    }

    #[test]
    fn generate_is_deterministic_per_seed() {
        let config = SimulationConfig::default();
        let a = SimulationState::generate(&config).unwrap();
        let b = SimulationState::generate(&config).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.total_items(), 10);
        assert_eq!(a.team(TeamKind::Cooperative).robots().len(), 2);
        assert_eq!(a.team(TeamKind::SelfInterested).robots().len(), 2);
    }

    #[test]
    fn generate_rejects_invalid_config() {
        let mut config = SimulationConfig::default();
        config.maze.density = dec!(3);
        assert!(matches!(
            SimulationState::generate(&config),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn missing_delivery_point_is_reported() {
        let mut grid = Grid::new(4, 4).unwrap();
        tagged(&mut grid, Position::new(0, 0), TeamKind::Cooperative);
        let result = SimulationState::from_layout(grid, &[], &BehaviorConfig::default(), dec!(1));
        assert!(matches!(
            result,
            Err(SimulationError::MissingDeliveryPoint(TeamKind::SelfInterested))
        ));
    }

    #[test]
    fn no_items_means_complete_from_the_start() {
        let mut grid = Grid::new(4, 4).unwrap();
        tagged(&mut grid, Position::new(0, 0), TeamKind::Cooperative);
        tagged(&mut grid, Position::new(3, 3), TeamKind::SelfInterested);
        let state = SimulationState::from_layout(grid, &[], &BehaviorConfig::default(), dec!(1)).unwrap();
        assert!(state.is_complete());
        assert_eq!(state.scores(), [0, 0]);
    }

    #[test]
    fn memory_views_by_team_and_robot() {
        let mut grid = Grid::new(10, 10).unwrap();
        tagged(&mut grid, Position::new(0, 9), TeamKind::Cooperative);
        tagged(&mut grid, Position::new(9, 9), TeamKind::SelfInterested);
        grid.set(Position::new(5, 5), Cell::Item(ItemId::new(0))).unwrap();
        let spawns = [
            RobotSpawn {
                id: RobotId::new(0),
                team: TeamKind::Cooperative,
                position: Position::new(0, 0),
            },
            RobotSpawn {
                id: RobotId::new(1),
                team: TeamKind::SelfInterested,
                position: Position::new(9, 0),
            },
        ];
        let state = SimulationState::from_layout(grid, &spawns, &BehaviorConfig::default(), dec!(1.3)).unwrap();

        let coop = state.memory_view(Observer::Team(TeamKind::Cooperative)).unwrap();
        assert_eq!(coop.unknown_count(), 100 - 9);
        assert_eq!(
            state.memory_view(Observer::Robot(RobotId::new(0))),
            Some(coop)
        );
        let selfish = state.memory_view(Observer::Robot(RobotId::new(1))).unwrap();
        assert!(!selfish.is_unknown(Position::new(9, 0)));
        assert!(selfish.is_unknown(Position::new(0, 0)));
        assert_eq!(state.memory_view(Observer::Robot(RobotId::new(7))), None);
    }

    #[test]
    fn turn_counts_up() {
        let mut state = SimulationState::generate(&SimulationConfig::default()).unwrap();
        let first = state.turn().unwrap();
        let second = state.turn().unwrap();
        assert_eq!(first.turn, 1);
        assert_eq!(second.turn, 2);
        assert_eq!(state.turns(), 2);
    }
}
