//! Driving games to the end and aggregating many of them.

use forage_types::TeamKind;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::simulation::SimulationState;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every item was delivered.
    Completed,
    /// The turn limit was reached with items remaining.
    TurnLimit,
}

/// Final state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Why the run stopped.
    pub end_reason: EndReason,
    /// Turns played.
    pub turns: u64,
    /// Scores in [`TeamKind::ALL`] order.
    pub scores: [u32; 2],
}

impl SimulationResult {
    /// The team with the strictly higher score, or `None` on a draw.
    pub const fn winner(&self) -> Option<TeamKind> {
        let [cooperative, self_interested] = self.scores;
        if cooperative > self_interested {
            Some(TeamKind::Cooperative)
        } else if self_interested > cooperative {
            Some(TeamKind::SelfInterested)
        } else {
            None
        }
    }
}

/// Win counts and totals over a batch of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Runs played.
    pub runs: u32,
    /// Runs the cooperative team won.
    pub team1_wins: u32,
    /// Runs the self-interested team won.
    pub team2_wins: u32,
    /// Runs with equal scores.
    pub draws: u32,
    /// Items delivered by the cooperative team across all runs.
    pub team1_total_score: u64,
    /// Items delivered by the self-interested team across all runs.
    pub team2_total_score: u64,
    /// Turns played across all runs.
    pub total_turns: u64,
    /// Runs stopped by the turn limit.
    pub turn_limited: u32,
}

impl BatchSummary {
    /// Fold one finished run into the totals.
    fn record(&mut self, result: &SimulationResult) {
        self.runs = self.runs.saturating_add(1);
        match result.winner() {
            Some(TeamKind::Cooperative) => self.team1_wins = self.team1_wins.saturating_add(1),
            Some(TeamKind::SelfInterested) => self.team2_wins = self.team2_wins.saturating_add(1),
            None => self.draws = self.draws.saturating_add(1),
        }
        let [cooperative, self_interested] = result.scores;
        self.team1_total_score = self.team1_total_score.saturating_add(u64::from(cooperative));
        self.team2_total_score = self
            .team2_total_score
            .saturating_add(u64::from(self_interested));
        self.total_turns = self.total_turns.saturating_add(result.turns);
        if result.end_reason == EndReason::TurnLimit {
            self.turn_limited = self.turn_limited.saturating_add(1);
        }
    }
}

/// Advance `state` until every item is delivered or `max_turns` turns have
/// been played in total.
///
/// # Errors
///
/// Returns [`SimulationError`] if a turn fails.
pub fn run_to_completion(
    state: &mut SimulationState,
    max_turns: u64,
) -> Result<SimulationResult, SimulationError> {
    while !state.is_complete() && state.turns() < max_turns {
        state.turn()?;
    }

    let end_reason = if state.is_complete() {
        EndReason::Completed
    } else {
        warn!(
            turns = state.turns(),
            remaining = state.grid().items().len(),
            "turn limit reached with items remaining"
        );
        EndReason::TurnLimit
    };

    Ok(SimulationResult {
        end_reason,
        turns: state.turns(),
        scores: state.scores(),
    })
}

/// Play `runs` independent games and tally the outcomes.
///
/// Run `i` is seeded with `world.seed + i` (wrapping), so a batch is
/// reproducible and its runs differ from one another.
///
/// # Errors
///
/// Returns [`SimulationError::Config`] for unusable configuration, or the
/// first error raised by any run.
pub fn run_batch(config: &SimulationConfig, runs: u32) -> Result<BatchSummary, SimulationError> {
    config.validate()?;
    let mut summary = BatchSummary::default();

    for run in 0..runs {
        let mut per_run = config.clone();
        per_run.world.seed = config.world.seed.wrapping_add(u64::from(run));
        let mut state = SimulationState::generate(&per_run)?;
        let result = run_to_completion(&mut state, config.batch.max_turns)?;
        summary.record(&result);
    }

    info!(
        runs = summary.runs,
        team1_wins = summary.team1_wins,
        team2_wins = summary.team2_wins,
        draws = summary.draws,
        turn_limited = summary.turn_limited,
        "batch complete"
    );
    Ok(summary)
}
