//! Tunable utility weights for the two robot behaviors.
//!
//! The cooperative and self-interested teams share one utility function
//! and differ only in these numbers. Defaults reproduce the reference
//! behavior, including the asymmetric out-of-bounds penalty of the
//! self-interested team. The engine reads overrides from the `behavior`
//! section of `forage-config.yaml`.

use forage_types::TeamKind;
use serde::{Deserialize, Serialize};

/// Score adjustments applied by [`utility`](crate::decision::utility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityWeights {
    /// Score of a move off the grid (cooperative: -5, self-interested: -1).
    pub out_of_bounds_penalty: i32,

    /// Score of a move into a remembered wall (default: -5).
    pub wall_penalty: i32,

    /// Bonus for stepping onto the target item (default: 12).
    pub target_reached_bonus: i32,

    /// Bonus for shortening the estimated path to the target
    /// (cooperative: 8, self-interested: 4).
    pub target_progress_bonus: i32,

    /// Bonus for stepping onto the retrieval point while carrying (default: 10).
    pub delivery_bonus: i32,

    /// Bonus for shortening the estimated path to the retrieval point
    /// while carrying (default: 7).
    pub delivery_progress_bonus: i32,

    /// Upper bound on the congestion deduction (default: 3).
    pub congestion_cap: u32,

    /// Unknown cells around a candidate are divided by this before being
    /// added as an exploration bonus (default: 1). Zero is treated as 1.
    pub discovery_divisor: u32,

    /// A best utility strictly below this leaves the robot idle (default: -4).
    pub idle_threshold: i32,
}

impl UtilityWeights {
    /// Defaults for the cooperative team.
    pub const fn cooperative() -> Self {
        Self {
            out_of_bounds_penalty: -5,
            wall_penalty: -5,
            target_reached_bonus: 12,
            target_progress_bonus: 8,
            delivery_bonus: 10,
            delivery_progress_bonus: 7,
            congestion_cap: 3,
            discovery_divisor: 1,
            idle_threshold: -4,
        }
    }

    /// Defaults for the self-interested team.
    pub const fn self_interested() -> Self {
        Self {
            out_of_bounds_penalty: -1,
            target_progress_bonus: 4,
            ..Self::cooperative()
        }
    }
}

/// Utility weights for both teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Weights used by cooperative robots.
    #[serde(default = "UtilityWeights::cooperative")]
    pub cooperative: UtilityWeights,

    /// Weights used by self-interested robots.
    #[serde(default = "UtilityWeights::self_interested")]
    pub self_interested: UtilityWeights,
}

impl BehaviorConfig {
    /// The weights for `team`.
    pub const fn weights(&self, team: TeamKind) -> &UtilityWeights {
        match team {
            TeamKind::Cooperative => &self.cooperative,
            TeamKind::SelfInterested => &self.self_interested,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            cooperative: UtilityWeights::cooperative(),
            self_interested: UtilityWeights::self_interested(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn teams_differ_only_in_penalty_and_progress() {
        let coop = UtilityWeights::cooperative();
        let selfish = UtilityWeights::self_interested();
        assert_eq!(coop.out_of_bounds_penalty, -5);
        assert_eq!(selfish.out_of_bounds_penalty, -1);
        assert_eq!(coop.target_progress_bonus, 8);
        assert_eq!(selfish.target_progress_bonus, 4);
        assert_eq!(
            UtilityWeights {
                out_of_bounds_penalty: coop.out_of_bounds_penalty,
                target_progress_bonus: coop.target_progress_bonus,
                ..selfish
            },
            coop
        );
    }

    #[test]
    fn missing_team_section_uses_defaults() {
        let yaml = "\
self_interested:
  out_of_bounds_penalty: -2
  wall_penalty: -5
  target_reached_bonus: 12
  target_progress_bonus: 6
  delivery_bonus: 10
  delivery_progress_bonus: 7
  congestion_cap: 3
  discovery_divisor: 2
  idle_threshold: -4
";
        let config: BehaviorConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.cooperative, UtilityWeights::cooperative());
        assert_eq!(config.weights(TeamKind::SelfInterested).target_progress_bonus, 6);
        assert_eq!(config.self_interested.discovery_divisor, 2);
    }
}
