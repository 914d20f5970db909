//! Enumeration types for the Forage simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// The two competing teams, which double as the robot behavior variant.
///
/// Cooperative robots share one memory grid and a reserved pool of
/// discovered items. Self-interested robots keep private memories and
/// chase whatever they personally saw first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamKind {
    /// Team 1: shared memory, coordinated target reservation.
    Cooperative,
    /// Team 2: private memory, no coordination.
    SelfInterested,
}

impl TeamKind {
    /// Both teams in turn order.
    pub const ALL: [Self; 2] = [Self::Cooperative, Self::SelfInterested];

    /// Team kind for the `index`-th generated robot (even: cooperative).
    pub const fn for_spawn_index(index: u32) -> Self {
        if index % 2 == 0 {
            Self::Cooperative
        } else {
            Self::SelfInterested
        }
    }

    /// Short lowercase label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cooperative => "cooperative",
            Self::SelfInterested => "self_interested",
        }
    }
}

impl core::fmt::Display for TeamKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// One of the four orthogonal moves.
///
/// `Up` decreases `y`, `Down` increases it, matching row-major screen
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `x - 1`
    Left,
    /// `x + 1`
    Right,
    /// `y - 1`
    Up,
    /// `y + 1`
    Down,
}

impl Direction {
    /// Evaluation order for move decisions. Earlier entries win ties.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Coordinate delta `(dx, dy)` of this move.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}
