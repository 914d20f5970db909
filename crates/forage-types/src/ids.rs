//! Type-safe identifier wrappers around `u32`.
//!
//! Robots and items are numbered in placement order by the maze generator,
//! which keeps identifiers stable across runs with the same seed. Wrapping
//! the raw index prevents accidentally passing an item where a robot is
//! expected.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create an identifier from its raw placement index.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Return the inner `u32` value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a robot in the simulation.
    RobotId, "robot"
}

define_id! {
    /// Unique identifier for an item placed in the maze.
    ItemId, "item"
}
