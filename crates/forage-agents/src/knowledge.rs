//! What a robot knows: a memory grid plus a pool of discovered items.
//!
//! Cooperative robots share one [`SharedKnowledge`] per team, including a
//! reservation table so no two teammates chase the same item. Each
//! self-interested robot owns a [`PrivateKnowledge`] and claims targets
//! without consulting anyone.
//!
//! Items are held by value as [`ItemRef`]s keyed by [`ItemId`]; a pool
//! entry is dropped when its item is picked up or found missing.

use std::collections::BTreeMap;

use forage_types::{ItemId, ItemRef, RobotId};
use forage_world::{Grid, Memory};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AgentError;

/// Memory and discovered items as seen by one robot.
///
/// The same trait fronts both the team-wide store of the cooperative team
/// and the per-robot store of the self-interested team.
pub trait TeamKnowledge {
    /// The memory the robot plans with.
    fn memory(&self) -> &Memory;

    /// Mutable access for recording observations.
    fn memory_mut(&mut self) -> &mut Memory;

    /// Add `item` to the discovered pool unless already tracked.
    ///
    /// Returns `true` if the item was new.
    fn record_sighting(&mut self, item: ItemRef) -> bool;

    /// Pick a target for `robot` from the discovered pool.
    ///
    /// Returns `Ok(None)` when nothing is available.
    fn claim_target(&mut self, robot: RobotId) -> Result<Option<ItemRef>, AgentError>;

    /// Drop `item` from the pool and any reservation on it.
    ///
    /// Called both when an item is picked up and when a target is found
    /// to have vanished.
    fn forget(&mut self, item: ItemId);

    /// Items currently in the discovered pool, in discovery order.
    fn discovered(&self) -> &[ItemRef];
}

// ---------------------------------------------------------------------------
// Shared (cooperative) knowledge
// ---------------------------------------------------------------------------

/// Team-wide memory, item pool, and target reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedKnowledge {
    /// Team memory written by every member.
    memory: Memory,
    /// Discovered items not yet picked up, in discovery order.
    pool: Vec<ItemRef>,
    /// Which teammate is pursuing which item.
    reservations: BTreeMap<ItemId, RobotId>,
}

impl SharedKnowledge {
    /// Blank knowledge sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            memory: Memory::for_grid(grid),
            pool: Vec::new(),
            reservations: BTreeMap::new(),
        }
    }

    /// Reserve `item` for `robot`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ReservationConflict`] if another robot holds
    /// `item`, or [`AgentError::DuplicateClaim`] if `robot` already holds
    /// a different item.
    pub fn reserve(&mut self, item: ItemId, robot: RobotId) -> Result<(), AgentError> {
        if let Some(&holder) = self.reservations.get(&item) {
            if holder == robot {
                return Ok(());
            }
            return Err(AgentError::ReservationConflict {
                item,
                holder,
                claimant: robot,
            });
        }
        if let Some(held) = self.reservation_of(robot) {
            return Err(AgentError::DuplicateClaim { robot, held });
        }
        self.reservations.insert(item, robot);
        Ok(())
    }

    /// The robot holding a reservation on `item`, if any.
    pub fn holder_of(&self, item: ItemId) -> Option<RobotId> {
        self.reservations.get(&item).copied()
    }

    /// The item `robot` has reserved, if any.
    pub fn reservation_of(&self, robot: RobotId) -> Option<ItemId> {
        self.reservations
            .iter()
            .find(|&(_, &holder)| holder == robot)
            .map(|(&item, _)| item)
    }
}

impl TeamKnowledge for SharedKnowledge {
    fn memory(&self) -> &Memory {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    fn record_sighting(&mut self, item: ItemRef) -> bool {
        if self.pool.iter().any(|known| known.id == item.id) {
            return false;
        }
        self.pool.push(item);
        true
    }

    fn claim_target(&mut self, robot: RobotId) -> Result<Option<ItemRef>, AgentError> {
        let Some(item) = self
            .pool
            .iter()
            .find(|candidate| !self.reservations.contains_key(&candidate.id))
            .copied()
        else {
            return Ok(None);
        };
        self.reserve(item.id, robot)?;
        debug!(%robot, item = %item.id, position = %item.position, "target reserved");
        Ok(Some(item))
    }

    fn forget(&mut self, item: ItemId) {
        self.pool.retain(|known| known.id != item);
        self.reservations.remove(&item);
    }

    fn discovered(&self) -> &[ItemRef] {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Private (self-interested) knowledge
// ---------------------------------------------------------------------------

/// One robot's own memory and item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKnowledge {
    /// Memory written only by the owning robot.
    memory: Memory,
    /// Items this robot has seen and not yet dropped, in discovery order.
    items: Vec<ItemRef>,
}

impl PrivateKnowledge {
    /// Blank knowledge sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            memory: Memory::for_grid(grid),
            items: Vec::new(),
        }
    }
}

impl TeamKnowledge for PrivateKnowledge {
    fn memory(&self) -> &Memory {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    fn record_sighting(&mut self, item: ItemRef) -> bool {
        if self.items.iter().any(|known| known.id == item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    fn claim_target(&mut self, _robot: RobotId) -> Result<Option<ItemRef>, AgentError> {
        Ok(self.items.first().copied())
    }

    fn forget(&mut self, item: ItemId) {
        self.items.retain(|known| known.id != item);
    }

    fn discovered(&self) -> &[ItemRef] {
        &self.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forage_types::Position;

    use super::*;

    fn item(raw: u32) -> ItemRef {
        ItemRef::new(ItemId::new(raw), Position::new(i32::try_from(raw).unwrap(), 0))
    }

    fn shared() -> SharedKnowledge {
        SharedKnowledge::for_grid(&Grid::new(8, 8).unwrap())
    }

    #[test]
    fn sightings_are_deduplicated() {
        let mut knowledge = shared();
        assert!(knowledge.record_sighting(item(1)));
        assert!(!knowledge.record_sighting(item(1)));
        assert!(knowledge.record_sighting(item(2)));
        assert_eq!(knowledge.discovered(), &[item(1), item(2)]);
    }

    #[test]
    fn shared_claims_first_unreserved() {
        let mut knowledge = shared();
        knowledge.record_sighting(item(1));
        knowledge.record_sighting(item(2));
        let a = RobotId::new(0);
        let b = RobotId::new(2);
        let c = RobotId::new(4);

        assert_eq!(knowledge.claim_target(a).unwrap(), Some(item(1)));
        assert_eq!(knowledge.claim_target(b).unwrap(), Some(item(2)));
        assert_eq!(knowledge.claim_target(c).unwrap(), None);
        assert_eq!(knowledge.holder_of(ItemId::new(2)), Some(b));
        assert_eq!(knowledge.reservation_of(a), Some(ItemId::new(1)));
    }

    #[test]
    fn shared_rejects_double_claims() {
        let mut knowledge = shared();
        knowledge.record_sighting(item(1));
        knowledge.record_sighting(item(2));
        let a = RobotId::new(0);
        knowledge.claim_target(a).unwrap();
        assert!(matches!(
            knowledge.claim_target(a),
            Err(AgentError::DuplicateClaim { .. })
        ));
        assert!(matches!(
            knowledge.reserve(ItemId::new(1), RobotId::new(2)),
            Err(AgentError::ReservationConflict { .. })
        ));
    }

    #[test]
    fn forget_frees_reservation() {
        let mut knowledge = shared();
        knowledge.record_sighting(item(1));
        let a = RobotId::new(0);
        knowledge.claim_target(a).unwrap();
        knowledge.forget(ItemId::new(1));
        assert!(knowledge.discovered().is_empty());
        assert_eq!(knowledge.reservation_of(a), None);

        knowledge.record_sighting(item(3));
        assert_eq!(knowledge.claim_target(a).unwrap(), Some(item(3)));
    }

    #[test]
    fn private_claims_first_unconditionally() {
        let mut knowledge = PrivateKnowledge::for_grid(&Grid::new(4, 4).unwrap());
        assert_eq!(knowledge.claim_target(RobotId::new(1)).unwrap(), None);
        knowledge.record_sighting(item(2));
        knowledge.record_sighting(item(1));
        assert_eq!(knowledge.claim_target(RobotId::new(1)).unwrap(), Some(item(2)));
        assert_eq!(knowledge.claim_target(RobotId::new(1)).unwrap(), Some(item(2)));
        knowledge.forget(ItemId::new(2));
        assert_eq!(knowledge.claim_target(RobotId::new(1)).unwrap(), Some(item(1)));
    }
}
