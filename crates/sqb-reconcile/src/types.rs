use serde::Serialize;
use sqb_schemas::{PlayerId, Position, SavedSlot, SlotId, SquadId, SquadSlot, MAX_SQUAD_SLOTS};
use std::collections::BTreeSet;

use crate::CompositionError;

/// Persistence status of a squad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PersistStatus {
    /// No server id yet; the next save creates the squad first.
    Unsaved,
    /// Squad exists on the backend; saves are incremental.
    Saved(SquadId),
}

impl PersistStatus {
    pub fn squad_id(&self) -> Option<SquadId> {
        match self {
            PersistStatus::Unsaved => None,
            PersistStatus::Saved(id) => Some(*id),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, PersistStatus::Saved(_))
    }
}

/// The desired roster: ordered slots, unique by `player_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    slots: Vec<SquadSlot>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[SquadSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= MAX_SQUAD_SLOTS
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.get(player_id).is_some()
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&SquadSlot> {
        self.slots.iter().find(|s| s.player_id == player_id)
    }

    pub fn player_ids(&self) -> BTreeSet<PlayerId> {
        self.slots.iter().map(|s| s.player_id).collect()
    }

    /// Append a slot, enforcing the 11-slot cap and `player_id` uniqueness.
    pub fn try_add(&mut self, slot: SquadSlot) -> Result<(), CompositionError> {
        if self.is_full() {
            return Err(CompositionError::SquadFull {
                max: MAX_SQUAD_SLOTS,
            });
        }
        if self.contains(slot.player_id) {
            return Err(CompositionError::AlreadyInSquad {
                player_id: slot.player_id,
            });
        }
        self.slots.push(slot);
        Ok(())
    }

    pub fn remove(&mut self, player_id: PlayerId) -> Option<SquadSlot> {
        let idx = self.slots.iter().position(|s| s.player_id == player_id)?;
        Some(self.slots.remove(idx))
    }

    /// Change the position of the slot holding `player_id`.
    /// Returns `false` when the player is not in the roster.
    pub fn set_position(&mut self, player_id: PlayerId, position: Position) -> bool {
        match self.slots.iter_mut().find(|s| s.player_id == player_id) {
            Some(slot) => {
                slot.position = position;
                true
            }
            None => false,
        }
    }

    /// Stamp the server id onto the slot holding `player_id`, if still present.
    pub fn assign_id(&mut self, player_id: PlayerId, id: SlotId) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.player_id == player_id) {
            slot.id = Some(id);
        }
    }
}

/// The saved roster: the last slot set confirmed on the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SavedRoster {
    slots: Vec<SavedSlot>,
}

impl SavedRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Vec<SavedSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[SavedSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&SavedSlot> {
        self.slots.iter().find(|s| s.player_id == player_id)
    }

    /// Merge a confirmed create.
    pub fn record_created(&mut self, slot: SavedSlot) {
        match self.slots.iter_mut().find(|s| s.id == slot.id) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
    }

    /// Merge a confirmed update (matched by server id).
    pub fn record_updated(&mut self, slot: &SavedSlot) {
        if let Some(existing) = self.slots.iter_mut().find(|s| s.id == slot.id) {
            existing.position = slot.position;
        }
    }

    /// Merge a confirmed delete.
    pub fn record_deleted(&mut self, id: SlotId) {
        self.slots.retain(|s| s.id != id);
    }
}

/// Desired and saved rosters held as one value so the diff between them is
/// a pure function of this pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackedRoster {
    pub desired: Roster,
    pub saved: SavedRoster,
}

impl TrackedRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a server roster: desired and saved are identical.
    ///
    /// The slot cap only guards additions, so an oversized server roster is
    /// kept as-is. A repeated `player_id` keeps its first slot in `desired`;
    /// the duplicates stay in `saved` and the next reconcile deletes them.
    pub fn from_saved(slots: Vec<SavedSlot>) -> Self {
        let mut desired = Roster::new();
        for s in &slots {
            if !desired.contains(s.player_id) {
                desired.slots.push(SquadSlot::from(s.clone()));
            }
        }
        Self {
            desired,
            saved: SavedRoster::from_slots(slots),
        }
    }

    pub fn plan(&self) -> ReconcilePlan {
        crate::reconcile(&self.desired, &self.saved)
    }

    pub fn is_in_sync(&self) -> bool {
        self.plan().is_empty()
    }
}

/// The three disjoint change-sets that move `saved` to `desired`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcilePlan {
    /// Desired slots with no saved counterpart.
    pub to_create: Vec<SquadSlot>,
    /// Saved slots (server id kept) carrying the desired position.
    pub to_update: Vec<SavedSlot>,
    /// Saved slots with no desired counterpart.
    pub to_delete: Vec<SavedSlot>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn total_calls(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}
