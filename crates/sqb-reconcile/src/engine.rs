use std::collections::BTreeSet;

use crate::{ReconcilePlan, Roster, SavedRoster};
use sqb_schemas::{PlayerId, SavedSlot};

/// Deterministic reconciliation, keyed by `player_id`:
/// - desired only => create
/// - both, position differs => update (saved id, desired position)
/// - both, position equal => no call
/// - saved only => delete
///
/// A `player_id` repeated in `saved` matches on its first slot; the later
/// duplicates are deleted. Output follows input order within each set.
pub fn reconcile(desired: &Roster, saved: &SavedRoster) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    // 1) Creates
    for slot in desired.slots() {
        if saved.get(slot.player_id).is_none() {
            plan.to_create.push(slot.clone());
        }
    }

    // 2) Updates + deletes in one pass over saved
    let mut matched: BTreeSet<PlayerId> = BTreeSet::new();
    for saved_slot in saved.slots() {
        let first_for_player = matched.insert(saved_slot.player_id);
        match desired.get(saved_slot.player_id) {
            Some(want) if first_for_player => {
                if want.position != saved_slot.position {
                    plan.to_update.push(SavedSlot {
                        position: want.position,
                        ..saved_slot.clone()
                    });
                }
            }
            _ => plan.to_delete.push(saved_slot.clone()),
        }
    }

    plan
}
