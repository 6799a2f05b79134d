//! Scenario: composition guard keeps the desired roster valid
//!
//! GREEN when:
//! - a 12th addition is rejected and the roster stays at 11
//! - an addition without a position is rejected and the roster is unchanged
//! - an addition without a player is rejected and the roster is unchanged
//! - a duplicate player is rejected
//! - removal and position edits are keyed by player_id

use sqb_reconcile::*;
use sqb_schemas::{Position, SquadSlot};

fn full_roster() -> Roster {
    let mut r = Roster::new();
    for pid in 1..=11 {
        add_checked(&mut r, Some(pid), Some(Position::Cm)).unwrap();
    }
    r
}

#[test]
fn scenario_twelfth_player_rejected() {
    let mut r = full_roster();
    assert!(r.is_full());
    let before = r.clone();

    let err = add_checked(&mut r, Some(12), Some(Position::St)).unwrap_err();

    assert_eq!(err, CompositionError::SquadFull { max: 11 });
    assert_eq!(r.len(), 11);
    assert_eq!(r, before);

    // the raw append path enforces the same cap
    assert_eq!(
        r.try_add(SquadSlot::new(12, Position::St)),
        Err(CompositionError::SquadFull { max: 11 })
    );
    assert_eq!(r.len(), 11);
}

#[test]
fn scenario_missing_position_rejected() {
    let mut r = Roster::new();
    add_checked(&mut r, Some(1), Some(Position::Gk)).unwrap();
    let before = r.clone();

    let err = add_checked(&mut r, Some(2), None).unwrap_err();

    assert_eq!(err, CompositionError::NoPositionSelected);
    assert_eq!(r, before);
}

#[test]
fn scenario_missing_player_rejected() {
    let mut r = Roster::new();
    let err = add_checked(&mut r, None, Some(Position::St)).unwrap_err();
    assert_eq!(err, CompositionError::NoPlayerSelected);
    assert!(r.is_empty());
}

#[test]
fn scenario_duplicate_player_rejected() {
    let mut r = Roster::new();
    add_checked(&mut r, Some(7), Some(Position::Rw)).unwrap();
    let err = add_checked(&mut r, Some(7), Some(Position::Lw)).unwrap_err();
    assert_eq!(err, CompositionError::AlreadyInSquad { player_id: 7 });
    assert_eq!(r.get(7).map(|s| s.position), Some(Position::Rw));
}

#[test]
fn scenario_edits_are_keyed_by_player() {
    let mut r = Roster::new();
    add_checked(&mut r, Some(1), Some(Position::Gk)).unwrap();
    add_checked(&mut r, Some(2), Some(Position::Cb)).unwrap();

    assert!(r.set_position(2, Position::Lb));
    assert!(!r.set_position(99, Position::Lb));
    assert_eq!(r.get(2).map(|s| s.position), Some(Position::Lb));

    let removed = r.remove(1).unwrap();
    assert_eq!(removed.player_id, 1);
    assert!(r.remove(1).is_none());
    assert_eq!(r.len(), 1);
}
