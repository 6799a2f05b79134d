//! Squad-composition guard.
//!
//! Runs before any slot enters the desired roster. A rejection never
//! mutates the roster.

use sqb_schemas::{PlayerId, Position, SquadSlot};
use thiserror::Error;

use crate::Roster;

/// Non-fatal validation failures reported to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("the squad is full: at most {max} players")]
    SquadFull { max: usize },

    #[error("select a player before adding")]
    NoPlayerSelected,

    #[error("select a position before adding")]
    NoPositionSelected,

    #[error("player {player_id} is already in the squad")]
    AlreadyInSquad { player_id: PlayerId },

    #[error("player {player_id} is not eligible under this squad's limits")]
    NotEligible { player_id: PlayerId },

    #[error("player {player_id} is not in the squad")]
    NotInSquad { player_id: PlayerId },
}

/// Validate an addition and build the slot it would add.
///
/// Checked in order: squad full, no player, no position, duplicate.
pub fn check_addition(
    roster: &Roster,
    player_id: Option<PlayerId>,
    position: Option<Position>,
) -> Result<SquadSlot, CompositionError> {
    if roster.is_full() {
        return Err(CompositionError::SquadFull {
            max: sqb_schemas::MAX_SQUAD_SLOTS,
        });
    }
    let player_id = player_id.ok_or(CompositionError::NoPlayerSelected)?;
    let position = position.ok_or(CompositionError::NoPositionSelected)?;
    if roster.contains(player_id) {
        return Err(CompositionError::AlreadyInSquad { player_id });
    }
    Ok(SquadSlot::new(player_id, position))
}

/// [`check_addition`] then append.
pub fn add_checked(
    roster: &mut Roster,
    player_id: Option<PlayerId>,
    position: Option<Position>,
) -> Result<(), CompositionError> {
    let slot = check_addition(roster, player_id, position)?;
    roster.try_add(slot)
}
