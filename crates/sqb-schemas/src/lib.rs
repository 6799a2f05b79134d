//! sqb-schemas
//!
//! Shared record shapes for the squad builder: the fixed position
//! enumeration, players and their resolved views, squad slots and the squad
//! records exchanged with the backend.
//!
//! Pure data. No IO.

mod position;

pub use position::{ParsePositionError, Position};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type PlayerId = i64;
pub type SlotId = i64;
pub type SquadId = i64;
pub type UserId = i64;

/// Hard cap on slots per squad.
pub const MAX_SQUAD_SLOTS: usize = 11;

/// Display name used when a foreign id cannot be resolved.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A player as returned by `/players/` and `/players_filtered/`.
///
/// `position`, `market_value` and `nationality_id` are nullable on the
/// backend, so they stay optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub alternate_position: Option<Position>,
    /// Millions.
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub nationality_id: Option<i64>,
    pub team_id: i64,
}

impl Player {
    /// Market value with a missing value read as zero.
    pub fn market_value_or_zero(&self) -> f64 {
        self.market_value.unwrap_or(0.0)
    }
}

/// `{id, name}` rows: nationalities, teams and competitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: i64,
    pub name: String,
}

impl NamedEntity {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// id -> display name, built once per list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameLookup {
    names: BTreeMap<i64, String>,
}

impl NameLookup {
    pub fn from_entities(entities: &[NamedEntity]) -> Self {
        let names = entities
            .iter()
            .map(|e| (e.id, e.name.clone()))
            .collect::<BTreeMap<_, _>>();
        Self { names }
    }

    /// Resolve an id to its display name, `"Unknown"` when absent.
    pub fn resolve(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.names.get(&id))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_NAME)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A player joined with its resolved nationality and team names.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub player: Player,
    pub nationality: String,
    pub team: String,
}

impl PlayerView {
    pub fn resolve(player: Player, nationalities: &NameLookup, teams: &NameLookup) -> Self {
        let nationality = nationalities.resolve(player.nationality_id).to_string();
        let team = teams.resolve(Some(player.team_id)).to_string();
        Self {
            player,
            nationality,
            team,
        }
    }

    pub fn resolve_all(
        players: Vec<Player>,
        nationalities: &NameLookup,
        teams: &NameLookup,
    ) -> Vec<Self> {
        players
            .into_iter()
            .map(|p| Self::resolve(p, nationalities, teams))
            .collect()
    }

    pub fn id(&self) -> PlayerId {
        self.player.id
    }
}

/// One placement in a squad. `id` is `None` until the backend has
/// confirmed the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadSlot {
    #[serde(default)]
    pub id: Option<SlotId>,
    pub player_id: PlayerId,
    pub position: Position,
}

impl SquadSlot {
    pub fn new(player_id: PlayerId, position: Position) -> Self {
        Self {
            id: None,
            player_id,
            position,
        }
    }
}

/// A slot known to exist on the backend. The server id is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSlot {
    pub id: SlotId,
    pub player_id: PlayerId,
    #[serde(alias = "position_in_squad")]
    pub position: Position,
}

impl SavedSlot {
    pub fn new(id: SlotId, player_id: PlayerId, position: Position) -> Self {
        Self {
            id,
            player_id,
            position,
        }
    }
}

impl From<SavedSlot> for SquadSlot {
    fn from(s: SavedSlot) -> Self {
        Self {
            id: Some(s.id),
            player_id: s.player_id,
            position: s.position,
        }
    }
}

/// Squad row returned by `/squads_filtered/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadRecord {
    pub id: SquadId,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub formation_id: Option<i64>,
    #[serde(default)]
    pub competition_id: Option<i64>,
    #[serde(default)]
    pub nationality_id: Option<i64>,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl SquadRecord {
    pub fn limits(&self) -> SquadLimits {
        SquadLimits {
            competition_id: self.competition_id,
            nationality_id: self.nationality_id,
            budget: self.budget,
        }
    }
}

/// Competition / nationality / budget context a squad is built under.
/// Also the query for `/players_filtered/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SquadLimits {
    pub competition_id: Option<i64>,
    pub nationality_id: Option<i64>,
    pub budget: Option<f64>,
}

/// Body of `POST /squads/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSquad {
    pub name: String,
    pub formation_id: i64,
    pub user_id: UserId,
    pub competition_id: Option<i64>,
    pub nationality_id: Option<i64>,
    pub budget: f64,
}

/// Body of `POST /squad_players/` and `PUT /squad_players/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPayload {
    pub squad_id: SquadId,
    pub player_id: PlayerId,
    pub position: Position,
}

/// Body of `POST /users/verify/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Body of `POST /users/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<REDACTED>")
            .finish()
    }
}
