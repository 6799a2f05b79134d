//! Backend boundary for the squad builder.
//!
//! This module defines **only** the error type and the backend trait. The
//! reqwest implementation lives in `http.rs`; in-memory implementations for
//! tests live in `sqb-testkit`.

use async_trait::async_trait;
use sqb_schemas::{
    Credentials, NamedEntity, NewSquad, NewUser, Player, SavedSlot, SlotId, SlotPayload,
    SquadId, SquadLimits, SquadRecord, UserId,
};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`SquadBackend`] implementation may return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network or transport failure: the call never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend error status={status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The client itself is misconfigured (e.g. unusable base URL).
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// `true` for malformed or missing response fields.
    pub fn is_data_shape(&self) -> bool {
        matches!(self, ApiError::Decode(_))
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The REST collaborator's fixed contract, one method per endpoint.
///
/// Implementations must be `Send + Sync` so the session can hold a shared
/// reference across `.await` points and fan out concurrent creates.
#[async_trait]
pub trait SquadBackend: Send + Sync {
    /// `GET /players/`
    async fn list_players(&self) -> Result<Vec<Player>, ApiError>;

    /// `GET /nationalities/`
    async fn list_nationalities(&self) -> Result<Vec<NamedEntity>, ApiError>;

    /// `GET /teams/`
    async fn list_teams(&self) -> Result<Vec<NamedEntity>, ApiError>;

    /// `GET /competitions/`
    async fn list_competitions(&self) -> Result<Vec<NamedEntity>, ApiError>;

    /// `GET /players_filtered/` with absent limits dropped from the query.
    async fn filtered_players(&self, limits: &SquadLimits) -> Result<Vec<Player>, ApiError>;

    /// `POST /squads/`, returning the server-assigned squad id.
    async fn create_squad(&self, squad: &NewSquad) -> Result<SquadId, ApiError>;

    /// `POST /squad_players/`, returning the persisted slot.
    async fn create_slot(&self, slot: &SlotPayload) -> Result<SavedSlot, ApiError>;

    /// `PUT /squad_players/{id}`
    async fn update_slot(&self, id: SlotId, slot: &SlotPayload) -> Result<(), ApiError>;

    /// `DELETE /squad_players/{id}`
    async fn delete_slot(&self, id: SlotId) -> Result<(), ApiError>;

    /// `GET /squads_filtered/?user_id=`
    async fn user_squads(&self, user_id: UserId) -> Result<Vec<SquadRecord>, ApiError>;

    /// `GET /players_in_squad/{squad_id}`
    async fn squad_slots(&self, squad_id: SquadId) -> Result<Vec<SavedSlot>, ApiError>;

    /// `POST /users/verify/`
    async fn verify_user(&self, credentials: &Credentials) -> Result<UserId, ApiError>;

    /// `POST /users/`
    async fn register_user(&self, user: &NewUser) -> Result<(), ApiError>;
}

/// Query pairs for `/players_filtered/`. Absent limits are dropped entirely
/// rather than sent empty.
pub fn filtered_players_query(limits: &SquadLimits) -> Vec<(&'static str, String)> {
    let mut q = Vec::new();
    if let Some(c) = limits.competition_id {
        q.push(("competition_id", c.to_string()));
    }
    if let Some(n) = limits.nationality_id {
        q.push(("nationality_id", n.to_string()));
    }
    if let Some(b) = limits.budget {
        q.push(("market_value", b.to_string()));
    }
    q
}
