//! reqwest-backed implementation of [`SquadBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqb_schemas::{
    Credentials, NamedEntity, NewSquad, NewUser, Player, SavedSlot, SlotId, SlotPayload,
    SquadId, SquadLimits, SquadRecord, UserId,
};
use tracing::debug;

use crate::backend::{filtered_players_query, ApiError, SquadBackend};

/// HTTP client for the squad backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new_with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Client with a single transport timeout applied to every call.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(method = %method, path, "backend request");
        self.http.request(method, self.url(path))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let resp = send(self.request(Method::GET, path).query(query)).await?;
        decode(path, resp).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = send(self.request(method, path).json(body)).await?;
        decode(path, resp).await
    }
}

/// Send and map non-success statuses to [`ApiError::Status`].
async fn send(req: RequestBuilder) -> Result<Response, ApiError> {
    let resp = req
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = resp.status();
    debug!(status = status.as_u16(), url = %resp.url(), "backend response");
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, ApiError> {
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PlayersEnvelope {
    players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
struct NationalitiesEnvelope {
    nationalities: Vec<NamedEntity>,
}

#[derive(Debug, Deserialize)]
struct TeamsEnvelope {
    teams: Vec<NamedEntity>,
}

#[derive(Debug, Deserialize)]
struct CompetitionsEnvelope {
    competitions: Vec<NamedEntity>,
}

/// Any create response; only the server-assigned id is read.
#[derive(Debug, Deserialize)]
struct CreatedId {
    id: i64,
}

/// `/users/verify/` answers with the id as a bare number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserIdReply {
    Number(UserId),
    Text(String),
}

impl UserIdReply {
    fn into_id(self) -> Result<UserId, ApiError> {
        match self {
            UserIdReply::Number(id) => Ok(id),
            UserIdReply::Text(s) => s
                .trim()
                .trim_matches('"')
                .parse()
                .map_err(|_| ApiError::Decode(format!("user id is not numeric: {s:?}"))),
        }
    }
}

/// Response bodies we don't read; tolerates empty and arbitrary JSON.
async fn discard(resp: Response) -> Result<(), ApiError> {
    resp.bytes()
        .await
        .map(|_| ())
        .map_err(|e| ApiError::Transport(e.to_string()))
}

#[async_trait]
impl SquadBackend for HttpBackend {
    async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        let env: PlayersEnvelope = self.get_json("/players/", &[]).await?;
        Ok(env.players)
    }

    async fn list_nationalities(&self) -> Result<Vec<NamedEntity>, ApiError> {
        let env: NationalitiesEnvelope = self.get_json("/nationalities/", &[]).await?;
        Ok(env.nationalities)
    }

    async fn list_teams(&self) -> Result<Vec<NamedEntity>, ApiError> {
        let env: TeamsEnvelope = self.get_json("/teams/", &[]).await?;
        Ok(env.teams)
    }

    async fn list_competitions(&self) -> Result<Vec<NamedEntity>, ApiError> {
        let env: CompetitionsEnvelope = self.get_json("/competitions/", &[]).await?;
        Ok(env.competitions)
    }

    async fn filtered_players(&self, limits: &SquadLimits) -> Result<Vec<Player>, ApiError> {
        self.get_json("/players_filtered/", &filtered_players_query(limits))
            .await
    }

    async fn create_squad(&self, squad: &NewSquad) -> Result<SquadId, ApiError> {
        let created: CreatedId = self.send_json(Method::POST, "/squads/", squad).await?;
        Ok(created.id)
    }

    async fn create_slot(&self, slot: &SlotPayload) -> Result<SavedSlot, ApiError> {
        let created: CreatedId = self
            .send_json(Method::POST, "/squad_players/", slot)
            .await?;
        Ok(SavedSlot::new(created.id, slot.player_id, slot.position))
    }

    async fn update_slot(&self, id: SlotId, slot: &SlotPayload) -> Result<(), ApiError> {
        let path = format!("/squad_players/{id}");
        let resp = send(self.request(Method::PUT, &path).json(slot)).await?;
        discard(resp).await
    }

    async fn delete_slot(&self, id: SlotId) -> Result<(), ApiError> {
        let path = format!("/squad_players/{id}");
        let resp = send(self.request(Method::DELETE, &path)).await?;
        discard(resp).await
    }

    async fn user_squads(&self, user_id: UserId) -> Result<Vec<SquadRecord>, ApiError> {
        self.get_json("/squads_filtered/", &[("user_id", user_id.to_string())])
            .await
    }

    async fn squad_slots(&self, squad_id: SquadId) -> Result<Vec<SavedSlot>, ApiError> {
        self.get_json(&format!("/players_in_squad/{squad_id}"), &[])
            .await
    }

    async fn verify_user(&self, credentials: &Credentials) -> Result<UserId, ApiError> {
        let reply: UserIdReply = self
            .send_json(Method::POST, "/users/verify/", credentials)
            .await?;
        reply.into_id()
    }

    async fn register_user(&self, user: &NewUser) -> Result<(), ApiError> {
        let resp = send(self.request(Method::POST, "/users/").json(user)).await?;
        discard(resp).await
    }
}
