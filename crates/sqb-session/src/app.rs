//! Application controller: explicit state for login, the players page and
//! squad sessions.

use serde::Serialize;
use sqb_api::{ApiError, SquadBackend};
use sqb_roster::{refresh, ExcludeSet, RosterFilter, SortConfig, SortKey};
use sqb_schemas::{
    Credentials, NameLookup, NamedEntity, NewUser, PlayerView, SquadLimits, SquadRecord, UserId,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{NamePrompt, SaveError, SaveReport, SessionDefaults, SquadSession};

/// A page either rendered from fresh data or replaced by an error message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PageState<T> {
    Ready(T),
    Failed(String),
}

impl<T> PageState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PageState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(t) => Some(t),
            PageState::Failed(_) => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            PageState::Ready(t) => Some(t),
            PageState::Failed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PageState<U> {
        match self {
            PageState::Ready(t) => PageState::Ready(f(t)),
            PageState::Failed(m) => PageState::Failed(m),
        }
    }

    fn from_read(what: &str, r: Result<T, ApiError>) -> Self {
        match r {
            Ok(t) => PageState::Ready(t),
            Err(e) => {
                warn!(page = what, error = %e, "read failed");
                PageState::Failed(format!("could not load {what}: {e}"))
            }
        }
    }
}

/// Errors from controller operations that need a logged-in user.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AppError {
    #[error("log in first")]
    NotLoggedIn,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// The all-players browser with its own filter and sort.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayersPage {
    pub players: Vec<PlayerView>,
    pub filter: RosterFilter,
    pub sort: SortConfig,
}

impl PlayersPage {
    pub fn new(players: Vec<PlayerView>) -> Self {
        Self {
            players,
            filter: RosterFilter::none(),
            sort: SortConfig::unsorted(),
        }
    }

    pub fn request_sort(&mut self, key: SortKey) {
        self.sort.request(key);
    }

    /// The visible rows for the current filter and sort.
    pub fn view(&self) -> Vec<PlayerView> {
        refresh(&self.players, &self.filter, &ExcludeSet::new(), self.sort)
    }
}

pub struct App<B> {
    backend: B,
    defaults: SessionDefaults,
    user: Option<UserId>,
}

impl<B: SquadBackend> App<B> {
    pub fn new(backend: B, defaults: SessionDefaults) -> Self {
        Self {
            backend,
            defaults,
            user: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    /// Resume as a user already verified elsewhere.
    pub fn set_user(&mut self, user_id: UserId) {
        self.user = Some(user_id);
    }

    fn require_user(&self) -> Result<UserId, AppError> {
        self.user.ok_or(AppError::NotLoggedIn)
    }

    // -- users --------------------------------------------------------------

    pub async fn login(&mut self, username: &str, password: &str) -> Result<UserId, AppError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let user_id = self.backend.verify_user(&credentials).await?;
        info!(user_id, "login");
        self.user = Some(user_id);
        Ok(user_id)
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.backend.register_user(&user).await?;
        info!(username, "register");
        Ok(())
    }

    // -- reads --------------------------------------------------------------

    async fn lookups(&self) -> Result<(NameLookup, NameLookup), ApiError> {
        let nationalities = self.backend.list_nationalities().await?;
        let teams = self.backend.list_teams().await?;
        Ok((
            NameLookup::from_entities(&nationalities),
            NameLookup::from_entities(&teams),
        ))
    }

    /// Players + nationalities + teams, resolved for display.
    pub async fn players_page(&self) -> PageState<PlayersPage> {
        let loaded = async {
            let players = self.backend.list_players().await?;
            let (nationalities, teams) = self.lookups().await?;
            Ok::<_, ApiError>(PlayerView::resolve_all(players, &nationalities, &teams))
        }
        .await;
        PageState::from_read("players", loaded).map(PlayersPage::new)
    }

    pub async fn competitions(&self) -> PageState<Vec<NamedEntity>> {
        PageState::from_read("competitions", self.backend.list_competitions().await)
    }

    pub async fn nationalities(&self) -> PageState<Vec<NamedEntity>> {
        PageState::from_read("nationalities", self.backend.list_nationalities().await)
    }

    pub async fn teams(&self) -> PageState<Vec<NamedEntity>> {
        PageState::from_read("teams", self.backend.list_teams().await)
    }

    pub async fn user_squads(&self) -> Result<PageState<Vec<SquadRecord>>, AppError> {
        let user_id = self.require_user()?;
        Ok(PageState::from_read(
            "squads",
            self.backend.user_squads(user_id).await,
        ))
    }

    async fn candidate_pool(&self, limits: &SquadLimits) -> Result<Vec<PlayerView>, ApiError> {
        let players = self.backend.filtered_players(limits).await?;
        let (nationalities, teams) = self.lookups().await?;
        Ok(PlayerView::resolve_all(players, &nationalities, &teams))
    }

    /// The players a squad under `limits` may pick from, without a session.
    pub async fn candidate_page(&self, limits: &SquadLimits) -> PageState<Vec<PlayerView>> {
        PageState::from_read("candidates", self.candidate_pool(limits).await)
    }

    // -- squads -------------------------------------------------------------

    /// Open an unsaved squad under `limits`.
    pub async fn new_squad(
        &self,
        limits: SquadLimits,
    ) -> Result<PageState<SquadSession>, AppError> {
        let user_id = self.require_user()?;
        let pool = self.candidate_pool(&limits).await;
        Ok(PageState::from_read("squad", pool).map(|pool| {
            SquadSession::unsaved(user_id, limits, pool, self.defaults.clone())
        }))
    }

    /// Open an existing squad with its saved slots.
    pub async fn open_squad(
        &self,
        record: &SquadRecord,
    ) -> Result<PageState<SquadSession>, AppError> {
        let user_id = self.require_user()?;
        let loaded = async {
            let pool = self.candidate_pool(&record.limits()).await?;
            let slots = self.backend.squad_slots(record.id).await?;
            Ok::<_, ApiError>((pool, slots))
        }
        .await;
        Ok(PageState::from_read("squad", loaded).map(|(pool, slots)| {
            SquadSession::open(user_id, record, pool, slots, self.defaults.clone())
        }))
    }

    /// Run one save cycle for `session` against this app's backend.
    pub async fn save(
        &self,
        session: &mut SquadSession,
        prompt: &mut dyn NamePrompt,
    ) -> Result<SaveReport, AppError> {
        self.require_user()?;
        Ok(session.save(&self.backend, prompt).await?)
    }
}
