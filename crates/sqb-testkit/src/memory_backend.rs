//! Deterministic in-memory squad backend.
//!
//! Ids come from running counters, storage is ordered maps, and every call is
//! appended to a log. No randomness, no network I/O. Failures are injected
//! per player / slot id so partial save cycles can be reproduced exactly.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sqb_api::{ApiError, SquadBackend};
use sqb_schemas::{
    Credentials, NamedEntity, NewSquad, NewUser, Player, PlayerId, SavedSlot, SlotId,
    SlotPayload, SquadId, SquadLimits, SquadRecord, UserId,
};

/// One backend call as observed by the fake.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    ListPlayers,
    ListNationalities,
    ListTeams,
    ListCompetitions,
    FilteredPlayers(SquadLimits),
    CreateSquad { name: String },
    CreateSlot { squad_id: SquadId, player_id: PlayerId },
    UpdateSlot { id: SlotId },
    DeleteSlot { id: SlotId },
    UserSquads { user_id: UserId },
    SquadSlots { squad_id: SquadId },
    VerifyUser { username: String },
    RegisterUser { username: String },
}

impl BackendCall {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            BackendCall::CreateSquad { .. }
                | BackendCall::CreateSlot { .. }
                | BackendCall::UpdateSlot { .. }
                | BackendCall::DeleteSlot { .. }
        )
    }
}

#[derive(Debug, Default)]
struct Failures {
    reads: bool,
    create_squad: bool,
    create_for_player: BTreeSet<PlayerId>,
    update_for_slot: BTreeSet<SlotId>,
    delete_for_slot: BTreeSet<SlotId>,
}

#[derive(Debug)]
struct State {
    next_squad_id: SquadId,
    next_slot_id: SlotId,
    next_user_id: UserId,
    players: Vec<Player>,
    nationalities: Vec<NamedEntity>,
    teams: Vec<NamedEntity>,
    competitions: Vec<NamedEntity>,
    team_competition: BTreeMap<i64, i64>,
    squads: BTreeMap<SquadId, SquadRecord>,
    /// slot id -> (squad id, slot)
    slots: BTreeMap<SlotId, (SquadId, SavedSlot)>,
    /// username -> (password, user id)
    users: BTreeMap<String, (String, UserId)>,
    failures: Failures,
    calls: Vec<BackendCall>,
}

/// In-memory [`SquadBackend`] with deterministic ids and a call log.
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn injected(what: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        body: format!("injected failure: {what}"),
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_squad_id: 1,
                next_slot_id: 1,
                next_user_id: 1,
                players: Vec::new(),
                nationalities: Vec::new(),
                teams: Vec::new(),
                competitions: Vec::new(),
                team_competition: BTreeMap::new(),
                squads: BTreeMap::new(),
                slots: BTreeMap::new(),
                users: BTreeMap::new(),
                failures: Failures::default(),
                calls: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the state from later asserts.
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    // -- seeding ------------------------------------------------------------

    pub fn with_players(self, players: Vec<Player>) -> Self {
        self.lock().players = players;
        self
    }

    pub fn with_lookups(
        self,
        nationalities: Vec<NamedEntity>,
        teams: Vec<NamedEntity>,
        competitions: Vec<NamedEntity>,
    ) -> Self {
        {
            let mut s = self.lock();
            s.nationalities = nationalities;
            s.teams = teams;
            s.competitions = competitions;
        }
        self
    }

    /// Teams belong to at most one competition; used by `filtered_players`.
    pub fn with_team_competition(self, team_id: i64, competition_id: i64) -> Self {
        self.lock().team_competition.insert(team_id, competition_id);
        self
    }

    pub fn with_user(self, username: &str, password: &str, user_id: UserId) -> Self {
        {
            let mut s = self.lock();
            s.users
                .insert(username.to_string(), (password.to_string(), user_id));
            s.next_user_id = s.next_user_id.max(user_id + 1);
        }
        self
    }

    /// Next id handed out by `create_slot`.
    pub fn with_next_slot_id(self, id: SlotId) -> Self {
        self.lock().next_slot_id = id;
        self
    }

    /// Next id handed out by `create_squad`.
    pub fn with_next_squad_id(self, id: SquadId) -> Self {
        self.lock().next_squad_id = id;
        self
    }

    /// Store an existing squad with its slots. Slot ids must be unique.
    pub fn with_squad(self, record: SquadRecord, slots: Vec<SavedSlot>) -> Self {
        {
            let mut s = self.lock();
            let squad_id = record.id;
            s.next_squad_id = s.next_squad_id.max(squad_id + 1);
            for slot in slots {
                s.next_slot_id = s.next_slot_id.max(slot.id + 1);
                s.slots.insert(slot.id, (squad_id, slot));
            }
            s.squads.insert(squad_id, record);
        }
        self
    }

    // -- failure injection --------------------------------------------------

    pub fn fail_reads(&self, on: bool) {
        self.lock().failures.reads = on;
    }

    pub fn fail_create_squad(&self, on: bool) {
        self.lock().failures.create_squad = on;
    }

    pub fn fail_create_for(&self, player_id: PlayerId) {
        self.lock().failures.create_for_player.insert(player_id);
    }

    pub fn fail_update_for(&self, slot_id: SlotId) {
        self.lock().failures.update_for_slot.insert(slot_id);
    }

    pub fn fail_delete_for(&self, slot_id: SlotId) {
        self.lock().failures.delete_for_slot.insert(slot_id);
    }

    pub fn clear_failures(&self) {
        self.lock().failures = Failures::default();
    }

    // -- inspection ---------------------------------------------------------

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<BackendCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Slots stored for `squad_id`, ordered by slot id.
    pub fn stored_slots(&self, squad_id: SquadId) -> Vec<SavedSlot> {
        self.lock()
            .slots
            .values()
            .filter(|(sq, _)| *sq == squad_id)
            .map(|(_, slot)| slot.clone())
            .collect()
    }

    pub fn stored_squads(&self) -> Vec<SquadRecord> {
        self.lock().squads.values().cloned().collect()
    }
}

impl State {
    fn log(&mut self, call: BackendCall) {
        self.calls.push(call);
    }

    fn check_read(&self, what: &str) -> Result<(), ApiError> {
        if self.failures.reads {
            return Err(injected(what));
        }
        Ok(())
    }
}

#[async_trait]
impl SquadBackend for MemoryBackend {
    async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::ListPlayers);
        s.check_read("players")?;
        Ok(s.players.clone())
    }

    async fn list_nationalities(&self) -> Result<Vec<NamedEntity>, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::ListNationalities);
        s.check_read("nationalities")?;
        Ok(s.nationalities.clone())
    }

    async fn list_teams(&self) -> Result<Vec<NamedEntity>, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::ListTeams);
        s.check_read("teams")?;
        Ok(s.teams.clone())
    }

    async fn list_competitions(&self) -> Result<Vec<NamedEntity>, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::ListCompetitions);
        s.check_read("competitions")?;
        Ok(s.competitions.clone())
    }

    async fn filtered_players(&self, limits: &SquadLimits) -> Result<Vec<Player>, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::FilteredPlayers(*limits));
        s.check_read("players_filtered")?;
        let out = s
            .players
            .iter()
            .filter(|p| {
                limits.competition_id.map_or(true, |c| {
                    s.team_competition.get(&p.team_id) == Some(&c)
                })
            })
            .filter(|p| {
                limits
                    .nationality_id
                    .map_or(true, |n| p.nationality_id == Some(n))
            })
            .filter(|p| {
                limits
                    .budget
                    .map_or(true, |b| p.market_value_or_zero() <= b)
            })
            .cloned()
            .collect();
        Ok(out)
    }

    async fn create_squad(&self, squad: &NewSquad) -> Result<SquadId, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::CreateSquad {
            name: squad.name.clone(),
        });
        if s.failures.create_squad {
            return Err(injected("create squad"));
        }
        let id = s.next_squad_id;
        s.next_squad_id += 1;
        s.squads.insert(
            id,
            SquadRecord {
                id,
                name: squad.name.clone(),
                user_id: Some(squad.user_id),
                formation_id: Some(squad.formation_id),
                competition_id: squad.competition_id,
                nationality_id: squad.nationality_id,
                budget: Some(squad.budget),
            },
        );
        Ok(id)
    }

    async fn create_slot(&self, slot: &SlotPayload) -> Result<SavedSlot, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::CreateSlot {
            squad_id: slot.squad_id,
            player_id: slot.player_id,
        });
        if s.failures.create_for_player.contains(&slot.player_id) {
            return Err(injected("create slot"));
        }
        if !s.squads.contains_key(&slot.squad_id) {
            return Err(ApiError::Status {
                status: 404,
                body: "Not found squad".to_string(),
            });
        }
        let id = s.next_slot_id;
        s.next_slot_id += 1;
        let saved = SavedSlot::new(id, slot.player_id, slot.position);
        s.slots.insert(id, (slot.squad_id, saved.clone()));
        Ok(saved)
    }

    async fn update_slot(&self, id: SlotId, slot: &SlotPayload) -> Result<(), ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::UpdateSlot { id });
        if s.failures.update_for_slot.contains(&id) {
            return Err(injected("update slot"));
        }
        match s.slots.get_mut(&id) {
            Some(entry) => {
                *entry = (slot.squad_id, SavedSlot::new(id, slot.player_id, slot.position));
                Ok(())
            }
            None => Err(ApiError::Status {
                status: 404,
                body: "Not found player-squad".to_string(),
            }),
        }
    }

    async fn delete_slot(&self, id: SlotId) -> Result<(), ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::DeleteSlot { id });
        if s.failures.delete_for_slot.contains(&id) {
            return Err(injected("delete slot"));
        }
        match s.slots.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ApiError::Status {
                status: 404,
                body: "Not found player-squad".to_string(),
            }),
        }
    }

    async fn user_squads(&self, user_id: UserId) -> Result<Vec<SquadRecord>, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::UserSquads { user_id });
        s.check_read("squads_filtered")?;
        Ok(s.squads
            .values()
            .filter(|r| r.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn squad_slots(&self, squad_id: SquadId) -> Result<Vec<SavedSlot>, ApiError> {
        {
            let mut s = self.lock();
            s.log(BackendCall::SquadSlots { squad_id });
            s.check_read("players_in_squad")?;
        }
        Ok(self.stored_slots(squad_id))
    }

    async fn verify_user(&self, credentials: &Credentials) -> Result<UserId, ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::VerifyUser {
            username: credentials.username.clone(),
        });
        match s.users.get(&credentials.username) {
            Some((pw, id)) if *pw == credentials.password => Ok(*id),
            _ => Err(ApiError::Status {
                status: 401,
                body: "Invalid credentials".to_string(),
            }),
        }
    }

    async fn register_user(&self, user: &NewUser) -> Result<(), ApiError> {
        let mut s = self.lock();
        s.log(BackendCall::RegisterUser {
            username: user.username.clone(),
        });
        if s.users.contains_key(&user.username) {
            return Err(ApiError::Status {
                status: 400,
                body: "Username already registered".to_string(),
            });
        }
        let id = s.next_user_id;
        s.next_user_id += 1;
        s.users
            .insert(user.username.clone(), (user.password.clone(), id));
        Ok(())
    }
}
