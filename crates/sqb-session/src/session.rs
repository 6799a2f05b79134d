//! Squad editing session: one squad's desired/saved pair plus the candidate
//! pool it is built from.

use sqb_reconcile::{
    check_addition, CompositionError, PersistStatus, ReconcilePlan, Roster, SavedRoster,
    TrackedRoster,
};
use sqb_roster::{refresh, sort_players, RosterFilter, SortConfig, SortKey};
use sqb_schemas::{
    Player, PlayerId, PlayerView, Position, SavedSlot, SquadLimits, SquadRecord, SquadSlot,
    UserId, UNKNOWN_NAME,
};

/// Values used when the user leaves a squad field blank.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionDefaults {
    pub squad_name: String,
    pub budget: f64,
    pub formation_id: i64,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            squad_name: "New Squad".to_string(),
            budget: 1_000_000_000.0,
            formation_id: 1,
        }
    }
}

/// Player + position picked in the UI but not yet added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub player: Option<PlayerId>,
    pub position: Option<Position>,
}

/// One row of the squad table: the slot and the player it places.
#[derive(Clone, Debug, PartialEq)]
pub struct SquadRow {
    pub slot: SquadSlot,
    pub view: PlayerView,
}

#[derive(Clone, Debug)]
pub struct SquadSession {
    pub(crate) user_id: UserId,
    pub(crate) name: Option<String>,
    pub(crate) limits: SquadLimits,
    pub(crate) status: PersistStatus,
    pub(crate) roster: TrackedRoster,
    pub(crate) defaults: SessionDefaults,
    pool: Vec<PlayerView>,
    filter: RosterFilter,
    candidate_sort: SortConfig,
    squad_sort: SortConfig,
    selection: Selection,
}

impl SquadSession {
    /// A squad that does not exist on the backend yet.
    pub fn unsaved(
        user_id: UserId,
        limits: SquadLimits,
        pool: Vec<PlayerView>,
        defaults: SessionDefaults,
    ) -> Self {
        Self {
            user_id,
            name: None,
            limits,
            status: PersistStatus::Unsaved,
            roster: TrackedRoster::new(),
            defaults,
            pool,
            filter: RosterFilter::none(),
            candidate_sort: SortConfig::unsorted(),
            squad_sort: SortConfig::ascending(SortKey::Position),
            selection: Selection::default(),
        }
    }

    /// An existing squad; desired and saved both start from `slots`.
    pub fn open(
        user_id: UserId,
        record: &SquadRecord,
        pool: Vec<PlayerView>,
        slots: Vec<SavedSlot>,
        defaults: SessionDefaults,
    ) -> Self {
        let mut s = Self::unsaved(user_id, record.limits(), pool, defaults);
        s.name = Some(record.name.clone());
        s.status = PersistStatus::Saved(record.id);
        s.roster = TrackedRoster::from_saved(slots);
        s
    }

    // -- state --------------------------------------------------------------

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn limits(&self) -> SquadLimits {
        self.limits
    }

    pub fn status(&self) -> PersistStatus {
        self.status
    }

    pub fn desired(&self) -> &Roster {
        &self.roster.desired
    }

    pub fn saved(&self) -> &SavedRoster {
        &self.roster.saved
    }

    pub fn tracked(&self) -> &TrackedRoster {
        &self.roster
    }

    pub fn pool(&self) -> &[PlayerView] {
        &self.pool
    }

    /// Calls the next save would issue.
    pub fn plan(&self) -> ReconcilePlan {
        self.roster.plan()
    }

    /// `true` when a save would change anything on the backend.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.status.is_saved() || !self.roster.is_in_sync()
    }

    // -- candidate table ----------------------------------------------------

    pub fn filter(&self) -> &RosterFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: RosterFilter) {
        self.filter = filter;
    }

    pub fn candidate_sort(&self) -> SortConfig {
        self.candidate_sort
    }

    pub fn request_candidate_sort(&mut self, key: SortKey) {
        self.candidate_sort.request(key);
    }

    /// Pool players passing the filter and not already in the squad.
    pub fn candidates(&self) -> Vec<PlayerView> {
        refresh(
            &self.pool,
            &self.filter,
            &self.roster.desired.player_ids(),
            self.candidate_sort,
        )
    }

    fn pool_view(&self, player_id: PlayerId) -> Option<&PlayerView> {
        self.pool.iter().find(|v| v.id() == player_id)
    }

    // -- squad table --------------------------------------------------------

    pub fn squad_sort(&self) -> SortConfig {
        self.squad_sort
    }

    pub fn request_squad_sort(&mut self, key: SortKey) {
        self.squad_sort.request(key);
    }

    /// Desired slots joined with their players, sorted by the squad sort.
    ///
    /// Position sorts by the slot's position, not the player's natural one.
    /// Slots whose player is missing from the pool show as `"Unknown"`.
    pub fn squad_rows(&self) -> Vec<SquadRow> {
        let mut views: Vec<PlayerView> = self
            .roster
            .desired
            .slots()
            .iter()
            .map(|slot| {
                let mut view = self
                    .pool_view(slot.player_id)
                    .cloned()
                    .unwrap_or_else(|| placeholder_view(slot.player_id));
                view.player.position = Some(slot.position);
                view
            })
            .collect();
        sort_players(&mut views, self.squad_sort);

        views
            .into_iter()
            .filter_map(|view| {
                let slot = self.roster.desired.get(view.id())?.clone();
                Some(SquadRow { slot, view })
            })
            .collect()
    }

    /// Sum of the desired players' market values; missing values count as zero.
    pub fn total_market_value(&self) -> f64 {
        self.roster
            .desired
            .slots()
            .iter()
            .filter_map(|s| self.pool_view(s.player_id))
            .map(|v| v.player.market_value_or_zero())
            .sum()
    }

    /// Budget left after the desired roster, when the squad has a budget.
    pub fn budget_remaining(&self) -> Option<f64> {
        self.limits.budget.map(|b| b - self.total_market_value())
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget_remaining().is_some_and(|r| r < 0.0)
    }

    // -- selection and edits ------------------------------------------------

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Select a pool player; the position defaults to their natural one.
    pub fn select(&mut self, player_id: PlayerId) -> Result<(), CompositionError> {
        let view = self
            .pool_view(player_id)
            .ok_or(CompositionError::NotEligible { player_id })?;
        self.selection = Selection {
            player: Some(player_id),
            position: view.player.position,
        };
        Ok(())
    }

    pub fn select_position(&mut self, position: Position) {
        self.selection.position = Some(position);
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// Add the current selection. The selection is cleared on success and
    /// left untouched on rejection.
    pub fn add_selected(&mut self) -> Result<SquadSlot, CompositionError> {
        let Selection { player, position } = self.selection;
        let slot = self.add(player, position)?;
        self.clear_selection();
        Ok(slot)
    }

    /// Guarded addition: the composition rules, then pool eligibility.
    pub fn add(
        &mut self,
        player: Option<PlayerId>,
        position: Option<Position>,
    ) -> Result<SquadSlot, CompositionError> {
        let slot = check_addition(&self.roster.desired, player, position)?;
        if self.pool_view(slot.player_id).is_none() {
            return Err(CompositionError::NotEligible {
                player_id: slot.player_id,
            });
        }
        self.roster.desired.try_add(slot.clone())?;
        Ok(slot)
    }

    pub fn remove(&mut self, player_id: PlayerId) -> Result<SquadSlot, CompositionError> {
        self.roster
            .desired
            .remove(player_id)
            .ok_or(CompositionError::NotInSquad { player_id })
    }

    pub fn set_position(
        &mut self,
        player_id: PlayerId,
        position: Position,
    ) -> Result<(), CompositionError> {
        if self.roster.desired.set_position(player_id, position) {
            Ok(())
        } else {
            Err(CompositionError::NotInSquad { player_id })
        }
    }
}

fn placeholder_view(player_id: PlayerId) -> PlayerView {
    PlayerView {
        player: Player {
            id: player_id,
            name: UNKNOWN_NAME.to_string(),
            position: None,
            alternate_position: None,
            market_value: None,
            nationality_id: None,
            team_id: 0,
        },
        nationality: UNKNOWN_NAME.to_string(),
        team: UNKNOWN_NAME.to_string(),
    }
}
