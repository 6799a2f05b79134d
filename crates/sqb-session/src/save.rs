//! Save cycle: snapshot → plan → apply → merge.
//!
//! Phase order is create squad (first save only), create slots, update
//! slots, delete slots. Every confirmed call is merged into `saved` before
//! the next outcome is looked at, so an aborted cycle leaves `saved`
//! holding exactly what the backend confirmed.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use sqb_api::{ApiError, SquadBackend};
use sqb_reconcile::PersistStatus;
use sqb_schemas::{NewSquad, SlotId, SlotPayload, SquadId};
use thiserror::Error;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::SquadSession;

/// Source of a squad name on first save. `None` or blank means "use the
/// default name".
pub trait NamePrompt {
    fn squad_name(&mut self) -> Option<String>;
}

impl<F> NamePrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn squad_name(&mut self) -> Option<String> {
        self()
    }
}

/// A prompt that always answers with the same value.
#[derive(Clone, Debug, Default)]
pub struct FixedName(pub Option<String>);

impl NamePrompt for FixedName {
    fn squad_name(&mut self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SavePhase {
    CreateSquad,
    Create,
    Update,
    Delete,
}

impl SavePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavePhase::CreateSquad => "create_squad",
            SavePhase::Create => "create",
            SavePhase::Update => "update",
            SavePhase::Delete => "delete",
        }
    }
}

/// A save cycle stopped at the named phase. Nothing is rolled back.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SaveError {
    #[error("creating the squad failed: {0}")]
    CreateSquad(#[source] ApiError),

    #[error("{failed} of {attempted} slot creates failed: {first}")]
    Create {
        failed: usize,
        attempted: usize,
        #[source]
        first: ApiError,
    },

    #[error("updating slot {slot_id} failed: {source}")]
    Update {
        slot_id: SlotId,
        #[source]
        source: ApiError,
    },

    #[error("deleting slot {slot_id} failed: {source}")]
    Delete {
        slot_id: SlotId,
        #[source]
        source: ApiError,
    },
}

impl SaveError {
    pub fn phase(&self) -> SavePhase {
        match self {
            SaveError::CreateSquad(_) => SavePhase::CreateSquad,
            SaveError::Create { .. } => SavePhase::Create,
            SaveError::Update { .. } => SavePhase::Update,
            SaveError::Delete { .. } => SavePhase::Delete,
        }
    }
}

/// Outcome of a fully successful cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SaveReport {
    pub cycle_id: Uuid,
    pub squad_id: SquadId,
    pub squad_created: bool,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub finished_at: DateTime<Utc>,
}

impl SaveReport {
    pub fn total_calls(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

impl SquadSession {
    /// Run one save cycle against `backend`.
    ///
    /// The plan is taken from the state at entry; `&mut self` keeps edits
    /// out until the cycle returns. On the first save of a new squad the
    /// name comes from `prompt`.
    pub async fn save<B>(
        &mut self,
        backend: &B,
        prompt: &mut dyn NamePrompt,
    ) -> Result<SaveReport, SaveError>
    where
        B: SquadBackend + ?Sized,
    {
        let cycle_id = Uuid::new_v4();
        let span = tracing::info_span!("save_cycle", cycle_id = %cycle_id);
        self.run_cycle(cycle_id, backend, prompt)
            .instrument(span)
            .await
    }

    async fn run_cycle<B>(
        &mut self,
        cycle_id: Uuid,
        backend: &B,
        prompt: &mut dyn NamePrompt,
    ) -> Result<SaveReport, SaveError>
    where
        B: SquadBackend + ?Sized,
    {
        let plan = self.roster.plan();
        info!(
            creates = plan.to_create.len(),
            updates = plan.to_update.len(),
            deletes = plan.to_delete.len(),
            "save/plan"
        );

        if let Some(remaining) = self.budget_remaining() {
            if remaining < 0.0 {
                warn!(
                    total = self.total_market_value(),
                    remaining, "saving a squad over its budget"
                );
            }
        }

        let (squad_id, squad_created) = match self.status {
            PersistStatus::Saved(id) => (id, false),
            PersistStatus::Unsaved => (self.create_squad(backend, prompt).await?, true),
        };

        // -- creates: issued together, all awaited, each success merged --
        let payloads: Vec<SlotPayload> = plan
            .to_create
            .iter()
            .map(|s| SlotPayload {
                squad_id,
                player_id: s.player_id,
                position: s.position,
            })
            .collect();
        let outcomes = join_all(payloads.iter().map(|p| backend.create_slot(p))).await;

        let attempted = outcomes.len();
        let mut created = 0;
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(slot) => {
                    self.roster.desired.assign_id(slot.player_id, slot.id);
                    self.roster.saved.record_created(slot);
                    created += 1;
                }
                Err(e) => failures.push(e),
            }
        }
        info!(created, failed = failures.len(), "save/create");
        if let Some(first) = failures.first() {
            warn!(error = %first, "save aborted in create phase");
            return Err(SaveError::Create {
                failed: failures.len(),
                attempted,
                first: first.clone(),
            });
        }

        // -- updates: one at a time, first failure aborts --
        let mut updated = 0;
        for slot in &plan.to_update {
            let payload = SlotPayload {
                squad_id,
                player_id: slot.player_id,
                position: slot.position,
            };
            backend
                .update_slot(slot.id, &payload)
                .await
                .map_err(|source| SaveError::Update {
                    slot_id: slot.id,
                    source,
                })?;
            self.roster.saved.record_updated(slot);
            updated += 1;
        }
        info!(updated, "save/update");

        // -- deletes: one at a time, first failure aborts --
        let mut deleted = 0;
        for slot in &plan.to_delete {
            backend
                .delete_slot(slot.id)
                .await
                .map_err(|source| SaveError::Delete {
                    slot_id: slot.id,
                    source,
                })?;
            self.roster.saved.record_deleted(slot.id);
            deleted += 1;
        }
        info!(deleted, "save/delete");

        Ok(SaveReport {
            cycle_id,
            squad_id,
            squad_created,
            created,
            updated,
            deleted,
            finished_at: Utc::now(),
        })
    }

    async fn create_squad<B>(
        &mut self,
        backend: &B,
        prompt: &mut dyn NamePrompt,
    ) -> Result<SquadId, SaveError>
    where
        B: SquadBackend + ?Sized,
    {
        let name = prompt
            .squad_name()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.defaults.squad_name.clone());

        let squad = NewSquad {
            name: name.clone(),
            formation_id: self.defaults.formation_id,
            user_id: self.user_id,
            competition_id: self.limits.competition_id,
            nationality_id: self.limits.nationality_id,
            budget: self.limits.budget.unwrap_or(self.defaults.budget),
        };
        let id = backend
            .create_squad(&squad)
            .await
            .map_err(SaveError::CreateSquad)?;

        info!(squad_id = id, name = %name, "save/create_squad");
        self.status = PersistStatus::Saved(id);
        self.name = Some(name);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_prompts() {
        let mut answered = false;
        let mut prompt = || {
            answered = true;
            Some("Firsts".to_string())
        };
        assert_eq!(prompt.squad_name().as_deref(), Some("Firsts"));
        drop(prompt);
        assert!(answered);
    }

    #[test]
    fn save_error_names_its_phase() {
        let api = ApiError::Transport("connection refused".to_string());
        let err = SaveError::Update {
            slot_id: 3,
            source: api.clone(),
        };
        assert_eq!(err.phase(), SavePhase::Update);
        assert_eq!(
            err.to_string(),
            "updating slot 3 failed: transport error: connection refused"
        );
        assert_eq!(SaveError::CreateSquad(api).phase().as_str(), "create_squad");
    }
}
