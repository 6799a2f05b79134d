//! sqb-reconcile
//!
//! Squad reconciliation engine.
//!
//! - Desired and saved rosters are one tagged pair keyed by `player_id`
//! - `reconcile` computes the disjoint create / update / delete sets
//! - Unchanged slots produce no call
//! - Confirmed calls are merged into the saved roster one at a time, so a
//!   failed cycle leaves `saved` reflecting exactly what the server confirmed
//! - Additions pass the composition guard (11-slot cap, player + position)
//!
//! Deterministic, pure logic. No IO. No backend calls.

mod engine;
mod guard;
mod types;

pub use engine::reconcile;
pub use guard::{add_checked, check_addition, CompositionError};
pub use types::*;
