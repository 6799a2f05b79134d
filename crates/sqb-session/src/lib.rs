//! sqb-session
//!
//! Application state for the squad builder.
//! - `App` owns the backend, the logged-in user and page loads
//! - `SquadSession` owns one squad's desired/saved pair and candidate pool
//! - `SquadSession::save` runs a reconcile cycle against the backend
//!
//! Read failures become `PageState::Failed`; write failures become
//! `SaveError` with `saved` holding only confirmed calls.

mod app;
mod save;
mod session;

pub use app::{App, AppError, PageState, PlayersPage};
pub use save::{FixedName, NamePrompt, SaveError, SavePhase, SaveReport};
pub use session::{Selection, SessionDefaults, SquadRow, SquadSession};
