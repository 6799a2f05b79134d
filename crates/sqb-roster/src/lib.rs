//! sqb-roster
//!
//! Roster filter/sort engine.
//! - Conjunction of name / position / nationality / team / market-value
//!   predicates plus a "not already in squad" exclusion
//! - Single active sort key, ascending or descending
//! - Output replaces the previous view wholesale
//!
//! Pure deterministic logic. No IO, never mutates the base collection.

mod filter;
mod sort;

pub use filter::{filter_players, ExcludeSet, RosterFilter};
pub use sort::{compare_by, sort_players, SortConfig, SortDirection, SortKey};

use sqb_schemas::PlayerView;

/// Recompute a view from scratch: filter `base`, then sort.
///
/// Callers invoke this after any change to the base collection, a filter
/// input, squad membership or the sort configuration.
pub fn refresh(
    base: &[PlayerView],
    filter: &RosterFilter,
    exclude: &ExcludeSet,
    sort: SortConfig,
) -> Vec<PlayerView> {
    let mut out = filter_players(base, filter, exclude);
    sort_players(&mut out, sort);
    out
}
