//! Roster filter predicates.
//!
//! Every set predicate must hold (logical AND). Unset predicates, and text
//! predicates holding only whitespace, pass everything.

use sqb_schemas::{PlayerId, PlayerView, Position};
use std::collections::BTreeSet;

/// Player ids already placed in the desired roster.
pub type ExcludeSet = BTreeSet<PlayerId>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RosterFilter {
    /// Case-insensitive substring of the player name.
    pub name: Option<String>,
    /// Exact position.
    pub position: Option<Position>,
    /// Case-insensitive substring of the resolved nationality name.
    pub nationality: Option<String>,
    /// Case-insensitive substring of the resolved team name.
    pub team: Option<String>,
    /// Inclusive ceiling on market value (millions).
    pub max_market_value: Option<f64>,
}

impl RosterFilter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        active_text(&self.name).is_none()
            && self.position.is_none()
            && active_text(&self.nationality).is_none()
            && active_text(&self.team).is_none()
            && self.max_market_value.is_none()
    }

    pub fn matches(&self, view: &PlayerView) -> bool {
        contains_ci(&view.player.name, &self.name)
            && self.position.map_or(true, |p| view.player.position == Some(p))
            && contains_ci(&view.nationality, &self.nationality)
            && contains_ci(&view.team, &self.team)
            && self
                .max_market_value
                .map_or(true, |max| view.player.market_value_or_zero() <= max)
    }
}

fn active_text(needle: &Option<String>) -> Option<&str> {
    needle.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match active_text(needle) {
        None => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}

/// Views from `base` that satisfy `filter` and are not in `exclude`,
/// in base order. `base` is never modified.
pub fn filter_players(
    base: &[PlayerView],
    filter: &RosterFilter,
    exclude: &ExcludeSet,
) -> Vec<PlayerView> {
    base.iter()
        .filter(|v| !exclude.contains(&v.id()) && filter.matches(v))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqb_schemas::Player;

    fn view(id: i64, name: &str, pos: Position, value: f64) -> PlayerView {
        PlayerView {
            player: Player {
                id,
                name: name.to_string(),
                position: Some(pos),
                alternate_position: None,
                market_value: Some(value),
                nationality_id: Some(1),
                team_id: 1,
            },
            nationality: "Spain".to_string(),
            team: "Real Betis".to_string(),
        }
    }

    #[test]
    fn whitespace_only_text_is_unset() {
        let f = RosterFilter {
            name: Some("   ".to_string()),
            ..RosterFilter::none()
        };
        assert!(f.is_empty());
        assert!(f.matches(&view(1, "Isco", Position::Cam, 3.0)));
    }

    #[test]
    fn market_value_ceiling_is_inclusive() {
        let f = RosterFilter {
            max_market_value: Some(3.0),
            ..RosterFilter::none()
        };
        assert!(f.matches(&view(1, "Isco", Position::Cam, 3.0)));
        assert!(!f.matches(&view(2, "Fekir", Position::Cam, 3.5)));
    }

    #[test]
    fn team_match_uses_display_name() {
        let f = RosterFilter {
            team: Some("betis".to_string()),
            ..RosterFilter::none()
        };
        assert!(f.matches(&view(1, "Isco", Position::Cam, 3.0)));
    }
}
