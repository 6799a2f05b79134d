//! Roster sort policy
//!
//! One active key at a time, ascending or descending.
//!
//! # Key ordering
//!
//! - `Position`: enumeration rank (GK=0 ... ST=11). A player without a
//!   position ranks before GK.
//! - `MarketValue`: numeric, a missing value reads as zero.
//! - `Name`, `Nationality`, `Team`: case-insensitive, with the raw string as
//!   tie-break so the order is total.
//!
//! The underlying sort is stable. Descending reverses the comparator rather
//! than the output, so equal elements keep their input order in both
//! directions and re-sorting never moves anything.

use sqb_schemas::PlayerView;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Position,
    MarketValue,
    Nationality,
    Team,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Position => "position",
            SortKey::MarketValue => "market_value",
            SortKey::Nationality => "nationality",
            SortKey::Team => "team",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "name" => Ok(SortKey::Name),
            "position" | "pos" => Ok(SortKey::Position),
            "market_value" | "value" => Ok(SortKey::MarketValue),
            "nationality" => Ok(SortKey::Nationality),
            "team" => Ok(SortKey::Team),
            other => Err(format!(
                "invalid sort key '{}'. expected one of: name | position | market_value | nationality | team",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort. `key == None` leaves the input order untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::by(key, SortDirection::Ascending)
    }

    /// Header-click semantics: the active key while ascending flips to
    /// descending; anything else becomes `key` ascending.
    pub fn requested(self, key: SortKey) -> Self {
        if self.key == Some(key) && self.direction == SortDirection::Ascending {
            Self::by(key, SortDirection::Descending)
        } else {
            Self::ascending(key)
        }
    }

    pub fn request(&mut self, key: SortKey) {
        *self = self.requested(key);
    }
}

fn position_rank(v: &PlayerView) -> Option<u8> {
    v.player.position.map(|p| p.rank())
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Ascending comparison of two views under `key`.
pub fn compare_by(key: SortKey, a: &PlayerView, b: &PlayerView) -> Ordering {
    match key {
        SortKey::Name => cmp_text(&a.player.name, &b.player.name),
        SortKey::Position => position_rank(a).cmp(&position_rank(b)),
        SortKey::MarketValue => a
            .player
            .market_value_or_zero()
            .total_cmp(&b.player.market_value_or_zero()),
        SortKey::Nationality => cmp_text(&a.nationality, &b.nationality),
        SortKey::Team => cmp_text(&a.team, &b.team),
    }
}

/// Sort `views` **in place** under `config`.
pub fn sort_players(views: &mut [PlayerView], config: SortConfig) {
    let Some(key) = config.key else {
        return;
    };
    match config.direction {
        SortDirection::Ascending => views.sort_by(|a, b| compare_by(key, a, b)),
        SortDirection::Descending => views.sort_by(|a, b| compare_by(key, a, b).reverse()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_toggles_same_key_and_resets_other() {
        let c = SortConfig::unsorted().requested(SortKey::Name);
        assert_eq!(c, SortConfig::ascending(SortKey::Name));

        let c = c.requested(SortKey::Name);
        assert_eq!(c, SortConfig::by(SortKey::Name, SortDirection::Descending));

        // descending on the same key goes back to ascending
        let c = c.requested(SortKey::Name);
        assert_eq!(c, SortConfig::ascending(SortKey::Name));

        let mut c = SortConfig::by(SortKey::Team, SortDirection::Descending);
        c.request(SortKey::MarketValue);
        assert_eq!(c, SortConfig::ascending(SortKey::MarketValue));
    }

    #[test]
    fn sort_key_parse_accepts_cli_spellings() {
        assert_eq!("market-value".parse::<SortKey>().unwrap(), SortKey::MarketValue);
        assert_eq!("Position".parse::<SortKey>().unwrap(), SortKey::Position);
        assert!("age".parse::<SortKey>().is_err());
    }
}
