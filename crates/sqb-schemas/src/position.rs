use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed 12-value position enumeration, declared in rank order.
///
/// Rank drives the position sort: GK=0 ... ST=11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Gk,
    Lb,
    Cb,
    Rb,
    Cdm,
    Cm,
    Cam,
    Rm,
    Lm,
    Rw,
    Lw,
    St,
}

impl Position {
    pub const ALL: [Position; 12] = [
        Position::Gk,
        Position::Lb,
        Position::Cb,
        Position::Rb,
        Position::Cdm,
        Position::Cm,
        Position::Cam,
        Position::Rm,
        Position::Lm,
        Position::Rw,
        Position::Lw,
        Position::St,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Gk => "GK",
            Position::Lb => "LB",
            Position::Cb => "CB",
            Position::Rb => "RB",
            Position::Cdm => "CDM",
            Position::Cm => "CM",
            Position::Cam => "CAM",
            Position::Rm => "RM",
            Position::Lm => "LM",
            Position::Rw => "RW",
            Position::Lw => "LW",
            Position::St => "ST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePositionError {
    pub input: String,
}

impl fmt::Display for ParsePositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid position '{}'. expected one of: GK | LB | CB | RB | CDM | CM | CAM | RM | LM | RW | LW | ST",
            self.input
        )
    }
}

impl std::error::Error for ParsePositionError {}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == code)
            .ok_or_else(|| ParsePositionError {
                input: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_follows_declaration_order() {
        assert_eq!(Position::Gk.rank(), 0);
        assert_eq!(Position::Cdm.rank(), 4);
        assert_eq!(Position::St.rank(), 11);
        for w in Position::ALL.windows(2) {
            assert!(w[0].rank() < w[1].rank());
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("cam".parse::<Position>().unwrap(), Position::Cam);
        assert_eq!(" st ".parse::<Position>().unwrap(), Position::St);
        assert!("SW".parse::<Position>().is_err());
    }

    #[test]
    fn serde_uses_upper_case_codes() {
        let json = serde_json::to_string(&Position::Cdm).unwrap();
        assert_eq!(json, "\"CDM\"");
        let back: Position = serde_json::from_str("\"LW\"").unwrap();
        assert_eq!(back, Position::Lw);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for p in Position::ALL {
            assert_eq!(p.to_string().parse::<Position>().unwrap(), p);
        }
    }
}
