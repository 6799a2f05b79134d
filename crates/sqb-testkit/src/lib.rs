//! sqb-testkit
//!
//! Deterministic fakes and fixtures for scenario tests across the workspace.

mod memory_backend;

pub use memory_backend::{BackendCall, MemoryBackend};

use sqb_schemas::{NamedEntity, Player, Position};

pub fn player(
    id: i64,
    name: &str,
    position: Option<Position>,
    market_value: Option<f64>,
    nationality_id: Option<i64>,
    team_id: i64,
) -> Player {
    Player {
        id,
        name: name.to_string(),
        position,
        alternate_position: None,
        market_value,
        nationality_id,
        team_id,
    }
}

/// Small fixed pool: three nationalities, two teams, one competition.
pub fn sample_players() -> Vec<Player> {
    use Position::*;
    vec![
        player(1, "Alisson", Some(Gk), Some(40.0), Some(1), 10),
        player(2, "Virgil", Some(Cb), Some(35.0), Some(2), 10),
        player(3, "Rodri", Some(Cdm), Some(110.0), Some(3), 20),
        player(4, "Bellingham", Some(Cam), Some(180.0), Some(4), 30),
        player(5, "Haaland", Some(St), Some(180.0), Some(5), 20),
        player(6, "Saka", Some(Rw), Some(130.0), Some(4), 40),
        player(7, "Trent", Some(Rb), None, Some(4), 10),
        player(8, "Unknown Kid", None, Some(0.5), None, 40),
    ]
}

pub fn sample_nationalities() -> Vec<NamedEntity> {
    vec![
        NamedEntity::new(1, "Brazil"),
        NamedEntity::new(2, "Netherlands"),
        NamedEntity::new(3, "Spain"),
        NamedEntity::new(4, "England"),
        NamedEntity::new(5, "Norway"),
    ]
}

pub fn sample_teams() -> Vec<NamedEntity> {
    vec![
        NamedEntity::new(10, "Liverpool"),
        NamedEntity::new(20, "Manchester City"),
        NamedEntity::new(30, "Real Madrid"),
        NamedEntity::new(40, "Arsenal"),
    ]
}

pub fn sample_competitions() -> Vec<NamedEntity> {
    vec![
        NamedEntity::new(100, "Premier League"),
        NamedEntity::new(200, "La Liga"),
    ]
}

/// [`MemoryBackend`] seeded with the sample pool. English clubs play in
/// competition 100, Real Madrid in 200.
pub fn seeded_backend() -> MemoryBackend {
    MemoryBackend::new()
        .with_players(sample_players())
        .with_lookups(sample_nationalities(), sample_teams(), sample_competitions())
        .with_team_competition(10, 100)
        .with_team_competition(20, 100)
        .with_team_competition(40, 100)
        .with_team_competition(30, 200)
}
