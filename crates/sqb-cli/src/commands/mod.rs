//! Command handler modules for the `sqb` binary.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

mod browse;
mod squad;

pub use browse::{
    candidates, competitions, login, nationalities, players, register, squads, teams,
    CandidatesArgs, PlayersArgs,
};
pub use squad::{squad_plan, squad_save, SquadArgs};

use anyhow::{Context, Result};
use clap::Args;
use sqb_api::HttpBackend;
use sqb_config::{load_layered_yaml, report_unused_keys, ClientConfig, UnusedKeyPolicy};
use sqb_roster::{RosterFilter, SortConfig, SortDirection, SortKey};
use sqb_schemas::{PlayerId, PlayerView, Position, SquadLimits};
use sqb_session::{App, PageState, SessionDefaults};
use std::path::PathBuf;
use tracing::info;

use crate::GlobalArgs;

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

/// Text/position/value filter plus sort, shared by `players` and `candidates`.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub position: Option<Position>,

    #[arg(long)]
    pub team: Option<String>,

    /// Inclusive market value ceiling (millions)
    #[arg(long)]
    pub max_value: Option<f64>,

    /// name | position | market_value | nationality | team
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl ViewArgs {
    pub fn filter(&self, nationality: Option<String>) -> RosterFilter {
        RosterFilter {
            name: self.name.clone(),
            position: self.position,
            nationality,
            team: self.team.clone(),
            max_market_value: self.max_value,
        }
    }

    pub fn sort_config(&self) -> SortConfig {
        match self.sort {
            None => SortConfig::unsorted(),
            Some(key) if self.desc => SortConfig::by(key, SortDirection::Descending),
            Some(key) => SortConfig::ascending(key),
        }
    }
}

/// Squad limits: the server-side eligibility filter.
#[derive(Args, Debug, Clone, Default)]
pub struct LimitArgs {
    #[arg(long)]
    pub competition: Option<i64>,

    /// Nationality id the squad is restricted to
    #[arg(long)]
    pub nationality: Option<i64>,

    /// Budget (millions)
    #[arg(long)]
    pub budget: Option<f64>,
}

impl LimitArgs {
    pub fn limits(&self) -> SquadLimits {
        SquadLimits {
            competition_id: self.competition,
            nationality_id: self.nationality,
            budget: self.budget,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Compute layered config hash and print canonical JSON.
pub fn config_hash(paths: &[PathBuf]) -> Result<()> {
    let loaded = load_layered_yaml(paths)?;
    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);
    Ok(())
}

/// Config from `--config` layers (defaults when none), then env, then flags.
pub fn client_config(g: &GlobalArgs) -> Result<ClientConfig> {
    let cfg = if g.config_paths.is_empty() {
        ClientConfig::default()
    } else {
        let loaded = load_layered_yaml(&g.config_paths)?;
        report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
        info!(config_hash = %loaded.config_hash, "config loaded");
        ClientConfig::from_json(&loaded.config_json)?
    };

    let mut cfg = cfg.with_env_overrides(|k| std::env::var(k).ok());
    if let Some(url) = g.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
        cfg.api.base_url = url.trim().to_string();
    }
    Ok(cfg)
}

pub fn build_app(cfg: &ClientConfig) -> Result<App<HttpBackend>> {
    let backend = HttpBackend::with_timeout(cfg.api.base_url.clone(), cfg.timeout())
        .context("build http backend")?;
    let defaults = SessionDefaults {
        squad_name: cfg.squad.default_name.clone(),
        budget: cfg.squad.default_budget,
        formation_id: cfg.squad.formation_id,
    };
    Ok(App::new(backend, defaults))
}

/// Unwrap a page, turning a failed read into the command's error.
pub fn ready<T>(page: PageState<T>) -> Result<T> {
    match page {
        PageState::Ready(t) => Ok(t),
        PageState::Failed(msg) => anyhow::bail!(msg),
    }
}

/// Parse a `--slot` value: `ID` or `ID:POS`.
pub fn parse_slot(s: &str) -> Result<(PlayerId, Option<Position>), String> {
    let (id, pos) = match s.split_once(':') {
        Some((id, pos)) => (id, Some(pos)),
        None => (s, None),
    };
    let id: PlayerId = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid slot '{s}'. expected ID or ID:POS"))?;
    let pos = pos
        .map(|p| p.parse::<Position>().map_err(|e| e.to_string()))
        .transpose()?;
    Ok((id, pos))
}

pub fn print_view(v: &PlayerView) {
    let position = v.player.position.map(|p| p.as_str()).unwrap_or("-");
    let value = v
        .player
        .market_value
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "id={} name={:?} position={} market_value={} nationality={:?} team={:?}",
        v.player.id, v.player.name, position, value, v.nationality, v.team
    );
}
