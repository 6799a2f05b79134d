//! Typed client configuration extracted from the merged document.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::DEFAULT_PASSWORD_ENV;

/// Environment variable that overrides `/api/base_url`.
pub const BASE_URL_ENV: &str = "SQB_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadConfig {
    /// Name used when the first-save prompt is left blank.
    pub default_name: String,
    /// Budget sent when a new squad has none.
    pub default_budget: f64,
    pub formation_id: i64,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            default_name: "New Squad".to_string(),
            default_budget: 1_000_000_000.0,
            formation_id: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthConfig {
    pub username: Option<String>,
    /// NAME of the env var holding the password.
    pub password_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: None,
            password_env: DEFAULT_PASSWORD_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub squad: SquadConfig,
    pub auth: AuthConfig,
}

impl ClientConfig {
    /// Read every key in `CONSUMED_POINTERS`; absent keys keep their default.
    pub fn from_json(v: &Value) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            api: ApiConfig {
                base_url: read_str(v, "/api/base_url")?.unwrap_or(d.api.base_url),
                timeout_secs: read_u64(v, "/api/timeout_secs")?.unwrap_or(d.api.timeout_secs),
            },
            squad: SquadConfig {
                default_name: read_str(v, "/squad/default_name")?
                    .unwrap_or(d.squad.default_name),
                default_budget: read_f64(v, "/squad/default_budget")?
                    .unwrap_or(d.squad.default_budget),
                formation_id: read_i64(v, "/squad/formation_id")?
                    .unwrap_or(d.squad.formation_id),
            },
            auth: AuthConfig {
                username: read_str(v, "/auth/username")?,
                password_env: read_str(v, "/auth/password_env")?
                    .unwrap_or(d.auth.password_env),
            },
        })
    }

    /// Apply environment overrides. `env` maps a variable name to its value.
    pub fn with_env_overrides(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = env(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

fn lookup<'a>(v: &'a Value, ptr: &str) -> Option<&'a Value> {
    v.pointer(ptr).filter(|x| !x.is_null())
}

/// Blank strings count as absent.
fn read_str(v: &Value, ptr: &str) -> Result<Option<String>> {
    match lookup(v, ptr) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => bail!("config {ptr} must be a string, got {other}"),
    }
}

fn read_u64(v: &Value, ptr: &str) -> Result<Option<u64>> {
    match lookup(v, ptr) {
        None => Ok(None),
        Some(x) => match x.as_u64() {
            Some(n) => Ok(Some(n)),
            None => bail!("config {ptr} must be a non-negative integer, got {x}"),
        },
    }
}

fn read_i64(v: &Value, ptr: &str) -> Result<Option<i64>> {
    match lookup(v, ptr) {
        None => Ok(None),
        Some(x) => match x.as_i64() {
            Some(n) => Ok(Some(n)),
            None => bail!("config {ptr} must be an integer, got {x}"),
        },
    }
}

fn read_f64(v: &Value, ptr: &str) -> Result<Option<f64>> {
    match lookup(v, ptr) {
        None => Ok(None),
        Some(x) => match x.as_f64() {
            Some(n) => Ok(Some(n)),
            None => bail!("config {ptr} must be a number, got {x}"),
        },
    }
}
