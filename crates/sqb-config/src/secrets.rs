//! Secret handling.
//!
//! Config YAML never carries a secret value. The login password is read
//! from the environment variable NAMED at `/auth/password_env`.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::collect_leaf_pointers;

/// Env var holding the password when `/auth/password_env` is absent.
pub const DEFAULT_PASSWORD_ENV: &str = "SQB_PASSWORD";

/// Prefixes of well-known credential formats.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",
    "sk_live",
    "sk_test",
    "AKIA",
    "-----BEGIN",
    "ghp_",
    "glpat-",
    "xoxb-",
    "eyJ", // JWT
];

/// Keys that must never hold a literal value.
const SECRET_KEYS: &[&str] = &["password", "token", "api_key", "secret"];

pub(crate) fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        let Some(s) = v.pointer(&ptr).and_then(Value::as_str) else {
            continue;
        };
        let key = ptr.rsplit('/').next().unwrap_or_default();
        if looks_like_secret(s) || (is_secret_key(key) && !s.trim().is_empty()) {
            bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 8 && SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k))
}

/// Resolve the login password from the environment.
///
/// `env` maps a variable name to its value; blank values count as unset.
/// Errors name the variable, never its value.
pub fn resolve_password(
    password_env: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    match env(password_env) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => bail!("password env var {password_env} is unset or empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_password_is_rejected() {
        let err = enforce_no_secret_literals(&json!({"auth": {"password": "hunter2"}}))
            .unwrap_err()
            .to_string();
        assert!(err.contains("CONFIG_SECRET_DETECTED"));
        assert!(err.contains("/auth/password"));
        assert!(!err.contains("hunter2"));
    }

    #[test]
    fn env_var_names_pass() {
        enforce_no_secret_literals(&json!({
            "auth": {"username": "kim", "password_env": "SQB_PASSWORD"}
        }))
        .unwrap();
    }

    #[test]
    fn resolve_password_reports_name_only() {
        let env = |k: &str| (k == "SET").then(|| "s3cret".to_string());
        assert_eq!(resolve_password("SET", env).unwrap(), "s3cret");
        let err = resolve_password("MISSING", env).unwrap_err().to_string();
        assert!(err.contains("MISSING"));
        assert!(!err.contains("s3cret"));
    }
}
