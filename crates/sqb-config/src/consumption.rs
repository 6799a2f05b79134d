//! Consumed-key registry and unused-key report.
//!
//! A consumed pointer is a JSON-pointer prefix: "/api" would consume
//! "/api/base_url". A leaf not under any consumed prefix is unused.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::collect_leaf_pointers;

/// Every pointer `ClientConfig` reads. Keep in sync with `client.rs`.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/api/base_url",
    "/api/timeout_secs",
    "/squad/default_name",
    "/squad/default_budget",
    "/squad/formation_id",
    "/auth/username",
    "/auth/password_env",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Unused leaf pointers, sorted and unique.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Report leaves of `config_json` that no consumer reads.
///
/// `Warn` logs each unused leaf and returns the report; `Fail` errors when
/// any leaf is unused.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|leaf| !CONSUMED_POINTERS.iter().any(|p| covers(p, leaf)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        unused_leaf_pointers: unused,
    };

    match policy {
        UnusedKeyPolicy::Fail if !report.is_clean() => {
            bail!(
                "CONFIG_UNUSED_KEYS: {} unused config key(s): {:?}",
                report.unused_leaf_pointers.len(),
                report.unused_leaf_pointers
            );
        }
        UnusedKeyPolicy::Warn => {
            for leaf in &report.unused_leaf_pointers {
                warn!(key = %leaf, "unused config key");
            }
        }
        UnusedKeyPolicy::Fail => {}
    }

    Ok(report)
}

/// "/a/b" covers "/a/b" and "/a/b/c" but not "/a/bc".
fn covers(prefix: &str, leaf: &str) -> bool {
    match leaf.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_needs_a_segment_boundary() {
        assert!(covers("/api/base_url", "/api/base_url"));
        assert!(covers("/api", "/api/base_url"));
        assert!(!covers("/api/base", "/api/base_url"));
    }
}
