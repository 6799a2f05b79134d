//! sqb-config
//!
//! Layered YAML configuration for the squad builder client.
//!
//! - Documents merge in order: earlier are base, later override
//! - The merged document is hashed over its canonical JSON (sorted keys)
//! - Literal secrets are rejected; config stores env var NAMES only
//! - Leaves nobody reads are reported (`report_unused_keys`)
//! - `ClientConfig` is the typed view the client actually uses

mod client;
mod consumption;
mod secrets;

pub use client::{ApiConfig, AuthConfig, ClientConfig, SquadConfig, BASE_URL_ENV};
pub use consumption::{report_unused_keys, UnusedKeyPolicy, UnusedKeyReport, CONSUMED_POINTERS};
pub use secrets::{resolve_password, DEFAULT_PASSWORD_ENV};

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs = Vec::with_capacity(paths.len());
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        // An empty layer parses as null and contributes nothing.
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    secrets::enforce_no_secret_literals(&merged)?;

    // serde_json's default map is ordered by key, so this is canonical.
    let canonical_json =
        serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (k, v) in overlay_map {
                let prev = base_map.remove(&k).unwrap_or(Value::Null);
                base_map.insert(k, deep_merge(prev, v));
            }
            Value::Object(base_map)
        }
        (_, other) => other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Every leaf of `v` as a JSON pointer. A scalar root is `"/"`.
pub(crate) fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                let next = format!("{}/{}", prefix, k.replace('~', "~0").replace('/', "~1"));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{prefix}/{i}"), out);
            }
        }
        _ => out.push(if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_layers_override_and_extend() {
        let loaded = load_layered_yaml_from_strings(&[
            "api:\n  base_url: http://a\n  timeout_secs: 5\n",
            "api:\n  base_url: http://b\nsquad:\n  default_name: Firsts\n",
        ])
        .unwrap();
        let v = &loaded.config_json;
        assert_eq!(v.pointer("/api/base_url").unwrap(), "http://b");
        assert_eq!(v.pointer("/api/timeout_secs").unwrap(), 5);
        assert_eq!(v.pointer("/squad/default_name").unwrap(), "Firsts");
    }

    #[test]
    fn empty_layer_is_ignored() {
        let a = load_layered_yaml_from_strings(&["api:\n  timeout_secs: 5\n"]).unwrap();
        let b = load_layered_yaml_from_strings(&["api:\n  timeout_secs: 5\n", ""]).unwrap();
        assert_eq!(a.config_hash, b.config_hash);
    }

    #[test]
    fn leaf_pointers_escape_tokens() {
        let v = serde_json::json!({"a/b": {"c~d": 1}, "list": [true]});
        let mut out = Vec::new();
        collect_leaf_pointers(&v, "", &mut out);
        out.sort();
        assert_eq!(out, vec!["/a~1b/c~0d".to_string(), "/list/0".to_string()]);
    }
}
