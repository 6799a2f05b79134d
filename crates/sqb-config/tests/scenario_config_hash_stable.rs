//! Scenario: config hash is stable
//!
//! GREEN when:
//! - the same input hashes identically across loads
//! - reordering keys within a document does not change the hash
//! - a changed value changes the hash
//! - layering from files matches layering from strings

use sqb_config::{load_layered_yaml, load_layered_yaml_from_strings};
use std::io::Write;

const BASE_YAML: &str = r#"
api:
  base_url: "http://squads.local:8000"
  timeout_secs: 10
squad:
  default_name: "New Squad"
  default_budget: 1000000000
  formation_id: 1
"#;

const BASE_YAML_REORDERED: &str = r#"
squad:
  formation_id: 1
  default_budget: 1000000000
  default_name: "New Squad"
api:
  timeout_secs: 10
  base_url: "http://squads.local:8000"
"#;

const OVERLAY_YAML: &str = r#"
api:
  base_url: "https://squads.example.com"
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_eq!(a.config_hash.len(), 64);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn overlay_changes_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let layered = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(base.config_hash, layered.config_hash);
    assert_eq!(
        layered.config_json.pointer("/api/base_url").unwrap(),
        "https://squads.example.com"
    );
    // untouched keys survive the overlay
    assert_eq!(layered.config_json.pointer("/api/timeout_secs").unwrap(), 10);
}

#[test]
fn files_layer_like_strings() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.yaml");
    let overlay_path = dir.path().join("local.yaml");
    std::fs::File::create(&base_path)
        .unwrap()
        .write_all(BASE_YAML.as_bytes())
        .unwrap();
    std::fs::File::create(&overlay_path)
        .unwrap()
        .write_all(OVERLAY_YAML.as_bytes())
        .unwrap();

    let from_files = load_layered_yaml(&[&base_path, &overlay_path]).unwrap();
    let from_strings = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_eq!(from_files.config_hash, from_strings.config_hash);
}

#[test]
fn missing_file_is_an_error_naming_the_path() {
    let err = load_layered_yaml(&["/definitely/not/here.yaml"])
        .unwrap_err()
        .to_string();
    assert!(err.contains("/definitely/not/here.yaml"), "{err}");
}
