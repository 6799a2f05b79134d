//! Scenario: secrets never live in config
//!
//! GREEN when:
//! - a literal password / token value fails with CONFIG_SECRET_DETECTED
//! - a credential-shaped string under any key fails too
//! - the error never echoes the value
//! - env var NAMES load fine and resolve through the environment

use sqb_config::{load_layered_yaml_from_strings, resolve_password, ClientConfig};

const YAML_WITH_PASSWORD: &str = r#"
auth:
  username: "kim"
  password: "correct horse battery"
"#;

const YAML_WITH_TOKEN_SHAPE: &str = r#"
api:
  base_url: "http://squads.local"
  extra_header: "ghp_abcdefghijklmnop"
"#;

const YAML_WITH_ENV_NAME: &str = r#"
auth:
  username: "kim"
  password_env: "SQB_KIM_PASSWORD"
"#;

#[test]
fn literal_password_is_rejected_without_echo() {
    let err = load_layered_yaml_from_strings(&[YAML_WITH_PASSWORD])
        .unwrap_err()
        .to_string();
    assert!(err.contains("CONFIG_SECRET_DETECTED"), "{err}");
    assert!(err.contains("/auth/password"), "{err}");
    assert!(!err.contains("horse"), "{err}");
}

#[test]
fn credential_shaped_value_is_rejected() {
    let err = load_layered_yaml_from_strings(&[YAML_WITH_TOKEN_SHAPE])
        .unwrap_err()
        .to_string();
    assert!(err.contains("/api/extra_header"), "{err}");
}

#[test]
fn secret_in_overlay_is_caught_after_merge() {
    let err = load_layered_yaml_from_strings(&[YAML_WITH_ENV_NAME, YAML_WITH_PASSWORD]);
    assert!(err.is_err());
}

#[test]
fn env_name_resolves_through_environment() {
    let loaded = load_layered_yaml_from_strings(&[YAML_WITH_ENV_NAME]).unwrap();
    let cfg = ClientConfig::from_json(&loaded.config_json).unwrap();
    assert_eq!(cfg.auth.username.as_deref(), Some("kim"));
    assert_eq!(cfg.auth.password_env, "SQB_KIM_PASSWORD");

    let env = |k: &str| (k == "SQB_KIM_PASSWORD").then(|| "pw".to_string());
    assert_eq!(resolve_password(&cfg.auth.password_env, env).unwrap(), "pw");
    assert!(resolve_password(&cfg.auth.password_env, |_| None).is_err());
}
