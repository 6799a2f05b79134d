//! Scenario: browse and login commands against a mocked backend
//!
//! GREEN when:
//! - `players` resolves names, filters and sorts
//! - `SQB_API_BASE_URL` points the client at the backend
//! - a failed read exits non-zero
//! - `login` prints the verified user id
//! - `login` without a password source fails and names the env var

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;

fn sqb(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sqb").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SQB_API_BASE_URL")
        .env_remove("SQB_PASSWORD");
    cmd
}

fn mock_lookups(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/nationalities/");
        then.status(200)
            .json_body(json!({"nationalities": [{"id": 3, "name": "Spain"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/teams/");
        then.status(200)
            .json_body(json!({"teams": [{"id": 9, "name": "Rovers"}]}));
    });
}

#[test]
fn players_sorted_by_value_descending() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/players/");
        then.status(200).json_body(json!({
            "players": [
                {"id": 1, "name": "Ada", "position": "GK", "market_value": 10.0,
                 "nationality_id": 3, "team_id": 9},
                {"id": 2, "name": "Bo", "position": "ST", "market_value": 30.0,
                 "nationality_id": 3, "team_id": 9},
                {"id": 3, "name": "Cy", "position": "CB", "team_id": 9}
            ]
        }));
    });
    mock_lookups(&server);

    let dir = tempfile::tempdir().unwrap();
    let out = sqb(&dir)
        .env("SQB_API_BASE_URL", server.base_url())
        .args(["players", "--sort", "market_value", "--desc"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let ids: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.strip_prefix("id="))
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(ids, vec!["2", "1", "3"]);
    assert!(stdout.contains("nationality=\"Spain\""));
    assert!(stdout.contains("nationality=\"Unknown\""));
    assert!(stdout.contains("players=3"));
}

#[test]
fn players_filter_by_nationality_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/players/");
        then.status(200).json_body(json!({
            "players": [
                {"id": 1, "name": "Ada", "position": "GK", "nationality_id": 3, "team_id": 9},
                {"id": 3, "name": "Cy", "position": "CB", "team_id": 9}
            ]
        }));
    });
    mock_lookups(&server);

    let dir = tempfile::tempdir().unwrap();
    sqb(&dir)
        .args(["--base-url", &server.base_url()])
        .args(["players", "--nationality", "spa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name=\"Ada\""))
        .stdout(predicate::str::contains("name=\"Cy\"").not())
        .stdout(predicate::str::contains("players=1"));
}

#[test]
fn failed_read_exits_non_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/competitions/");
        then.status(500).body("boom");
    });

    let dir = tempfile::tempdir().unwrap();
    sqb(&dir)
        .args(["--base-url", &server.base_url(), "competitions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not load competitions"));
}

#[test]
fn login_prints_user_id() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/users/verify/")
            .json_body(json!({"username": "kim", "password": "pw-from-env"}));
        then.status(200).body("\"42\"");
    });

    let dir = tempfile::tempdir().unwrap();
    sqb(&dir)
        .env("SQB_PASSWORD", "pw-from-env")
        .args(["--base-url", &server.base_url()])
        .args(["login", "--username", "kim"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user_id=42"));
    m.assert();
}

#[test]
fn login_without_password_names_env_var() {
    let dir = tempfile::tempdir().unwrap();
    sqb(&dir)
        .args(["--base-url", "http://127.0.0.1:9"])
        .args(["login", "--username", "kim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SQB_PASSWORD"));
}
