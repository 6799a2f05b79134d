//! Scenario: the HTTP backend speaks the fixed REST contract
//!
//! GREEN when:
//! - list endpoints unwrap their `{ <entity>: [...] }` envelopes
//! - filtered players sends only present query parameters
//! - creates return the server-assigned id
//! - non-2xx statuses surface as `ApiError::Status`
//! - a missing envelope key surfaces as a data-shape error

use httpmock::prelude::*;
use serde_json::json;
use sqb_api::{ApiError, HttpBackend, SquadBackend};
use sqb_schemas::{Credentials, NewSquad, Position, SavedSlot, SlotPayload, SquadLimits};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new_with_base_url(server.base_url())
}

#[tokio::test]
async fn scenario_players_envelope_is_unwrapped() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/players/");
            then.status(200).json_body(json!({
                "players": [
                    {"id": 1, "name": "Ada", "position": "GK", "alternate_position": null,
                     "market_value": 10.0, "nationality_id": 3, "team_id": 9},
                    {"id": 2, "name": "Bo", "position": "ST", "team_id": 9}
                ]
            }));
        })
        .await;

    let players = backend(&server).list_players().await.unwrap();

    m.assert_async().await;
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].position, Some(Position::Gk));
    assert_eq!(players[1].market_value, None);
}

#[tokio::test]
async fn scenario_lookup_envelopes_are_unwrapped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/nationalities/");
            then.status(200)
                .json_body(json!({"nationalities": [{"id": 3, "name": "Spain"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/teams/");
            then.status(200)
                .json_body(json!({"teams": [{"id": 9, "name": "Rovers"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/competitions/");
            then.status(200)
                .json_body(json!({"competitions": [{"id": 5, "name": "League"}]}));
        })
        .await;

    let b = backend(&server);
    assert_eq!(b.list_nationalities().await.unwrap()[0].name, "Spain");
    assert_eq!(b.list_teams().await.unwrap()[0].id, 9);
    assert_eq!(b.list_competitions().await.unwrap()[0].name, "League");
}

#[tokio::test]
async fn scenario_filtered_players_sends_present_limits() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/players_filtered/")
                .query_param("competition_id", "5")
                .query_param("market_value", "1000");
            then.status(200)
                .json_body(json!([{"id": 4, "name": "Cy", "position": "CM", "team_id": 1}]));
        })
        .await;

    let players = backend(&server)
        .filtered_players(&SquadLimits {
            competition_id: Some(5),
            nationality_id: None,
            budget: Some(1000.0),
        })
        .await
        .unwrap();

    m.assert_async().await;
    assert_eq!(players[0].id, 4);
}

#[tokio::test]
async fn scenario_creates_return_server_ids() {
    let server = MockServer::start_async().await;
    let squad = server
        .mock_async(|when, then| {
            when.method(POST).path("/squads/").json_body(json!({
                "name": "New Squad", "formation_id": 1, "user_id": 7,
                "competition_id": null, "nationality_id": 3, "budget": 500.0
            }));
            then.status(200).json_body(json!({"id": 42, "name": "New Squad"}));
        })
        .await;
    let slot = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/squad_players/")
                .json_body(json!({"squad_id": 42, "player_id": 2, "position": "ST"}));
            then.status(200)
                .json_body(json!({"id": 99, "squad_id": 42, "player_id": 2}));
        })
        .await;

    let b = backend(&server);
    let squad_id = b
        .create_squad(&NewSquad {
            name: "New Squad".to_string(),
            formation_id: 1,
            user_id: 7,
            competition_id: None,
            nationality_id: Some(3),
            budget: 500.0,
        })
        .await
        .unwrap();
    assert_eq!(squad_id, 42);

    let saved = b
        .create_slot(&SlotPayload {
            squad_id,
            player_id: 2,
            position: Position::St,
        })
        .await
        .unwrap();

    squad.assert_async().await;
    slot.assert_async().await;
    assert_eq!(saved, SavedSlot::new(99, 2, Position::St));
}

#[tokio::test]
async fn scenario_update_and_delete_hit_slot_paths() {
    let server = MockServer::start_async().await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT).path("/squad_players/10");
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;
    let del = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/squad_players/10");
            then.status(204);
        })
        .await;

    let b = backend(&server);
    b.update_slot(
        10,
        &SlotPayload {
            squad_id: 1,
            player_id: 1,
            position: Position::Cb,
        },
    )
    .await
    .unwrap();
    b.delete_slot(10).await.unwrap();

    put.assert_async().await;
    del.assert_async().await;
}

#[tokio::test]
async fn scenario_squads_and_slots_for_user() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/squads_filtered/")
                .query_param("user_id", "7");
            then.status(200).json_body(json!([
                {"id": 42, "name": "Firsts", "user_id": 7, "formation_id": 1,
                 "competition_id": 5, "nationality_id": null, "budget": 1000.0}
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/players_in_squad/42");
            then.status(200).json_body(json!([
                {"id": 10, "player_id": 1, "position_in_squad": "GK"}
            ]));
        })
        .await;

    let b = backend(&server);
    let squads = b.user_squads(7).await.unwrap();
    assert_eq!(squads[0].limits().competition_id, Some(5));
    let slots = b.squad_slots(42).await.unwrap();
    assert_eq!(slots, vec![SavedSlot::new(10, 1, Position::Gk)]);
}

#[tokio::test]
async fn scenario_verify_user_accepts_string_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/users/verify/")
                .json_body(json!({"username": "kim", "password": "pw"}));
            then.status(200).json_body(json!("17"));
        })
        .await;

    let id = backend(&server)
        .verify_user(&Credentials {
            username: "kim".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(id, 17);
}

#[tokio::test]
async fn scenario_error_status_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/squad_players/5");
            then.status(404).body("Not found player-squad");
        })
        .await;

    let err = backend(&server).delete_slot(5).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            body: "Not found player-squad".to_string()
        }
    );
}

#[tokio::test]
async fn scenario_missing_envelope_key_is_data_shape_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/teams/");
            then.status(200).json_body(json!({"clubs": []}));
        })
        .await;

    let err = backend(&server).list_teams().await.unwrap_err();
    assert!(err.is_data_shape(), "got {err:?}");
}

#[tokio::test]
async fn scenario_unreachable_backend_is_transport_error() {
    let b = HttpBackend::new_with_base_url("http://127.0.0.1:1".to_string());
    let err = b.list_players().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
