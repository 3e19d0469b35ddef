//! Integration tests for the simulate/execute run surface.

mod common;

use axum::http::StatusCode;
use common::{
    build_test_app, executable_config, get, library, ok_json, post_json, reference_download,
    reference_manager, MemoryStore,
};

// ---------------------------------------------------------------------------
// Test: GET /api/v1/runs/simulate returns the would-delete report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn simulate_returns_report_without_deleting() {
    let download = reference_download();
    let store = MemoryStore::with(executable_config(vec![library("Radarr", "movies")]));
    let app = build_test_app(store, download.clone(), vec![reference_manager()]);

    let json = ok_json(get(&app, "/api/v1/runs/simulate").await).await;
    let data = &json["data"];

    assert_eq!(data["mode"], "simulate");
    assert_eq!(data["success"], true);
    assert_eq!(data["deleted_count"], 0);
    let items = data["libraries"][0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["outcome"], "would_delete");
    // Sorted by name: Alpha before Bravo.
    assert_eq!(items[0]["name"], "Alpha.2023");

    assert!(download.deleted().is_empty(), "simulate must not delete");
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/runs/execute without confirm is denied
// ---------------------------------------------------------------------------

#[tokio::test]
async fn execute_without_confirm_is_denied() {
    let download = reference_download();
    let store = MemoryStore::with(executable_config(vec![library("Radarr", "movies")]));
    let app = build_test_app(store, download.clone(), vec![reference_manager()]);

    let json = ok_json(
        post_json(&app, "/api/v1/runs/execute", serde_json::json!({})).await,
    )
    .await;
    let data = &json["data"];

    assert_eq!(data["success"], false);
    assert!(data["error"]
        .as_str()
        .unwrap()
        .contains("without confirmation"));
    assert!(download.deleted().is_empty());
}

// ---------------------------------------------------------------------------
// Test: confirmed execute deletes the eligible candidates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn confirmed_execute_deletes_candidates() {
    let download = reference_download();
    let store = MemoryStore::with(executable_config(vec![library("Radarr", "movies")]));
    let app = build_test_app(store, download.clone(), vec![reference_manager()]);

    let json = ok_json(
        post_json(
            &app,
            "/api/v1/runs/execute",
            serde_json::json!({"confirm": true}),
        )
        .await,
    )
    .await;
    let data = &json["data"];

    assert_eq!(data["mode"], "execute");
    assert_eq!(data["success"], true);
    assert_eq!(data["deleted_count"], 2);

    let mut deleted = download.deleted();
    deleted.sort();
    assert_eq!(deleted, vec!["aaa", "bbb"]);
}

// ---------------------------------------------------------------------------
// Test: dry-run config turns a confirmed execute into a gate denial
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dry_run_config_denies_confirmed_execute() {
    let download = reference_download();
    let mut config = executable_config(vec![library("Radarr", "movies")]);
    config.dry_run = true;
    let store = MemoryStore::with(config);
    let app = build_test_app(store, download.clone(), vec![reference_manager()]);

    let json = ok_json(
        post_json(
            &app,
            "/api/v1/runs/execute",
            serde_json::json!({"confirm": true}),
        )
        .await,
    )
    .await;
    let data = &json["data"];

    assert_eq!(data["success"], false);
    assert!(data["error"].as_str().unwrap().contains("dry-run"));
    assert!(download.deleted().is_empty());
}

// ---------------------------------------------------------------------------
// Test: invalid operator config is rejected before the run starts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_operator_config_maps_to_400() {
    let download = reference_download();
    let mut config = executable_config(vec![library("Radarr", "movies")]);
    config.max_delete_percent = Some(500.0);
    let store = MemoryStore::with(config);
    let app = build_test_app(store, download, vec![reference_manager()]);

    let response = get(&app, "/api/v1/runs/simulate").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
