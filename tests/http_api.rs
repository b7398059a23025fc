//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, room list, room details).

#![allow(clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

mod common;

use common::TestServer;

#[tokio::test]
async fn health_endpoint_reports_rooms() {
    let server = TestServer::start().await;
    let _alice = server.join("room1", "Alice").await;

    let response = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["active_rooms"], 1);
}

#[tokio::test]
async fn rooms_list_is_empty_at_start() {
    let server = TestServer::start().await;

    let body: serde_json::Value = reqwest::get(format!("{}/api/v1/rooms", server.base_url()))
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");

    assert_eq!(body["rooms"], serde_json::json!([]));
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn rooms_list_shows_member_counts() {
    let server = TestServer::start().await;
    let _a = server.join("alpha", "Alice").await;
    let _b = server.join("alpha", "Bob").await;
    let _c = server.join("beta", "Carol").await;

    let body: serde_json::Value = reqwest::get(format!("{}/api/v1/rooms", server.base_url()))
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");

    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["rooms"][0]["room_id"], "alpha");
    assert_eq!(body["rooms"][0]["member_count"], 2);
    assert_eq!(body["rooms"][1]["room_id"], "beta");
    assert_eq!(body["rooms"][1]["member_count"], 1);
    assert!(body["rooms"][0]["created_at"].is_string());
}

#[tokio::test]
async fn rooms_list_paginates() {
    let server = TestServer::start().await;
    let _a = server.join("a", "A").await;
    let _b = server.join("b", "B").await;
    let _c = server.join("c", "C").await;

    let body: serde_json::Value = reqwest::get(format!(
        "{}/api/v1/rooms?page=2&per_page=2",
        server.base_url()
    ))
    .await
    .expect("request")
    .json()
    .await
    .expect("json body");

    assert_eq!(body["rooms"][0]["room_id"], "c");
    assert_eq!(body["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn room_detail_lists_members() {
    let server = TestServer::start().await;
    let _a = server.join("room1", "Alice").await;
    let _b = server.join("room1", "Bob").await;

    let response = reqwest::get(format!("{}/api/v1/rooms/room1", server.base_url()))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["room_id"], "room1");
    assert_eq!(body["member_count"], 2);
    assert_eq!(body["members"][0]["display_name"], "Alice");
    assert_eq!(body["members"][1]["display_name"], "Bob");
    assert!(body["members"][0]["connection_id"].is_string());
}

#[tokio::test]
async fn room_detail_not_found() {
    let server = TestServer::start().await;

    let response = reqwest::get(format!("{}/api/v1/rooms/nonexistent", server.base_url()))
        .await
        .expect("request");
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn session_limits_are_exposed() {
    let server = TestServer::start().await;

    let body: serde_json::Value = reqwest::get(format!("{}/config/session", server.base_url()))
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");

    assert_eq!(body["outbound_queue_capacity"], 256);
    assert_eq!(body["join_ack"], true);
}
