mod common;

use serde_json::json;

#[tokio::test]
async fn connection_request_then_list_by_initiator() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = server
        .post("/connections")
        .json(&json!({ "connectionId": "c1", "user1": "u1", "user2": "u2", "status": "pending" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    assert!(response
        .text()
        .starts_with("Connection request created with ID: "));

    server
        .post("/connections")
        .json(&json!({ "connectionId": "c2", "user1": "u2", "user2": "u1", "status": "pending" }))
        .await;

    let body: Vec<serde_json::Value> = server.get("/connections/u1").await.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["connectionId"], json!("c1"));

    let body: Vec<serde_json::Value> = server.get("/connections/u3").await.json();
    assert!(body.is_empty());
}

#[tokio::test]
async fn connection_accept_ignores_body() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    server
        .post("/connections")
        .json(&json!({ "connectionId": "c1", "user1": "u1", "user2": "u2", "status": "pending" }))
        .await;

    let response = server
        .patch("/connections/c1")
        .json(&json!({ "status": "blocked" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "1 connection(s) accepted");

    let stored = env.raw("connections", "connectionId", "c1").await.unwrap();
    assert_eq!(stored.get_str("status").unwrap(), "connected");
}

#[tokio::test]
async fn connection_remove_is_idempotent() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    server
        .post("/connections")
        .json(&json!({ "connectionId": "c1", "user1": "u1", "user2": "u2" }))
        .await;

    let response = server.delete("/connections/c1").await;
    assert_eq!(response.text(), "1 connection(s) removed");

    let response = server.delete("/connections/c1").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "0 connection(s) removed");
}

#[tokio::test]
async fn deleting_user_keeps_their_connections() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    server.post("/users").json(&json!({ "userId": "u1" })).await;
    server
        .post("/connections")
        .json(&json!({ "connectionId": "c1", "user1": "u1", "user2": "u2" }))
        .await;

    server.delete("/users/u1").await.assert_status_ok();

    let body: Vec<serde_json::Value> = server.get("/connections/u1").await.json();
    assert_eq!(body.len(), 1);
}
