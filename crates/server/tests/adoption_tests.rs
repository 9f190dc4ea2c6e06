//! Integration tests for the adoption (lease) endpoint.

mod common;

use axum::http::StatusCode;
use common::{TestServer, json_request};
use serde_json::json;
use time::{Duration, OffsetDateTime};

async fn create_account(server: &TestServer, name: &str) {
    let (status, _) = json_request(
        &server.router,
        "POST",
        "/accounts",
        Some(json!({"account_name": name, "token": "tok"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn claim_marks_account_adopted() {
    let server = TestServer::new();
    create_account(&server, "acct1").await;

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/accounts/acct1/adopt",
        Some(json!({"action": "claim", "adopted_by": "vps-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "claimed");
    assert_eq!(body["account_name"], "acct1");
    assert_eq!(body["adopted_by"], "vps-1");

    let (_, body) = json_request(&server.router, "GET", "/accounts/acct1", None).await;
    assert_eq!(body["adopted"], true);
    assert_eq!(body["adopted_by"], "vps-1");
    assert!(body["adopted_at"].is_string());
}

#[tokio::test]
async fn claim_requires_adopted_by() {
    let server = TestServer::new();
    create_account(&server, "acct1").await;

    for body in [
        json!({"action": "claim"}),
        json!({"action": "claim", "adopted_by": ""}),
    ] {
        let (status, response) = json_request(
            &server.router,
            "POST",
            "/accounts/acct1/adopt",
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response["error"], "bad_request");
    }
}

#[tokio::test]
async fn adopt_rejects_unknown_actions() {
    let server = TestServer::new();
    create_account(&server, "acct1").await;

    for body in [
        Some(json!({"action": "steal", "adopted_by": "vps-1"})),
        Some(json!({"adopted_by": "vps-1"})),
        Some(json!({})),
        None,
    ] {
        let (status, response) =
            json_request(&server.router, "POST", "/accounts/acct1/adopt", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "bad_request");
    }
}

#[tokio::test]
async fn adopt_unknown_account_is_404() {
    let server = TestServer::new();

    for action in ["claim", "release"] {
        let (status, _) = json_request(
            &server.router,
            "POST",
            "/accounts/ghost/adopt",
            Some(json!({"action": action, "adopted_by": "vps-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn conflicting_claim_names_current_holder() {
    let server = TestServer::new();
    create_account(&server, "acct1").await;

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/accounts/acct1/adopt",
        Some(json!({"action": "claim", "adopted_by": "vps-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/accounts/acct1/adopt",
        Some(json!({"action": "claim", "adopted_by": "vps-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert!(
        body["message"].as_str().unwrap().contains("vps-1"),
        "conflict must name the current holder: {body}"
    );

    // The losing claim must not disturb the lease.
    let (_, body) = json_request(&server.router, "GET", "/accounts/acct1", None).await;
    assert_eq!(body["adopted_by"], "vps-1");
}

#[tokio::test]
async fn reclaim_by_same_holder_succeeds() {
    let server = TestServer::new();
    create_account(&server, "acct1").await;

    for _ in 0..2 {
        let (status, body) = json_request(
            &server.router,
            "POST",
            "/accounts/acct1/adopt",
            Some(json!({"action": "claim", "adopted_by": "vps-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "claimed");
    }
}

#[tokio::test]
async fn release_frees_account_without_holder_check() {
    let server = TestServer::new();
    create_account(&server, "acct1").await;

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/accounts/acct1/adopt",
        Some(json!({"action": "claim", "adopted_by": "vps-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No adopted_by given at all: release succeeds anyway.
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/accounts/acct1/adopt",
        Some(json!({"action": "release"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "released");
    assert_eq!(body["account_name"], "acct1");

    let (_, body) = json_request(&server.router, "GET", "/accounts/acct1", None).await;
    assert_eq!(body["adopted"], false);
    assert_eq!(body["adopted_by"], serde_json::Value::Null);

    // And the account is claimable by someone else.
    let (status, _) = json_request(
        &server.router,
        "POST",
        "/accounts/acct1/adopt",
        Some(json!({"action": "claim", "adopted_by": "vps-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn stale_lease_expires_on_next_read() {
    let server = TestServer::new();
    create_account(&server, "acct1").await;

    // Backdate a lease past the unlock timeout directly through the store.
    let mut accounts = server.state.accounts.load().await;
    accounts.get_mut("acct1").unwrap().set_adoption(
        "vps-1",
        OffsetDateTime::now_utc() - aviary_core::lease::UNLOCK_TIMEOUT - Duration::minutes(1),
    );
    server.state.accounts.persist(&accounts).await.unwrap();

    // Any read surfaces the account as free again.
    let (status, body) = json_request(&server.router, "GET", "/accounts/acct1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adopted"], false);

    // And a different worker can claim it.
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/accounts/acct1/adopt",
        Some(json!({"action": "claim", "adopted_by": "vps-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adopted_by"], "vps-2");
}
