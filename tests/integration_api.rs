//! API Integration Tests
//!
//! Drive the full router (auth middleware, handlers, error mapping) over an
//! in-memory ledger.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use coin_wallet::domain::{SelfTransferPolicy, WalletPolicy};
use coin_wallet::ledger::LedgerOp;
use coin_wallet::MemoryLedgerStore;

mod common;

fn app() -> (Router, Arc<MemoryLedgerStore>) {
    let store = Arc::new(MemoryLedgerStore::new());
    (common::memory_app(store.clone(), WalletPolicy::default()), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth",
            None,
            json!({"username": username, "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn info(app: &Router, token: &str) -> Value {
    let (status, body) = send(app, get("/api/info", token)).await;
    assert_eq!(status, StatusCode::OK, "info failed: {}", body);
    body
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_new_employee_info() {
    let (app, _) = app();
    let token = login(&app, "alice").await;

    assert_eq!(
        info(&app, &token).await,
        json!({
            "coins": 1000,
            "inventory": [],
            "coinHistory": {"received": [], "sent": []}
        })
    );
}

#[tokio::test]
async fn test_send_coin_e2e() {
    let (app, store) = app();
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let (status, _) = send(
        &app,
        post_json("/api/sendCoin", Some(&alice), json!({"toUser": "bob", "amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let alice_info = info(&app, &alice).await;
    assert_eq!(alice_info["coins"], 900);
    assert_eq!(
        alice_info["coinHistory"]["sent"],
        json!([{"toUser": "bob", "amount": 100}])
    );

    let bob_info = info(&app, &bob).await;
    assert_eq!(bob_info["coins"], 1100);
    assert_eq!(
        bob_info["coinHistory"]["received"],
        json!([{"fromUser": "alice", "amount": 100}])
    );

    assert_eq!(store.transfer_count().await, 1);
}

#[tokio::test]
async fn test_buy_e2e() {
    let (app, _) = app();
    let token = login(&app, "alice").await;

    let (status, _) = send(&app, get("/api/buy/t-shirt", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, get("/api/buy/cup?quantity=2", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let body = info(&app, &token).await;
    assert_eq!(body["coins"], 1000 - 80 - 40);
    assert_eq!(
        body["inventory"],
        json!([{"type": "cup", "quantity": 2}, {"type": "t-shirt", "quantity": 1}])
    );
}

#[tokio::test]
async fn test_business_errors() {
    let (app, _) = app();
    let token = login(&app, "alice").await;
    login(&app, "bob").await;

    let cases = [
        (
            post_json("/api/sendCoin", Some(&token), json!({"toUser": "bob", "amount": 2000})),
            "insufficient_funds",
        ),
        (
            post_json("/api/sendCoin", Some(&token), json!({"toUser": "ghost", "amount": 5})),
            "recipient_not_found",
        ),
        (
            post_json("/api/sendCoin", Some(&token), json!({"toUser": "bob", "amount": 0})),
            "invalid_amount",
        ),
        (
            post_json("/api/sendCoin", Some(&token), json!({"toUser": "alice", "amount": 5})),
            "self_transfer",
        ),
        (get("/api/buy/yacht", &token), "item_not_found"),
        (get("/api/buy/cup?quantity=0", &token), "invalid_quantity"),
        (get("/api/buy/cup?quantity=many", &token), "invalid_request"),
        (
            post_json("/api/sendCoin", Some(&token), json!({"amount": 5})),
            "invalid_request",
        ),
    ];

    for (request, expected_code) in cases {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}: {}", expected_code, body);
        assert_eq!(body["error_code"], expected_code);
    }

    // Nothing above moved any coins
    assert_eq!(info(&app, &token).await["coins"], 1000);
}

#[tokio::test]
async fn test_self_transfer_allowed_by_policy() {
    let store = Arc::new(MemoryLedgerStore::new());
    let app = common::memory_app(
        store.clone(),
        WalletPolicy::default().with_self_transfer(SelfTransferPolicy::Allow),
    );
    let token = login(&app, "alice").await;

    let (status, _) = send(
        &app,
        post_json("/api/sendCoin", Some(&token), json!({"toUser": "alice", "amount": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info(&app, &token).await["coins"], 1000);
    assert_eq!(store.transfer_count().await, 1);
}

#[tokio::test]
async fn test_auth_errors() {
    let (app, _) = app();
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth",
            None,
            json!({"username": "alice", "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "invalid_credentials");

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/api/info")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "missing_header");

    let (status, body) = send(&app, get("/api/info", "not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "unauthorized");

    // A token from another deployment's secret
    let foreign = coin_wallet::auth::JwtAuthService::new("other", chrono::Duration::hours(1));
    let forged = coin_wallet::auth::AuthService::issue(&foreign, uuid::Uuid::new_v4()).unwrap();
    let (status, _) = send(&app, get("/api/info", &forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Sanity: the real token still works
    let (status, _) = send(&app, get("/api/info", &token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_login_payload() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        post_json("/api/auth", None, json!({"username": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth",
            None,
            json!({"username": "al ice", "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");
}

#[tokio::test]
async fn test_store_failure_is_opaque_500() {
    let (app, store) = app();
    let token = login(&app, "alice").await;

    store.fail(LedgerOp::Inventory, 1).await;
    let (status, body) = send(&app, get("/api/info", &token)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "store_error");
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_request_id_propagated() {
    let (app, _) = app();
    let token = login(&app, "alice").await;

    let mut request = get("/api/info", &token);
    request
        .headers_mut()
        .insert("x-request-id", "req-42".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
