// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end tests for the challenge-response authentication flow, driving
//! the axum router directly with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use alloy::signers::{local::PrivateKeySigner, SignerSync};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use tower::ServiceExt;
use wallet_auth_server::{
    auth::SessionTokenIssuer,
    config::AuthConfig,
    models::WalletAddress,
    state::AppState,
    storage::ChallengeDatabase,
};

const TEST_SECRET: &str = "integration-test-secret";

fn test_app() -> (Router, Arc<ChallengeDatabase>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Arc::new(
        ChallengeDatabase::open(&dir.path().join("auth.redb")).expect("Failed to open database"),
    );
    let config = AuthConfig {
        token_secret: TEST_SECRET.to_string(),
        challenge_ttl_secs: 300,
        token_ttl_secs: 86_400,
    };
    let app = wallet_auth_server::api::router(AppState::new(Arc::clone(&store), &config));
    (app, store, dir)
}

async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn sign(signer: &PrivateKeySigner, message: &str) -> String {
    let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
    format!("0x{}", alloy::hex::encode(signature.as_bytes()))
}

#[tokio::test]
async fn full_flow_issues_a_valid_session_token() {
    let (app, _store, _dir) = test_app();
    let signer = PrivateKeySigner::random();
    let address = format!("{:#x}", signer.address());

    // Request a challenge
    let (status, body) = post_json(
        &app,
        "/v1/auth/challenge",
        serde_json::json!({ "address": address }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().expect("challenge message");
    assert!(message.starts_with("Please prove you control this wallet by signing this random text: "));

    // Sign it and verify
    let signature = sign(&signer, message);
    let (status, body) = post_json(
        &app,
        "/v1/auth/verify",
        serde_json::json!({ "address": address, "signature": signature }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], address);

    // The token decodes with the server secret and binds a stable identity
    let token = body["accessToken"].as_str().expect("access token");
    let tokens = SessionTokenIssuer::new(TEST_SECRET, 86_400);
    let claims = tokens.decode(token).expect("token must validate");
    assert!(uuid::Uuid::parse_str(&claims.sub).is_ok());
    assert_eq!(claims.exp - claims.iat, 86_400);
}

#[tokio::test]
async fn challenge_accepts_checksummed_address_case() {
    let (app, store, _dir) = test_app();
    let signer = PrivateKeySigner::random();
    let lower = format!("{:#x}", signer.address());
    let upper = format!("0x{}", lower[2..].to_uppercase());

    let (status, _) = post_json(
        &app,
        "/v1/auth/challenge",
        serde_json::json!({ "address": upper }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Stored under the canonical lowercase key
    let canonical = WalletAddress::parse(&lower).unwrap();
    assert!(store.get_challenge(&canonical).unwrap().is_some());
}

#[tokio::test]
async fn verify_with_wrong_key_is_unauthorized() {
    let (app, _store, _dir) = test_app();
    let signer = PrivateKeySigner::random();
    let intruder = PrivateKeySigner::random();
    let address = format!("{:#x}", signer.address());

    let (_, body) = post_json(
        &app,
        "/v1/auth/challenge",
        serde_json::json!({ "address": address }),
    )
    .await;
    let message = body["message"].as_str().unwrap();

    let signature = sign(&intruder, message);
    let (status, body) = post_json(
        &app,
        "/v1/auth/verify",
        serde_json::json!({ "address": address, "signature": signature }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "invalid_signature");
}

#[tokio::test]
async fn verify_unknown_address_is_unauthorized() {
    let (app, _store, _dir) = test_app();
    let signer = PrivateKeySigner::random();
    let address = format!("{:#x}", signer.address());

    let signature = sign(&signer, "never challenged");
    let (status, body) = post_json(
        &app,
        "/v1/auth/verify",
        serde_json::json!({ "address": address, "signature": signature }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "identity_not_found");
}

#[tokio::test]
async fn verify_stale_challenge_is_unauthorized() {
    let (app, store, _dir) = test_app();
    let signer = PrivateKeySigner::random();
    let address = WalletAddress::parse(&format!("{:#x}", signer.address())).unwrap();

    // Plant a challenge issued just past the 5-minute window
    let issued_at = Utc::now() - chrono::Duration::seconds(301);
    store.upsert_challenge(&address, "stalenonce", issued_at).unwrap();

    let message = wallet_auth_server::auth::challenge_message("stalenonce");
    let signature = sign(&signer, &message);
    let (status, body) = post_json(
        &app,
        "/v1/auth/verify",
        serde_json::json!({ "address": address.as_str(), "signature": signature }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "challenge_expired");
}

#[tokio::test]
async fn replayed_signature_is_rejected_after_success() {
    let (app, _store, _dir) = test_app();
    let signer = PrivateKeySigner::random();
    let address = format!("{:#x}", signer.address());

    let (_, body) = post_json(
        &app,
        "/v1/auth/challenge",
        serde_json::json!({ "address": address }),
    )
    .await;
    let message = body["message"].as_str().unwrap();
    let signature = sign(&signer, message);

    let verify_body = serde_json::json!({ "address": address, "signature": signature });
    let (status, _) = post_json(&app, "/v1/auth/verify", verify_body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    // The challenge was consumed; the captured pair no longer authenticates
    let (status, body) = post_json(&app, "/v1/auth/verify", verify_body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "identity_not_found");
}

#[tokio::test]
async fn invalid_address_is_bad_request() {
    let (app, _store, _dir) = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/auth/challenge",
        serde_json::json!({ "address": "not-an-address" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_address");
}

#[tokio::test]
async fn reissued_challenge_supersedes_the_previous_one() {
    let (app, _store, _dir) = test_app();
    let signer = PrivateKeySigner::random();
    let address = format!("{:#x}", signer.address());

    let (_, first) = post_json(
        &app,
        "/v1/auth/challenge",
        serde_json::json!({ "address": address }),
    )
    .await;
    let (_, second) = post_json(
        &app,
        "/v1/auth/challenge",
        serde_json::json!({ "address": address }),
    )
    .await;
    assert_ne!(first["message"], second["message"]);

    // Only the latest prompt verifies
    let signature = sign(&signer, second["message"].as_str().unwrap());
    let (status, _) = post_json(
        &app,
        "/v1/auth/verify",
        serde_json::json!({ "address": address, "signature": signature }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_ok_with_open_database() {
    let (app, _store, _dir) = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["checks"]["database"], "ok");
}
