//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use marketplace::{AppState, create_router, middleware::Claims, middleware::TokenVerifier};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::util::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

/// Router over a fresh in-memory store
pub fn test_app() -> Router {
    create_router(AppState::in_memory(TokenVerifier::hs256(SECRET)))
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Token for `sub` with an email derived from it
pub fn token_for(sub: &str) -> String {
    token_with_email(sub, Some(&format!("{}@example.com", sub)))
}

pub fn token_with_email(sub: &str, email: Option<&str>) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        email: email.map(str::to_string),
        given_name: Some("Test".to_string()),
        family_name: Some(sub.to_string()),
        picture: Some(format!("https://img.example.com/{}.png", sub)),
        exp: now() + 600,
        iat: Some(now()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// POST a procedure call, optionally authenticated
pub async fn rpc(
    app: &Router,
    procedure: &str,
    token: Option<&str>,
    input: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/rpc/{}", procedure))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    send(app, builder.body(Body::from(input.to_string())).unwrap()).await
}

/// Anonymous GET
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Sync `sub` into the store and return its bearer token
pub async fn signed_up(app: &Router, sub: &str) -> String {
    let token = token_for(sub);
    let (status, _) = rpc(app, "user.sync", Some(&token), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    token
}
