#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use barista_adapters::JwksKeySource;
use barista_backend::auth::TokenVerifier;
use barista_backend::config::ServerConfig;
use barista_backend::{app, AppState};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const KID: &str = "barista-test-1";
pub const AUDIENCE: &str = "drinks";
pub const ISSUER: &str = "https://barista.example/";

pub const SIGNING_KEY: &[u8] = include_bytes!("../../../fixtures/signing_key.pem");
pub const UNTRUSTED_KEY: &[u8] = include_bytes!("../../../fixtures/untrusted_key.pem");
const JWKS: &str = include_str!("../../../fixtures/jwks.json");

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn verifier() -> Arc<TokenVerifier> {
    let keys = JwksKeySource::from_json(JWKS, Algorithm::RS256).unwrap();
    Arc::new(TokenVerifier::new(Arc::new(keys), AUDIENCE, Some(ISSUER)))
}

/// Claims valid for an hour. `None` leaves out the permissions claim.
pub fn claims(permissions: Option<&[&str]>) -> Value {
    let mut claims = json!({
        "iss": ISSUER,
        "sub": "auth0|barista",
        "aud": [AUDIENCE, "https://barista.example/userinfo"],
        "iat": now(),
        "exp": now() + 3600,
    });
    if let Some(permissions) = permissions {
        claims["permissions"] = json!(permissions);
    }
    claims
}

pub fn sign_with(claims: &Value, kid: Option<&str>, key_pem: &[u8]) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(key_pem).unwrap();
    encode(&header, claims, &key).unwrap()
}

pub fn sign(claims: &Value) -> String {
    sign_with(claims, Some(KID), SIGNING_KEY)
}

pub fn token_with(permissions: &[&str]) -> String {
    sign(&claims(Some(permissions)))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn router() -> (Router, AppState) {
    let state = AppState::new(verifier());
    let server = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
    };
    (app(state.clone(), &server), state)
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, bearer(token));
    }
    let body = match body {
        Some(body) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
