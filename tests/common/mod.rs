// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use reflectly::config::Config;
use reflectly::db::{Database, FirestoreDb, MemoryDb};
use reflectly::models::User;
use reflectly::routes::create_router;
use reflectly::services::{GoogleIdentity, GoogleIdentityVerifier, SessionClaims};
use reflectly::AppState;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// `kid` the static-key verifier trusts.
pub const TEST_KID: &str = "test-kid";

#[allow(dead_code)]
pub const GOOGLE_TEST_KEY: &[u8] = include_bytes!("../fixtures/google_test_key.pem");
pub const GOOGLE_TEST_PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/google_test_key.pub.pem");
/// Valid RSA key that the verifier does not trust.
#[allow(dead_code)]
pub const UNTRUSTED_KEY: &[u8] = include_bytes!("../fixtures/untrusted_key.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Test app on the in-memory store with a static Google signing key.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let decoding_key =
        DecodingKey::from_rsa_pem(GOOGLE_TEST_PUBLIC_KEY).expect("fixture public key");
    let verifier = GoogleIdentityVerifier::new_with_static_key(&config, TEST_KID, decoding_key)
        .expect("static verifier");

    let state = Arc::new(AppState::new(
        config,
        Database::Memory(MemoryDb::new()),
        Arc::new(verifier),
    ));

    (create_router(state.clone()), state)
}

/// Provision a user directly and mint a session token for them.
#[allow(dead_code)]
pub async fn signed_in_user(state: &AppState, email: &str) -> (User, String) {
    let identity = GoogleIdentity {
        subject: format!("sub-{email}"),
        email: email.to_string(),
        name: Some("Test User".to_string()),
        picture: None,
    };
    let user = state.users.find_or_create(&identity).await.unwrap();
    let session = state.sessions.issue(&user).unwrap();
    (user, session.token)
}

/// Sign arbitrary session claims with an HS256 key.
#[allow(dead_code)]
pub fn create_test_jwt(claims: &SessionClaims, signing_key: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Claims of a valid Google ID token for the test client.
#[allow(dead_code)]
pub fn google_claims(email: &str, name: Option<&str>) -> serde_json::Value {
    let now = now_secs();
    let mut claims = serde_json::json!({
        "iss": "https://accounts.google.com",
        "aud": Config::test_default().google_client_id.unwrap(),
        "sub": format!("google-{email}"),
        "email": email,
        "email_verified": true,
        "iat": now,
        "exp": now + 3600,
        "picture": "https://lh3.googleusercontent.com/a/test",
    });
    if let Some(name) = name {
        claims["name"] = serde_json::Value::from(name);
    }
    claims
}

/// Sign Google ID token claims with an RSA private key (PEM).
#[allow(dead_code)]
pub fn sign_google_id_token(claims: &serde_json::Value, private_key_pem: &[u8]) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());

    encode(
        &header,
        claims,
        &EncodingKey::from_rsa_pem(private_key_pem).unwrap(),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
