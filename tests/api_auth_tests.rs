// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid session tokens
//! 2. Tokens are accepted from the cookie or the Authorization header
//! 3. Public routes and CORS preflights bypass authentication

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use reflectly::services::SessionClaims;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_jwt, now_secs, signed_in_user};

fn claims_for(user: &reflectly::models::User, iat: i64, exp: i64) -> SessionClaims {
    SessionClaims {
        sub: user.email.clone(),
        iat,
        exp,
        user_id: user.id.clone(),
        full_name: user.full_name.clone(),
        picture_url: None,
    }
}

async fn get_profile(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app();

    let (status, body) = get_profile(
        app,
        Request::builder()
            .uri("/api/users/profile")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app();

    let (status, body) = get_profile(
        app,
        Request::builder()
            .uri("/api/entries")
            .header(header::AUTHORIZATION, "Bearer invalid_token")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "invalid_token");
}

#[tokio::test]
async fn test_protected_route_with_bearer_token() {
    let (app, state) = common::create_test_app();
    let (user, token) = signed_in_user(&state, "ann@example.com").await;

    let (status, body) = get_profile(
        app,
        common::authed_request("GET", "/api/users/profile", &token, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id);
    assert_eq!(body["email"], "ann@example.com");
    assert_eq!(body["fullName"], "Test User");
}

#[tokio::test]
async fn test_protected_route_with_cookie() {
    let (app, state) = common::create_test_app();
    let (user, token) = signed_in_user(&state, "ann@example.com").await;

    let (status, body) = get_profile(
        app,
        Request::builder()
            .uri("/api/users/profile")
            .header(header::COOKIE, format!("auth_token={token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (app, state) = common::create_test_app();
    let (user, _) = signed_in_user(&state, "ann@example.com").await;

    let now = now_secs();
    let token = create_test_jwt(
        &claims_for(&user, now - 7200, now - 3600),
        &state.config.jwt_signing_key,
    );

    let (status, _) = get_profile(
        app,
        common::authed_request("GET", "/api/users/profile", &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_older_than_max_age_rejected() {
    let (app, state) = common::create_test_app();
    let (user, _) = signed_in_user(&state, "ann@example.com").await;

    // Not expired, but issued 25 hours ago.
    let now = now_secs();
    let token = create_test_jwt(
        &claims_for(&user, now - 25 * 3600, now + 3600),
        &state.config.jwt_signing_key,
    );

    let (status, body) = get_profile(
        app,
        common::authed_request("GET", "/api/users/profile", &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "invalid_token");
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let (app, state) = common::create_test_app();
    let (user, _) = signed_in_user(&state, "ann@example.com").await;

    let now = now_secs();
    let token = create_test_jwt(
        &claims_for(&user, now, now + 3600),
        b"some_other_signing_key_32_bytes!",
    );

    let (status, _) = get_profile(
        app,
        common::authed_request("GET", "/api/users/profile", &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_profile_echoes_token() {
    let (app, state) = common::create_test_app();
    let (user, token) = signed_in_user(&state, "ann@example.com").await;

    let (status, body) = get_profile(
        app,
        common::authed_request("GET", "/api/auth/get-user-profile", &token, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id);
    assert_eq!(body["internalJwtToken"], token);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body.get("buildId").is_some());
}

#[tokio::test]
async fn test_unauthorized_response_has_security_headers() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/entries")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/entries")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/entries")
                .header(header::ORIGIN, "https://evil.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
