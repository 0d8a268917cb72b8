// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Router-level errors use the same JSON envelope as handler errors.

use axum::http::{header, StatusCode};
use tower::ServiceExt;

mod common;
use common::{authed_request, body_json, signed_in_user};

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let (app, state) = common::create_test_app();
    let (_, token) = signed_in_user(&state, "ann@example.com").await;

    let response = app
        .oneshot(authed_request("GET", "/api/nothing-here", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_wrong_method_is_enveloped_405() {
    let (app, state) = common::create_test_app();
    let (_, token) = signed_in_user(&state, "ann@example.com").await;

    let response = app
        .oneshot(authed_request("PATCH", "/api/entries", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "method_not_allowed");
}

#[tokio::test]
async fn test_unknown_route_still_requires_auth() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/nothing-here")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "unauthorized");
}
