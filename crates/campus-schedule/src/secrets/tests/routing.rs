use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::secrets::{secrets_router, SecretVault};

fn request(method: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri("/secrets")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn payload(value: &str) -> serde_json::Value {
    json!({ "key": "JWT_KEY", "env": "dev", "value": value })
}

#[tokio::test]
async fn admin_can_add_secret() {
    let (vault, _) = vault();
    let router = secrets_router(vault, Some(ADMIN_TOKEN.to_string()));

    let response = router
        .oneshot(request("POST", Some(ADMIN_TOKEN), payload("value")))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "success": true, "message": "Secret added!" }));
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (vault, _) = vault();
    let router = secrets_router(vault, Some(ADMIN_TOKEN.to_string()));

    let response = router
        .oneshot(request("POST", None, payload("value")))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_add_is_forbidden() {
    let (vault, _) = vault();
    let router = secrets_router(vault, Some(ADMIN_TOKEN.to_string()));

    let response = router
        .oneshot(request("POST", Some("member-token"), payload("value")))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Access denied. You must be an admin!");
}

#[tokio::test]
async fn duplicate_add_conflicts() {
    let (vault, _) = vault();
    let router = secrets_router(vault, Some(ADMIN_TOKEN.to_string()));

    let first = router
        .clone()
        .oneshot(request("POST", Some(ADMIN_TOKEN), payload("one")))
        .await
        .expect("router responds");
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .oneshot(request("POST", Some(ADMIN_TOKEN), payload("two")))
        .await
        .expect("router responds");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = json_body(second).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn update_of_unknown_secret_is_not_found() {
    let (vault, _) = vault();
    let router = secrets_router(vault, None);

    let response = router
        .oneshot(request("PUT", Some("member-token"), payload("value")))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Secret doesn't exists! If you want to add it apply a POST call."
    );
}

#[tokio::test]
async fn repository_failure_hides_details() {
    let vault = Arc::new(SecretVault::new(Arc::new(UnavailableSecrets), cipher()));
    let router = secrets_router(vault, Some(ADMIN_TOKEN.to_string()));

    let response = router
        .oneshot(request("POST", Some(ADMIN_TOKEN), payload("value")))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Something bad happened!");
}
