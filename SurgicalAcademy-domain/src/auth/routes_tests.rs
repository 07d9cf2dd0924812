use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::auth::routes::{auth_routes, AuthState};
use crate::auth::{Passwords, SessionGate, TokenConfig};
use crate::entities::SignupInput;
use crate::services::UserService;
use surgical_academy_data::database::DatabasePool;
use surgical_academy_data::repository::UserRepository;

// Define a constant for the body size limit
const BODY_SIZE_LIMIT: usize = 1024 * 1024;

async fn state_with_user() -> AuthState {
    let pool = DatabasePool::in_memory().unwrap();
    let users = UserService::new(
        Arc::new(UserRepository::new(pool)),
        Passwords::with_params(8, 1, 1).unwrap(),
    );
    users
        .signup(SignupInput {
            email: Some("resident@example.com".to_string()),
            password: Some("resident123".to_string()),
            full_name: Some("Ирина Волкова".to_string()),
            ..SignupInput::default()
        })
        .await
        .unwrap();

    AuthState {
        gate: SessionGate::new(TokenConfig::new("routes-test-secret", "surgical-academy-api")),
        users,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_bearer(uri: &str, method: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), BODY_SIZE_LIMIT).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn login(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({"email": "resident@example.com", "password": "resident123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn test_login_session_logout_flow() {
    let app: Router = auth_routes(state_with_user().await);

    let tokens = login(&app).await;
    assert_eq!(tokens["token_type"], "Bearer");
    assert_eq!(tokens["user"]["role"], "STUDENT");
    assert_eq!(tokens["user"]["name"], "Ирина Волкова");
    let access = tokens["access_token"].as_str().unwrap().to_string();

    let session = app.clone().oneshot(with_bearer("/session", "GET", &access)).await.unwrap();
    assert_eq!(session.status(), StatusCode::OK);
    assert_eq!(json_body(session).await["email"], "resident@example.com");

    let logout = app.clone().oneshot(with_bearer("/logout", "POST", &access)).await.unwrap();
    assert_eq!(logout.status(), StatusCode::OK);

    let after = app.oneshot(with_bearer("/session", "GET", &access)).await.unwrap();
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app: Router = auth_routes(state_with_user().await);

    let wrong = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({"email": "resident@example.com", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    let unknown = app
        .oneshot(post_json(
            "/login",
            json!({"email": "nobody@example.com", "password": "resident123"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(wrong).await, json_body(unknown).await);
}

#[tokio::test]
async fn test_refresh_requires_refresh_token() {
    let app: Router = auth_routes(state_with_user().await);
    let tokens = login(&app).await;

    let refreshed = app
        .clone()
        .oneshot(post_json("/refresh", json!({"refresh_token": tokens["refresh_token"]})))
        .await
        .unwrap();
    assert_eq!(refreshed.status(), StatusCode::OK);
    let body = json_body(refreshed).await;
    assert!(body["access_token"].as_str().is_some());
    assert_eq!(body["expires_in"], 15 * 60);

    let with_access = app
        .clone()
        .oneshot(post_json("/refresh", json!({"refresh_token": tokens["access_token"]})))
        .await
        .unwrap();
    assert_eq!(with_access.status(), StatusCode::UNAUTHORIZED);

    let malformed = app.oneshot(post_json("/refresh", json!({"token": "x"}))).await.unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_requires_token() {
    let app: Router = auth_routes(state_with_user().await);
    let request = Request::builder().uri("/session").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "unauthorized");
}
