mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{request, spawn_app, ADMIN, STUDENT};

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let app = spawn_app().await;

    let protected = [
        (Method::GET, "/api/dashboard"),
        (Method::GET, "/api/fhir/resources"),
        (Method::POST, "/api/fhir/resources"),
        (Method::GET, "/api/fhir/samples"),
        (Method::POST, "/api/ai-search"),
        (Method::POST, "/api/courses"),
        (Method::GET, "/api/admin/users"),
        (Method::GET, "/auth/session"),
        (Method::POST, "/auth/logout"),
    ];

    for (method, uri) in protected {
        let (status, body) = app.call(request(method.clone(), uri, None, Some(json!({})))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "unauthorized");
        assert!(body.get("courses").is_none() && body.get("users").is_none());
    }

    let (status, _) = app.get("/api/dashboard", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_session_and_logout() {
    let app = spawn_app().await;
    let token = app.login(STUDENT).await;

    let (status, session) = app.get("/auth/session", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["email"], STUDENT.0);
    assert_eq!(session["role"], "STUDENT");

    let (status, body) = app.post("/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, _) = app.get("/api/dashboard", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_credentials_look_the_same() {
    let app = spawn_app().await;

    let (wrong_status, wrong_body) = app
        .post("/auth/login", None, json!({"email": ADMIN.0, "password": "wrong-password"}))
        .await;
    let (unknown_status, unknown_body) = app
        .post("/auth/login", None, json!({"email": "nobody@example.com", "password": "whatever"}))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_refresh_issues_a_working_access_token() {
    let app = spawn_app().await;
    let (_, login) = app
        .post("/auth/login", None, json!({"email": STUDENT.0, "password": STUDENT.1}))
        .await;
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let (status, body) = app
        .post("/auth/refresh", None, json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");

    let access = body["access_token"].as_str().unwrap();
    let (status, _) = app.get("/api/dashboard", Some(access)).await;
    assert_eq!(status, StatusCode::OK);

    // an access token is not a refresh token
    let (status, _) = app
        .post("/auth/refresh", None, json!({"refresh_token": access}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_the_refresh_token_too() {
    let app = spawn_app().await;
    let (_, login) = app
        .post("/auth/login", None, json!({"email": STUDENT.0, "password": STUDENT.1}))
        .await;
    let access = login["access_token"].as_str().unwrap();
    let refresh_token = login["refresh_token"].as_str().unwrap();

    // a second login of the same user is a separate session
    let (_, other) = app
        .post("/auth/login", None, json!({"email": STUDENT.0, "password": STUDENT.1}))
        .await;
    let other_access = other["access_token"].as_str().unwrap();

    let (status, _) = app.post("/auth/logout", Some(access), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/auth/refresh", None, json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert!(body.get("access_token").is_none());

    let (status, _) = app.get("/api/dashboard", Some(other_access)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_then_login() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/signup",
            None,
            json!({
                "email": "new.resident@example.com",
                "password": "resident1",
                "full_name": "Анна Кузнецова",
                "role": "TEACHER",
                "institution": "Городская больница №1"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["role"], "TEACHER");
    assert!(body["user"].get("password_hash").is_none());

    let token = app.login(("new.resident@example.com", "resident1")).await;
    let (status, session) = app.get("/auth/session", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["name"], "Анна Кузнецова");
}

#[tokio::test]
async fn test_signup_cannot_claim_admin() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/signup",
            None,
            json!({"email": "sneaky@example.com", "password": "secret12", "full_name": "Sneaky", "role": "ADMIN"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "STUDENT");
}

#[tokio::test]
async fn test_signup_rejects_duplicates_and_bad_input() {
    let app = spawn_app().await;
    let admin = app.login(ADMIN).await;
    let (_, before) = app.get("/api/admin/users", Some(&admin)).await;

    let (status, body) = app
        .post(
            "/api/signup",
            None,
            json!({"email": STUDENT.0, "password": "another1", "full_name": "Duplicate"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "User with this email already exists");

    let (_, after) = app.get("/api/admin/users", Some(&admin)).await;
    assert_eq!(before["pagination"]["total"], after["pagination"]["total"]);

    let (status, body) = app
        .post("/api/signup", None, json!({"email": "x@example.com", "password": "secret12"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email, password, and full name are required");

    let (status, _) = app
        .post(
            "/api/signup",
            None,
            json!({"email": "not-an-email", "password": "secret12", "full_name": "X"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/signup",
            None,
            json!({"email": "short@example.com", "password": "123", "full_name": "X"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let response = app
        .send(
            axum::http::Request::builder()
                .method(Method::POST)
                .uri("/api/signup")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_users_requires_admin_role() {
    let app = spawn_app().await;

    let student = app.login(STUDENT).await;
    let (status, body) = app.get("/api/admin/users", Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let admin = app.login(ADMIN).await;
    let (status, body) = app.get("/api/admin/users?page=1&limit=4", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 4);
    assert_eq!(body["pagination"]["total"], 6);
    assert_eq!(body["pagination"]["pages"], 2);
    assert!(users.iter().all(|user| user.get("password_hash").is_none()));
}
