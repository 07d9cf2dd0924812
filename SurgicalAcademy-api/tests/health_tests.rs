mod common;

use axum::http::{header, Method, StatusCode};

use common::{request, spawn_app};

#[tokio::test]
async fn test_health_reports_database() {
    let app = spawn_app().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert_eq!(body["components"]["database"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_security_headers_and_docs() {
    let app = spawn_app().await;

    let response = app.send(request(Method::GET, "/api/categories", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");

    let (status, doc) = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"], "SurgicalAcademy API");
    assert!(doc["paths"]["/api/ai-search"].is_object());
}
