mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{spawn_app, ADMIN, STUDENT, TEACHER};

#[tokio::test]
async fn test_fhir_resources_round_trip() {
    let app = spawn_app().await;
    let token = app.login(TEACHER).await;

    let (status, seeded) = app.get("/api/fhir/resources", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded.as_array().unwrap().len(), 2);

    let (status, created) = app
        .post(
            "/api/fhir/resources",
            Some(&token),
            json!({
                "resource_type": "Observation",
                "data": {
                    "resourceType": "Observation",
                    "id": "obs-hr-001",
                    "status": "final",
                    "valueQuantity": {"value": 72, "unit": "уд/мин"}
                }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["fhir_id"], "obs-hr-001");
    assert_eq!(created["status"], "final");
    assert!(created["synced_at"].is_string());
    assert_eq!(created["data"]["valueQuantity"]["unit"], "уд/мин");

    let (_, all) = app.get("/api/fhir/resources", Some(&token)).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, observations) = app
        .get("/api/fhir/resources?resource_type=Observation", Some(&token))
        .await;
    let observations = observations.as_array().unwrap();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0]["author"]["full_name"], created["author"]["full_name"]);
}

#[tokio::test]
async fn test_fhir_create_validation() {
    let app = spawn_app().await;
    let token = app.login(STUDENT).await;

    let (status, body) = app
        .post("/api/fhir/resources", Some(&token), json!({"resource_type": "Patient"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ResourceType and data are required");

    let (status, _) = app
        .post(
            "/api/fhir/resources",
            Some(&token),
            json!({"resource_type": "Patient", "data": ["not", "an", "object"]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fhir_samples() {
    let app = spawn_app().await;
    let token = app.login(STUDENT).await;

    let (status, samples) = app.get("/api/fhir/samples", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let types: Vec<&str> = samples
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["resource_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["Patient", "Procedure", "Observation"]);
}

#[tokio::test]
async fn test_student_dashboard() {
    let app = spawn_app().await;
    let token = app.login(STUDENT).await;

    let (status, dashboard) = app.get("/api/dashboard", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(dashboard["stats"]["enrollments"], 2);
    assert_eq!(dashboard["stats"]["courses_authored"], 0);
    assert_eq!(dashboard["recent_courses"].as_array().unwrap().len(), 3);
    assert!(dashboard["featured_articles"].as_array().unwrap().len() <= 4);
    assert_eq!(
        dashboard["capabilities"],
        json!({"can_create_content": false, "is_admin": false})
    );

    let progress = dashboard["progress"].as_array().unwrap();
    assert!(!progress.is_empty());
    assert!(progress.iter().all(|p| p["course"]["slug"].is_string()));
}

#[tokio::test]
async fn test_admin_dashboard_capabilities() {
    let app = spawn_app().await;
    let token = app.login(ADMIN).await;

    let (status, dashboard) = app.get("/api/dashboard", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        dashboard["capabilities"],
        json!({"can_create_content": true, "is_admin": true})
    );
    assert!(dashboard["stats"]["courses_authored"].as_u64().unwrap() >= 1);
}
