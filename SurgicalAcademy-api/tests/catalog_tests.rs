mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use surgical_academy_data::models::Difficulty;

use common::{spawn_app, CourseFixture, TestApp, STUDENT, TEACHER};

fn slugs(list: &Value, key: &str) -> Vec<String> {
    list[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["slug"].as_str().unwrap().to_string())
        .collect()
}

async fn category_id(app: &TestApp, slug: &str) -> String {
    let (_, categories) = app.get("/api/categories", None).await;
    categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["slug"] == slug)
        .map(|c| c["id"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_course_list_is_featured_first_with_pagination() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"], json!({"page": 1, "limit": 12, "total": 3, "pages": 1}));

    let courses = body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 3);
    assert_eq!(courses.last().unwrap()["slug"], "gi-oncosurgery");
    assert!(courses[..2].iter().all(|c| c["featured"] == true));

    let first = &courses[0];
    assert!(first["author"]["full_name"].is_string());
    assert!(first["category"]["slug"].is_string());
    assert!(first["counts"]["lessons"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_course_list_filters() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/courses?category=oncology&difficulty=ADVANCED", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["courses"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 0);

    let (_, body) = app.get("/api/courses?category=oncology&difficulty=EXPERT", None).await;
    assert_eq!(slugs(&body, "courses"), vec!["gi-oncosurgery"]);

    let (_, body) = app.get("/api/courses?difficulty=ADVANCED", None).await;
    assert_eq!(slugs(&body, "courses"), vec!["emergency-abdominal-surgery"]);

    let (_, body) = app.get("/api/courses?featured=true", None).await;
    assert_eq!(body["pagination"]["total"], 2);

    // "холецистэктомии" in the title, matched case-insensitively
    let (_, body) = app
        .get("/api/courses?search=%D0%A5%D0%BE%D0%BB%D0%B5%D1%86%D0%B8%D1%81%D1%82", None)
        .await;
    assert_eq!(slugs(&body, "courses"), vec!["laparoscopic-cholecystectomy-basics"]);
}

/// Oncology/ADVANCED courses inserted oldest to newest, plus a draft and an
/// emergency-surgery course sharing the "Thoracoscopic" title word
async fn spawn_app_with_thoracic_courses() -> TestApp {
    let app = spawn_app().await;
    let fixtures = [
        ("thoracoscopic-lobectomy", "Thoracoscopic Lobectomy", "oncology", true, true),
        ("thoracoscopic-staging", "Thoracoscopic Staging", "oncology", false, true),
        ("thoracoscopic-esophagectomy", "Thoracoscopic Esophagectomy", "oncology", true, true),
        ("thoracoscopic-draft", "Thoracoscopic Draft", "oncology", true, false),
        ("thoracoscopic-trauma", "Thoracoscopic Trauma Care", "emergency-surgery", false, true),
    ];

    for (slug, title, category, featured, published) in fixtures {
        app.add_course(CourseFixture {
            slug,
            title,
            category,
            difficulty: Difficulty::Advanced,
            featured,
            published,
        })
        .await;
    }
    app
}

#[tokio::test]
async fn test_category_and_difficulty_filter_orders_featured_then_newest() {
    let app = spawn_app_with_thoracic_courses().await;

    let (status, body) = app.get("/api/courses?category=oncology&difficulty=ADVANCED", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        slugs(&body, "courses"),
        vec!["thoracoscopic-esophagectomy", "thoracoscopic-lobectomy", "thoracoscopic-staging"]
    );
    assert_eq!(body["pagination"]["total"], 3);

    for course in body["courses"].as_array().unwrap() {
        assert_eq!(course["category"]["slug"], "oncology");
        assert_eq!(course["difficulty"], "ADVANCED");
        assert_eq!(course["published"], true);
    }

    let (status, _) = app.get("/api/courses/thoracoscopic-draft", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_orders_featured_then_newest() {
    let app = spawn_app_with_thoracic_courses().await;

    let (status, body) = app.get("/api/courses?search=thoracoSCOPIC", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        slugs(&body, "courses"),
        vec![
            "thoracoscopic-esophagectomy",
            "thoracoscopic-lobectomy",
            "thoracoscopic-trauma",
            "thoracoscopic-staging",
        ]
    );
    assert_eq!(body["pagination"]["total"], 4);

    let (_, page) = app.get("/api/courses?search=thoracoscopic&limit=2&page=2", None).await;
    assert_eq!(slugs(&page, "courses"), vec!["thoracoscopic-trauma", "thoracoscopic-staging"]);
}

#[tokio::test]
async fn test_course_list_page_bounds() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/courses?limit=1&page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["courses"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"], json!({"page": 2, "limit": 1, "total": 3, "pages": 3}));

    let (_, body) = app.get("/api/courses?limit=1000", None).await;
    assert_eq!(body["pagination"]["limit"], 100);

    let (status, body) = app.get("/api/courses?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = app.get("/api/courses?difficulty=LEGENDARY", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/courses?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_course_detail() {
    let app = spawn_app().await;

    let (status, course) = app.get("/api/courses/laparoscopic-cholecystectomy-basics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(course["slug"], "laparoscopic-cholecystectomy-basics");

    let positions: Vec<u64> = course["lessons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|lesson| lesson["position"].as_u64().unwrap())
        .collect();
    assert_eq!(positions.len(), 4);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!course["tags"].as_array().unwrap().is_empty());

    let (status, body) = app.get("/api/courses/no-such-course", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");
}

#[tokio::test]
async fn test_teacher_creates_unpublished_course() {
    let app = spawn_app().await;
    let token = app.login(TEACHER).await;
    let category = category_id(&app, "general-surgery").await;

    let (status, course) = app
        .post(
            "/api/courses",
            Some(&token),
            json!({
                "title": "Основы шовной техники",
                "description": "Практический курс по наложению швов.",
                "category_id": category,
                "duration": 6
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["slug"], "основы-шовной-техники");
    assert_eq!(course["published"], false);
    assert_eq!(course["difficulty"], "BEGINNER");

    // unpublished courses stay out of the catalogue
    let (_, list) = app.get("/api/courses", None).await;
    assert_eq!(list["pagination"]["total"], 3);

    let (status, body) = app
        .post(
            "/api/courses",
            Some(&token),
            json!({
                "title": "Основы  шовной   техники",
                "description": "Тот же заголовок.",
                "category_id": category
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_course_creation_rules() {
    let app = spawn_app().await;
    let category = category_id(&app, "oncology").await;

    let student = app.login(STUDENT).await;
    let (status, body) = app
        .post(
            "/api/courses",
            Some(&student),
            json!({"title": "Курс", "description": "Описание", "category_id": category}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let teacher = app.login(TEACHER).await;
    let (status, body) = app
        .post("/api/courses", Some(&teacher), json!({"title": "Без описания"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title, description, and category are required");

    let (status, _) = app
        .post(
            "/api/courses",
            Some(&teacher),
            json!({"title": "Курс", "description": "Описание", "category_id": "missing-category"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/courses",
            Some(&teacher),
            json!({"title": "?!", "description": "Описание", "category_id": category}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_articles_and_categories() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/articles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 2);
    for article in body["articles"].as_array().unwrap() {
        assert!(article["read_time"].as_u64().unwrap() >= 1);
        assert!(article["excerpt"].is_string());
    }

    let (_, body) = app.get("/api/articles?category=general-surgery", None).await;
    assert!(body["articles"].as_array().unwrap().len() <= 2);

    let (status, article) = app.get("/api/articles/robotic-surgery-present-future", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(article["slug"], "robotic-surgery-present-future");

    let (status, _) = app.get("/api/articles/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, categories) = app.get("/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 4);
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}
