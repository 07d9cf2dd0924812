#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use surgical_academy_api::api::{create_app, AppState};
use surgical_academy_data::models::{Difficulty, NewCourse};
use surgical_academy_data::repository::{
    CategoryRepository, CategoryRepositoryTrait, CourseRepository, CourseRepositoryTrait, UserRepository,
    UserRepositoryTrait,
};
use surgical_academy_domain::auth::{Passwords, TokenConfig};
use surgical_academy_domain::database::DatabasePool;
use surgical_academy_domain::seed::seed;
use surgical_academy_domain::testing::ScriptedCompletionClient;

pub const ADMIN: (&str, &str) = ("prof.sushkov@surgical-platform.com", "admin123");
pub const TEACHER: (&str, &str) = ("teacher1@surgical-platform.com", "teacher123");
pub const STUDENT: (&str, &str) = ("student1@surgical-platform.com", "student123");

pub struct TestApp {
    pub router: Router,
    pub completion: ScriptedCompletionClient,
    pub pool: DatabasePool,
}

/// Course written straight to storage, bypassing the API's unpublished default
pub struct CourseFixture {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub difficulty: Difficulty,
    pub featured: bool,
    pub published: bool,
}

/// Seeded in-memory application with a scripted completion upstream
pub async fn spawn_app_with(completion: ScriptedCompletionClient) -> TestApp {
    let pool = DatabasePool::in_memory().unwrap();
    let passwords = Passwords::with_params(8, 1, 1).unwrap();
    seed(&pool, &passwords).await.unwrap();

    let state = AppState::new(
        pool.clone(),
        TokenConfig::new("integration-test-secret", "surgical-academy-api"),
        passwords,
        Arc::new(completion.clone()),
        "test",
    );

    TestApp {
        router: create_app(state),
        completion,
        pool,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(ScriptedCompletionClient::with_chunks(["Рекомендуем ", "курс по лапароскопии."])).await
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send and decode the JSON body
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(request(Method::POST, uri, token, Some(body))).await
    }

    /// Insert `course` authored by the first teacher.
    ///
    /// Waits a few milliseconds afterwards so consecutive fixtures get
    /// distinct `created_at` values.
    pub async fn add_course(&self, course: CourseFixture) {
        let category = CategoryRepository::new(self.pool.clone())
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.slug == course.category)
            .unwrap();
        let author = UserRepository::new(self.pool.clone())
            .find_by_email(TEACHER.0.to_string())
            .await
            .unwrap()
            .unwrap();

        CourseRepository::new(self.pool.clone())
            .create(NewCourse {
                title: course.title.to_string(),
                slug: course.slug.to_string(),
                description: format!("{}: lectures and case reviews", course.title),
                short_description: None,
                cover_image: None,
                difficulty: course.difficulty,
                duration: Some(12),
                prerequisites: None,
                learning_objectives: Vec::new(),
                published: course.published,
                featured: course.featured,
                author_id: author.id,
                category_id: category.id,
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    /// Log in and return the access token
    pub async fn login(&self, (email, password): (&str, &str)) -> String {
        let (status, body) = self
            .post("/auth/login", None, json!({"email": email, "password": password}))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed for {}: {}", email, body);
        body["access_token"].as_str().unwrap().to_string()
    }
}

/// One server-sent event
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

/// Split an event-stream body into frames, skipping keep-alive comments
pub fn parse_frames(body: &str) -> Vec<Frame> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = Vec::new();
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event:") {
                    event = Some(name.trim_start().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
                }
            }
            event.map(|event| Frame {
                event,
                data: data.join("\n"),
            })
        })
        .collect()
}
