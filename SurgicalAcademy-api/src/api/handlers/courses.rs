use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use surgical_academy_data::models::{CourseDetail, CourseSummary};
use surgical_academy_domain::auth::UserInfo;
use surgical_academy_domain::entities::{CourseList, CourseQuery};

use super::error::{validated, ApiResult, ErrorResponse};
use crate::api::state::AppState;
use crate::entities::PublicCreateCourseRequest;

/// List published courses, featured first
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseQuery),
    responses(
        (status = 200, description = "One page of courses", body = CourseList),
        (status = 400, description = "Invalid page or difficulty", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    query: Result<Query<CourseQuery>, QueryRejection>,
) -> ApiResult<Json<CourseList>> {
    let Query(query) = query?;
    let list = state
        .services
        .courses
        .list(query)
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to fetch courses"))?;
    Ok(Json(list))
}

/// Published course with its lessons and tags
#[utoipa::path(
    get,
    path = "/api/courses/{slug}",
    params(("slug" = String, Path, description = "Course slug")),
    responses(
        (status = 200, description = "Course found", body = CourseDetail),
        (status = 404, description = "No published course with this slug", body = ErrorResponse)
    ),
    tag = "courses"
)]
#[instrument(skip(state))]
pub async fn get_course(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<CourseDetail>> {
    let course = state
        .services
        .courses
        .detail(&slug)
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to fetch course"))?;
    Ok(Json(course))
}

/// Create an unpublished course authored by the caller
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = PublicCreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseSummary),
        (status = 400, description = "Missing fields or unknown category", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller may not author courses", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "courses"
)]
#[instrument(skip(state, user, body), fields(user = %user.user_id))]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<PublicCreateCourseRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CourseSummary>)> {
    let request = validated(body)?;
    let course = state
        .services
        .courses
        .create(&user, request.into())
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to create course"))?;

    info!(course = %course.id, slug = %course.slug, "Course created");
    Ok((StatusCode::CREATED, Json(course)))
}
