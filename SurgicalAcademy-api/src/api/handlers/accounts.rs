use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::instrument;

use surgical_academy_domain::entities::SignupResult;

use super::error::{validated, ApiResult, ErrorResponse};
use crate::api::state::AppState;
use crate::entities::PublicSignupRequest;

/// Register a student or teacher account
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = PublicSignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResult),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "accounts"
)]
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<PublicSignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignupResult>)> {
    let request = validated(body)?;
    let created = state
        .services
        .users
        .signup(request.into())
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to create user"))?;
    Ok((StatusCode::CREATED, Json(created)))
}
