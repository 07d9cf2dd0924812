use axum::{extract::State, Extension, Json};
use tracing::instrument;

use surgical_academy_domain::auth::UserInfo;
use surgical_academy_domain::entities::Dashboard;

use super::error::{ApiResult, ErrorResponse};
use crate::api::state::AppState;

/// Stats, recent content and progress of the caller
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard overview", body = Dashboard),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
#[instrument(skip(state, user), fields(user = %user.user_id))]
pub async fn dashboard(State(state): State<AppState>, Extension(user): Extension<UserInfo>) -> ApiResult<Json<Dashboard>> {
    let overview = state
        .services
        .dashboard
        .overview(&user)
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to load dashboard"))?;
    Ok(Json(overview))
}
