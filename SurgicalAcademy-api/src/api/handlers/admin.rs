use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::instrument;

use surgical_academy_domain::entities::{PageQuery, UserList};

use super::error::{ApiResult, ErrorResponse};
use crate::api::state::AppState;

/// Registered users, newest first
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of users", body = UserList),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<UserList>> {
    let Query(query) = query?;
    let users = state
        .services
        .users
        .list(query)
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to fetch users"))?;
    Ok(Json(users))
}
