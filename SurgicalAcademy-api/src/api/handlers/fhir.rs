use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use surgical_academy_data::models::FhirResource;
use surgical_academy_domain::auth::UserInfo;
use surgical_academy_domain::entities::FhirSample;

use super::error::{validated, ApiResult, ErrorResponse};
use crate::api::state::AppState;
use crate::entities::{FhirListQuery, PublicCreateFhirRequest};

/// Stored FHIR resources, newest first
#[utoipa::path(
    get,
    path = "/api/fhir/resources",
    params(FhirListQuery),
    responses(
        (status = 200, description = "FHIR resources", body = [FhirResource]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "fhir"
)]
#[instrument(skip(state))]
pub async fn list_resources(
    State(state): State<AppState>,
    query: Result<Query<FhirListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<FhirResource>>> {
    let Query(query) = query?;
    let resources = state
        .services
        .fhir
        .list(query.resource_type)
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to fetch FHIR resources"))?;
    Ok(Json(resources))
}

/// Store a FHIR resource authored by the caller
#[utoipa::path(
    post,
    path = "/api/fhir/resources",
    request_body = PublicCreateFhirRequest,
    responses(
        (status = 201, description = "Resource stored", body = FhirResource),
        (status = 400, description = "Missing type or data is not an object", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "fhir"
)]
#[instrument(skip(state, user, body), fields(user = %user.user_id))]
pub async fn create_resource(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<PublicCreateFhirRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FhirResource>)> {
    let request = validated(body)?;
    let resource = state
        .services
        .fhir
        .create(&user, request.into())
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to create FHIR resource"))?;

    info!(resource = %resource.id, resource_type = %resource.resource_type, "FHIR resource stored");
    Ok((StatusCode::CREATED, Json(resource)))
}

/// Example payloads for the supported resource types
#[utoipa::path(
    get,
    path = "/api/fhir/samples",
    responses(
        (status = 200, description = "Sample resources", body = [FhirSample]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "fhir"
)]
pub async fn list_samples(State(state): State<AppState>) -> Json<Vec<FhirSample>> {
    Json(state.services.fhir.samples().to_vec())
}
