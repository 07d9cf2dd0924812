use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::AuthorSummary;

/// Stored FHIR resource with its raw JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FhirResource {
    pub id: String,
    /// FHIR resource type, e.g. `Patient` or `Procedure`
    pub resource_type: String,
    /// The `id` field of the payload, when present
    pub fhir_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: serde_json::Value,
    /// The `status` field of the payload, when present
    pub status: Option<String>,
    pub author: Option<AuthorSummary>,
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a FHIR resource
#[derive(Debug, Clone)]
pub struct NewFhirResource {
    pub resource_type: String,
    pub fhir_id: Option<String>,
    pub data: serde_json::Value,
    pub status: Option<String>,
    pub author_id: Option<String>,
    pub synced_at: Option<DateTime<Utc>>,
}
