use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// A FHIR resource submitted by a user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateFhirInput {
    pub resource_type: Option<String>,
    pub data: Option<serde_json::Value>,
}

/// Example payload offered to users exploring FHIR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct FhirSample {
    pub resource_type: String,
    /// Human-readable label
    pub label: String,
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub data: serde_json::Value,
}
