use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use surgical_academy_domain::entities::CreateFhirInput;

/// Request payload for storing a FHIR resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PublicCreateFhirRequest {
    /// FHIR resource type, e.g. Patient or Procedure
    #[validate(length(max = 64, message = "Resource type cannot exceed 64 characters"))]
    pub resource_type: Option<String>,

    /// The resource itself; must be a JSON object
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}

impl From<PublicCreateFhirRequest> for CreateFhirInput {
    fn from(request: PublicCreateFhirRequest) -> Self {
        Self {
            resource_type: request.resource_type,
            data: request.data,
        }
    }
}

/// Filter for the FHIR resource list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FhirListQuery {
    pub resource_type: Option<String>,
}
