use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use surgical_academy_domain::entities::SearchInput;

/// Free-text query for the AI search relay
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PublicSearchRequest {
    #[validate(length(max = 1000, message = "Query cannot exceed 1000 characters"))]
    pub query: Option<String>,

    /// Where the search was started from (default "search")
    pub context: Option<String>,
}

impl From<PublicSearchRequest> for SearchInput {
    fn from(request: PublicSearchRequest) -> Self {
        Self {
            query: request.query,
            context: request.context,
        }
    }
}
