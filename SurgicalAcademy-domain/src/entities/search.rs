use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use surgical_academy_data::models::{ArticleSummary, CourseSummary};

/// Context label used when the caller sends none
pub const DEFAULT_SEARCH_CONTEXT: &str = "search";

/// A relay search request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub query: Option<String>,
    pub context: Option<String>,
}

/// Local lookup results sent ahead of the streamed answer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SearchResults {
    pub courses: Vec<CourseSummary>,
    pub articles: Vec<ArticleSummary>,
}
