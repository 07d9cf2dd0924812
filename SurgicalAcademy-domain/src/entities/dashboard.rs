use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use surgical_academy_data::models::{ArticleSummary, CourseSummary, ProgressSummary, UserStats};

/// What the caller may do from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Capabilities {
    pub can_create_content: bool,
    pub is_admin: bool,
}

/// Overview shown after login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Dashboard {
    pub stats: UserStats,
    pub recent_courses: Vec<CourseSummary>,
    pub featured_articles: Vec<ArticleSummary>,
    pub progress: Vec<ProgressSummary>,
    pub capabilities: Capabilities,
}
