use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{CategorySummary, Tag};
use super::user::AuthorSummary;

/// Article row joined with its author, category and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Markdown body
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub featured: bool,
    /// Estimated reading time in minutes
    pub read_time: Option<u32>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub category: Option<CategorySummary>,
    pub tags: Vec<Tag>,
}

/// Storage-level article filter; published-only is always applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub category_slug: Option<String>,
    pub search: Option<String>,
}
