use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::query::Pagination;
use surgical_academy_data::models::{ArticleSummary, CourseSummary};

/// A page of published courses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CourseList {
    pub courses: Vec<CourseSummary>,
    pub pagination: Pagination,
}

/// A page of published articles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ArticleList {
    pub articles: Vec<ArticleSummary>,
    pub pagination: Pagination,
}

/// Fields accepted when authoring a course.
///
/// Required fields are optional here so a missing one surfaces as a
/// validation message instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateCourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category_id: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<u32>,
    pub prerequisites: Option<String>,
    pub learning_objectives: Option<Vec<String>>,
    pub cover_image: Option<String>,
}
