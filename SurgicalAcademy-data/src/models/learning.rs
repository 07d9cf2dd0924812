use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::course::Difficulty;

/// Course fields shown next to a progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProgressCourse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub cover_image: Option<String>,
    pub difficulty: Difficulty,
}

/// A learner's progress through one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProgressSummary {
    pub course: ProgressCourse,
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub progress_percentage: f64,
    pub last_accessed_at: DateTime<Utc>,
}
