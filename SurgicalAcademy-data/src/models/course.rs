use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use super::catalog::{CategorySummary, Tag};
use super::user::AuthorSummary;
use super::ParseEnumError;

/// Course difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Stored label
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Intermediate => "INTERMEDIATE",
            Difficulty::Advanced => "ADVANCED",
            Difficulty::Expert => "EXPERT",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Ok(Difficulty::Beginner),
            "INTERMEDIATE" => Ok(Difficulty::Intermediate),
            "ADVANCED" => Ok(Difficulty::Advanced),
            "EXPERT" => Ok(Difficulty::Expert),
            _ => Err(ParseEnumError {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Related-record counts shown with every course
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CourseCounts {
    pub enrollments: u64,
    pub lessons: u64,
}

/// Course row joined with its author, category and counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: Option<String>,
    pub cover_image: Option<String>,
    pub difficulty: Difficulty,
    /// Expected length in hours
    pub duration: Option<u32>,
    pub prerequisites: Option<String>,
    pub learning_objectives: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub category: CategorySummary,
    pub counts: CourseCounts,
}

/// Single lesson of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: String,
    pub position: u32,
    /// Length in minutes
    pub duration: Option<u32>,
}

/// Course page payload: summary plus ordered lessons and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: CourseSummary,
    pub lessons: Vec<Lesson>,
    pub tags: Vec<Tag>,
}

/// Input for inserting a course
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: Option<String>,
    pub cover_image: Option<String>,
    pub difficulty: Difficulty,
    pub duration: Option<u32>,
    pub prerequisites: Option<String>,
    pub learning_objectives: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub author_id: String,
    pub category_id: String,
}

/// Storage-level course filter; published-only is always applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub category_slug: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    pub featured_only: bool,
}
