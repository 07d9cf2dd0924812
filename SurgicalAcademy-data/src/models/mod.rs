//! Storage models
//!
//! Rows as they are read from and written to SQLite, including the joined
//! summaries (author, category, counts) list endpoints return.

use thiserror::Error;

pub mod article;
pub mod catalog;
pub mod course;
pub mod fhir;
pub mod learning;
pub mod user;

pub use article::{ArticleFilter, ArticleSummary};
pub use catalog::{Category, CategorySummary, Tag};
pub use course::{CourseCounts, CourseDetail, CourseFilter, CourseSummary, Difficulty, Lesson, NewCourse};
pub use fhir::{FhirResource, NewFhirResource};
pub use learning::{ProgressCourse, ProgressSummary};
pub use user::{AuthorSummary, NewUser, User, UserRole, UserStats};

/// Error returned when a stored or submitted enum label is not recognized
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind} value: {value}")]
pub struct ParseEnumError {
    /// Which enum failed to parse
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

/// Offset-based window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Rows to skip
    pub offset: u64,
    /// Maximum rows to return
    pub limit: u64,
}

impl PageRequest {
    /// Window for a 1-based page number
    pub fn for_page(page: u64, limit: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offsets() {
        assert_eq!(PageRequest::for_page(1, 12), PageRequest { offset: 0, limit: 12 });
        assert_eq!(PageRequest::for_page(3, 12), PageRequest { offset: 24, limit: 12 });
        assert_eq!(PageRequest::for_page(0, 12).offset, 0);
    }
}
