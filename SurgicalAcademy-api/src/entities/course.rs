use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use surgical_academy_domain::entities::CreateCourseInput;

/// Request payload for creating a course
///
/// Title, description and category are required; the course starts
/// unpublished with a slug derived from the title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PublicCreateCourseRequest {
    #[validate(length(max = 200, message = "Title cannot exceed 200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    /// Teaser shown in course lists
    #[validate(length(max = 500, message = "Short description cannot exceed 500 characters"))]
    pub short_description: Option<String>,

    /// Id of an existing category
    pub category_id: Option<String>,

    /// BEGINNER, INTERMEDIATE or ADVANCED (default BEGINNER)
    pub difficulty: Option<String>,

    /// Estimated duration in minutes
    #[validate(range(min = 1, max = 10000, message = "Duration must be between 1 and 10000 minutes"))]
    pub duration: Option<u32>,

    pub prerequisites: Option<String>,

    pub learning_objectives: Option<Vec<String>>,

    /// Cover image URL
    pub cover_image: Option<String>,
}

impl From<PublicCreateCourseRequest> for CreateCourseInput {
    fn from(request: PublicCreateCourseRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            short_description: request.short_description,
            category_id: request.category_id,
            difficulty: request.difficulty,
            duration: request.duration,
            prerequisites: request.prerequisites,
            learning_objectives: request.learning_objectives,
            cover_image: request.cover_image,
        }
    }
}
