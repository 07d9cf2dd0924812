use std::sync::Arc;

use tracing::{info, instrument};

use super::ServiceError;
use crate::auth::authorize::can_create_content;
use crate::auth::UserInfo;
use crate::entities::query::non_blank;
use crate::entities::{CourseList, CourseQuery, CreateCourseInput, Pagination};
use crate::text::generate_slug;
use surgical_academy_data::models::{CourseDetail, CourseFilter, CourseSummary, Difficulty, NewCourse};
use surgical_academy_data::repository::{CategoryRepositoryTrait, CourseRepositoryTrait};

/// Course catalogue and authoring
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
}

impl CourseService {
    pub fn new(courses: Arc<dyn CourseRepositoryTrait>, categories: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { courses, categories }
    }

    /// Published courses, featured first then newest
    #[instrument(skip(self))]
    pub async fn list(&self, query: CourseQuery) -> Result<CourseList, ServiceError> {
        let (page, limit, window) = query.paging().window().map_err(ServiceError::Validation)?;

        let difficulty = match non_blank(&query.difficulty) {
            Some(label) => Some(
                label
                    .parse::<Difficulty>()
                    .map_err(|e| ServiceError::Validation(e.to_string()))?,
            ),
            None => None,
        };

        let filter = CourseFilter {
            category_slug: non_blank(&query.category),
            difficulty,
            search: non_blank(&query.search),
            featured_only: query.featured.as_deref() == Some("true"),
        };

        let (courses, total) = self.courses.find(filter, window).await?;
        Ok(CourseList {
            courses,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Published course with its lessons and tags
    #[instrument(skip(self))]
    pub async fn detail(&self, slug: &str) -> Result<CourseDetail, ServiceError> {
        self.courses
            .find_published_by_slug(slug.to_string())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Course not found".to_string()))
    }

    /// Create an unpublished course authored by `author`
    #[instrument(skip(self, author, input), fields(author = %author.user_id))]
    pub async fn create(&self, author: &UserInfo, input: CreateCourseInput) -> Result<CourseSummary, ServiceError> {
        if !can_create_content(author.role) {
            return Err(ServiceError::Forbidden(
                "Only teachers and administrators can create courses".to_string(),
            ));
        }

        let (title, description, category_id) = match (
            non_blank(&input.title),
            non_blank(&input.description),
            non_blank(&input.category_id),
        ) {
            (Some(title), Some(description), Some(category_id)) => (title, description, category_id),
            _ => {
                return Err(ServiceError::Validation(
                    "Title, description, and category are required".to_string(),
                ))
            }
        };

        let difficulty = match non_blank(&input.difficulty) {
            Some(label) => label
                .parse::<Difficulty>()
                .map_err(|e| ServiceError::Validation(e.to_string()))?,
            None => Difficulty::default(),
        };

        if self.categories.find_by_id(category_id.clone()).await?.is_none() {
            return Err(ServiceError::Validation(format!("Category {} does not exist", category_id)));
        }

        let slug = generate_slug(&title);
        if slug.is_empty() {
            return Err(ServiceError::Validation(
                "Title must contain at least one letter or digit".to_string(),
            ));
        }

        let course = self
            .courses
            .create(NewCourse {
                title,
                slug,
                description,
                short_description: input.short_description,
                cover_image: input.cover_image,
                difficulty,
                duration: input.duration,
                prerequisites: input.prerequisites,
                learning_objectives: input.learning_objectives.unwrap_or_default(),
                published: false,
                featured: false,
                author_id: author.user_id.clone(),
                category_id,
            })
            .await?;

        info!(course_id = %course.id, slug = %course.slug, "course created");
        Ok(course)
    }
}
