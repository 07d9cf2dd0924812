// Domain services
// Business rules over the repositories, one service per resource.

use std::sync::Arc;

use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::{PasswordError, Passwords, SecurityError};
use crate::completion::{CompletionClient, CompletionError};
use surgical_academy_data::database::DatabasePool;
use surgical_academy_data::repository::{
    ArticleRepository, CategoryRepository, CourseRepository, FhirRepository, ProgressRepository, RepositoryError,
    UserRepository,
};

pub mod ai_search;
pub mod article;
pub mod course;
pub mod dashboard;
pub mod fhir;
pub mod user;

pub use ai_search::AiSearchService;
pub use article::ArticleService;
pub use course::CourseService;
pub use dashboard::DashboardService;
pub use fhir::FhirService;
pub use user::UserService;

/// Errors shared by all domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before touching storage
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Unique value already taken
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Completion endpoint failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] CompletionError),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    /// Hashing or token failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<SecurityError> for ServiceError {
    fn from(err: SecurityError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Flatten validator errors into one `field: message; ...` line
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// Every service wired to one database pool
#[derive(Clone)]
pub struct Services {
    pub courses: CourseService,
    pub articles: ArticleService,
    pub users: UserService,
    pub fhir: FhirService,
    pub dashboard: DashboardService,
    pub search: AiSearchService,
}

impl Services {
    pub fn new(pool: DatabasePool, passwords: Passwords, completion: Arc<dyn CompletionClient>) -> Self {
        let courses = Arc::new(CourseRepository::new(pool.clone()));
        let articles = Arc::new(ArticleRepository::new(pool.clone()));
        let categories = Arc::new(CategoryRepository::new(pool.clone()));
        let users = Arc::new(UserRepository::new(pool.clone()));
        let progress = Arc::new(ProgressRepository::new(pool.clone()));
        let fhir = Arc::new(FhirRepository::new(pool));

        Self {
            courses: CourseService::new(courses.clone(), categories.clone()),
            articles: ArticleService::new(articles.clone(), categories),
            users: UserService::new(users.clone(), passwords),
            fhir: FhirService::new(fhir),
            dashboard: DashboardService::new(users, courses.clone(), articles.clone(), progress),
            search: AiSearchService::new(completion, courses, articles),
        }
    }
}
