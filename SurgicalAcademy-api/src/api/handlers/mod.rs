pub mod accounts;
pub mod admin;
pub mod articles;
pub mod courses;
pub mod dashboard;
pub mod error;
pub mod fhir;
pub mod health;
pub mod search;

// Re-export handlers for easier imports
pub use accounts::signup;
pub use admin::list_users;
pub use articles::{get_article, list_articles, list_categories};
pub use courses::{create_course, get_course, list_courses};
pub use dashboard::dashboard;
pub use error::{ApiResult, ErrorResponse};
pub use fhir::{create_resource, list_resources, list_samples};
pub use health::health_check;
pub use search::ai_search;
