// Domain entities and value objects
pub mod account;
pub mod course;
pub mod dashboard;
pub mod fhir;
pub mod query;
pub mod search;

// Re-export common types for easier imports
pub use account::{CreatedUser, SignupInput, SignupResult, UserList};
pub use course::{ArticleList, CourseList, CreateCourseInput};
pub use dashboard::{Capabilities, Dashboard};
pub use fhir::{CreateFhirInput, FhirSample};
pub use query::{ArticleQuery, CourseQuery, PageQuery, Pagination};
pub use search::{SearchInput, SearchResults};
