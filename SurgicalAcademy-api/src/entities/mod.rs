// Public entities for the SurgicalAcademy API
// Request payloads as they arrive over HTTP; each converts into a domain input.
// Response bodies reuse the domain and data types directly.

// Course authoring
pub mod course;

// Account registration
pub mod account;

// FHIR resources
pub mod fhir;

// AI search relay
pub mod search;

pub use account::PublicSignupRequest;
pub use course::PublicCreateCourseRequest;
pub use fhir::{FhirListQuery, PublicCreateFhirRequest};
pub use search::PublicSearchRequest;
