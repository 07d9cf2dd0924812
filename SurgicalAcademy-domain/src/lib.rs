// SurgicalAcademy Domain
// Business logic for the SurgicalAcademy platform: accounts, catalogue, FHIR and the search relay

// Services that implement business logic
pub mod services;

// Authentication and authorization
pub mod auth;

// Streaming completion client for the search relay
pub mod completion;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Development data
pub mod seed;

pub mod text;

// Re-export the data crate's database module for convenience
pub use surgical_academy_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
