// SurgicalAcademy-api lib.rs
//
// HTTP surface of the SurgicalAcademy platform: router, handlers, request
// entities, OpenAPI document and startup configuration.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
