// SurgicalAcademy Data
// This crate handles SQLite storage for the learning platform

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// Sample data for development databases
pub mod seed;
