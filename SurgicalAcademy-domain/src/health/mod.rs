//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use surgical_academy_data::database::DatabasePool;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Overall status is the worst component status
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Probe the database with a trivial query
    async fn check_database_status(&self) -> Result<(), String>;
}

/// Health checks backed by the application's database pool
#[derive(Debug, Clone)]
pub struct HealthService {
    pool: DatabasePool,
}

impl HealthService {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let database = match self.check_database_status().await {
            Ok(()) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(self.pool.connection_info()),
            },
            Err(e) => {
                warn!("Database health probe failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                }
            }
        };

        let api = HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        };

        SystemHealth::from_components(
            [("database".to_string(), database), ("api".to_string(), api)]
                .into_iter()
                .collect(),
        )
    }

    async fn check_database_status(&self) -> Result<(), String> {
        self.pool
            .ping()
            .await
            .map_err(|e| format!("Database connection error: {}", e))
    }
}
