use std::sync::{Arc, Once};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use surgical_academy_domain::health::{ComponentStatus as DomainComponentStatus, HealthServiceTrait, SystemStatus};

use crate::api::state::AppState;

/// Health check response with system information
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Details about various components of the system
    pub components: ComponentStatus,
    pub environment: String,
}

/// Status of individual system components
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Database connection status
    pub database: ComponentHealthStatus,
    /// API status
    pub api: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Track the time when the server started
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time used for `uptime`
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let _ = SERVER_START_TIME.set(unix_now());
    });
}

/// Health check endpoint to verify the API and its database
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 503, description = "Database is unavailable", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip_all)]
pub async fn health_check(
    State(state): State<AppState>,
    Extension(health_service): Extension<Arc<dyn HealthServiceTrait>>,
) -> impl IntoResponse {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;
    let component = |name: &str| {
        let entry = system_health.components.get(name);
        ComponentHealthStatus {
            status: map_component_status(
                entry
                    .map(|c| &c.status)
                    .unwrap_or(&DomainComponentStatus::Healthy),
            ),
            message: entry.and_then(|c| c.details.clone()),
        }
    };

    let components = ComponentStatus {
        database: component("database"),
        api: component("api"),
    };

    let (status_code, overall_status) = match system_health.status {
        SystemStatus::Healthy => (StatusCode::OK, "ok"),
        SystemStatus::Degraded => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        SystemStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, "error"),
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components,
        environment: state.environment.clone(),
    };

    (status_code, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use surgical_academy_domain::health::{HealthComponent, SystemHealth};

    #[derive(Debug)]
    struct BrokenDatabase;

    #[async_trait]
    impl HealthServiceTrait for BrokenDatabase {
        async fn get_system_health(&self) -> SystemHealth {
            let mut components = HashMap::new();
            components.insert(
                "database".to_string(),
                HealthComponent {
                    status: DomainComponentStatus::Unhealthy,
                    details: Some("Database connection error: pool timed out".to_string()),
                },
            );
            SystemHealth::from_components(components)
        }

        async fn check_database_status(&self) -> Result<(), String> {
            Err("pool timed out".to_string())
        }
    }

    #[test]
    fn test_component_status_labels() {
        assert_eq!(map_component_status(&DomainComponentStatus::Healthy), "ok");
        assert_eq!(map_component_status(&DomainComponentStatus::Degraded), "degraded");
        assert_eq!(map_component_status(&DomainComponentStatus::Unhealthy), "error");
    }

    #[tokio::test]
    async fn test_unhealthy_database_reports_503() {
        let state = crate::api::state::tests::test_state();
        let service: Arc<dyn HealthServiceTrait> = Arc::new(BrokenDatabase);

        let response = health_check(State(state), Extension(service)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["components"]["database"]["status"], "error");
        assert_eq!(json["components"]["api"]["status"], "ok");
    }
}
