use std::sync::Arc;

use surgical_academy_domain::auth::routes::AuthState;
use surgical_academy_domain::auth::{Passwords, SessionGate, TokenConfig};
use surgical_academy_domain::completion::CompletionClient;
use surgical_academy_domain::database::DatabasePool;
use surgical_academy_domain::health::{HealthService, HealthServiceTrait};
use surgical_academy_domain::services::Services;

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub gate: SessionGate,
    pub health: Arc<dyn HealthServiceTrait>,
    /// Deployment name reported by `/health`
    pub environment: String,
}

impl AppState {
    pub fn new(
        pool: DatabasePool,
        tokens: TokenConfig,
        passwords: Passwords,
        completion: Arc<dyn CompletionClient>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            services: Services::new(pool.clone(), passwords, completion),
            gate: SessionGate::new(tokens),
            health: Arc::new(HealthService::new(pool)),
            environment: environment.into(),
        }
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            gate: self.gate.clone(),
            users: self.services.users.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use surgical_academy_domain::testing::ScriptedCompletionClient;

    /// Empty in-memory database with cheap password hashing
    pub(crate) fn test_state() -> AppState {
        AppState::new(
            DatabasePool::in_memory().unwrap(),
            TokenConfig::new("state-test-secret", "surgical-academy-api"),
            Passwords::with_params(8, 1, 1).unwrap(),
            Arc::new(ScriptedCompletionClient::with_chunks(["ok"])),
            "test",
        )
    }
}
