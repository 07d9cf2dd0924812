use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Types of authentication events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthEventType {
    /// Credentials login
    Login,
    /// User logout
    Logout,
    /// Token refresh
    TokenRefresh,
    /// Token revocation
    TokenRevocation,
    /// Account signup
    Registration,
    /// Failed login attempt
    FailedLogin,
    /// Access denied to resource
    AccessDenied,
    /// Token validation by the session gate
    TokenValidation,
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::Login => write!(f, "LOGIN"),
            AuthEventType::Logout => write!(f, "LOGOUT"),
            AuthEventType::TokenRefresh => write!(f, "TOKEN_REFRESH"),
            AuthEventType::TokenRevocation => write!(f, "TOKEN_REVOCATION"),
            AuthEventType::Registration => write!(f, "REGISTRATION"),
            AuthEventType::FailedLogin => write!(f, "FAILED_LOGIN"),
            AuthEventType::AccessDenied => write!(f, "ACCESS_DENIED"),
            AuthEventType::TokenValidation => write!(f, "TOKEN_VALIDATION"),
        }
    }
}

/// Authentication event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// Type of authentication event
    pub event_type: AuthEventType,
    /// User ID or email (if available)
    pub user_id: Option<String>,
    /// Timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
    /// Whether the event was successful
    pub success: bool,
    /// Additional details about the event
    pub details: Option<String>,
    /// The resource being accessed (if applicable)
    pub resource: Option<String>,
    /// Duration of the operation in milliseconds (if applicable)
    pub duration_ms: Option<u64>,
    /// Authentication method used (password, jwt, rbac)
    pub auth_method: Option<String>,
}

impl AuthEvent {
    /// Create a new authentication event
    pub fn new(event_type: AuthEventType, user_id: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            user_id: user_id.map(String::from),
            timestamp: Utc::now(),
            success,
            details: None,
            resource: None,
            duration_ms: None,
            auth_method: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }

    /// One-line rendering used by [`log_auth_event`]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "AUTH-LOG [{}] [{}] [{}] [{}] {}",
            self.event_type,
            self.user_id.as_deref().unwrap_or("anonymous"),
            if self.success { "SUCCESS" } else { "FAILURE" },
            self.timestamp.to_rfc3339(),
            self.details.as_deref().unwrap_or("")
        );

        if let Some(resource) = &self.resource {
            line.push_str(&format!(" resource={}", resource));
        }
        if let Some(method) = &self.auth_method {
            line.push_str(&format!(" method={}", method));
        }
        if let Some(duration) = self.duration_ms {
            line.push_str(&format!(" duration_ms={}", duration));
        }
        line
    }
}

/// Log an authentication event
pub fn log_auth_event(event: AuthEvent) {
    info!("{}", event.summary());
}

pub fn log_successful_login(user_id: &str) {
    log_auth_event(AuthEvent::new(AuthEventType::Login, Some(user_id), true).with_auth_method("password"));
}

/// `identifier` is the submitted email; the account may not exist
pub fn log_failed_login(identifier: &str, reason: &str) {
    let event = AuthEvent::new(AuthEventType::FailedLogin, Some(identifier), false)
        .with_details(reason)
        .with_auth_method("password");

    log_auth_event(event);
}

pub fn log_registration(user_id: &str, role: &str) {
    let event = AuthEvent::new(AuthEventType::Registration, Some(user_id), true)
        .with_details(format!("Registered with role {}", role));

    log_auth_event(event);
}

pub fn log_token_refresh(user_id: &str, success: bool, details: Option<&str>) {
    let mut event = AuthEvent::new(AuthEventType::TokenRefresh, Some(user_id), success);

    if let Some(d) = details {
        event = event.with_details(d);
    }

    log_auth_event(event);
}

pub fn log_logout(user_id: &str) {
    log_auth_event(AuthEvent::new(AuthEventType::Logout, Some(user_id), true));
}

pub fn log_token_revocation(user_id: &str, reason: Option<&str>) {
    let mut event = AuthEvent::new(AuthEventType::TokenRevocation, Some(user_id), true);

    if let Some(r) = reason {
        event = event.with_details(r);
    }

    log_auth_event(event);
}

pub fn log_access_denied(user_id: &str, resource: &str, required_roles: &[String]) {
    let details = format!("Required roles: {}", required_roles.join(", "));

    let event = AuthEvent::new(AuthEventType::AccessDenied, Some(user_id), false)
        .with_resource(resource)
        .with_details(details)
        .with_auth_method("rbac");

    log_auth_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_auth_event() {
        let event = AuthEvent::new(AuthEventType::Login, Some("user123"), true)
            .with_details("Login from dashboard")
            .with_resource("/auth/login")
            .with_duration(150)
            .with_auth_method("password");

        assert_eq!(event.event_type, AuthEventType::Login);
        assert_eq!(event.user_id, Some("user123".to_string()));
        assert!(event.success);
        assert_eq!(event.details, Some("Login from dashboard".to_string()));
        assert_eq!(event.resource, Some("/auth/login".to_string()));
        assert_eq!(event.duration_ms, Some(150));
        assert_eq!(event.auth_method, Some("password".to_string()));
    }

    #[test]
    fn test_summary_format() {
        let event = AuthEvent::new(AuthEventType::FailedLogin, None, false).with_details("Invalid email or password");
        let summary = event.summary();

        assert!(summary.starts_with("AUTH-LOG [FAILED_LOGIN] [anonymous] [FAILURE] ["));
        assert!(summary.ends_with("] Invalid email or password"));
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(AuthEventType::Registration.to_string(), "REGISTRATION");
        assert_eq!(AuthEventType::AccessDenied.to_string(), "ACCESS_DENIED");
        assert_eq!(AuthEventType::TokenValidation.to_string(), "TOKEN_VALIDATION");
    }
}
