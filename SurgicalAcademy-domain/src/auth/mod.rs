//! Authentication module for the SurgicalAcademy API
//!
//! Provides the session gate that secures API endpoints with JWT bearer tokens,
//! password hashing, token revocation and role-based access control.

use std::time::{Duration as StdDuration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::logging::{log_auth_event, log_token_revocation, AuthEvent, AuthEventType};
use surgical_academy_data::models::{User, UserRole};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

// JWT handling
pub mod token;

// Argon2 password hashing
pub mod password;

// Revocation list for logged-out tokens
pub mod revocation;

// Authorization module for RBAC
pub mod authorize;

// Structured auth event logging
pub mod logging;

// Login, refresh, session and logout routes
pub mod routes;

#[cfg(test)]
mod routes_tests;

pub use password::{PasswordError, Passwords};
pub use revocation::RevocationList;
pub use token::{SecurityError, TokenConfig, TokenType};

/// Authentication claims for JSON Web Tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (as timestamp)
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Token id
    pub jti: String,
    /// Login session shared by the access and refresh tokens of one login
    pub sid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub token_type: TokenType,
}

impl Claims {
    /// Expiry as wall-clock time
    pub fn expires_at(&self) -> SystemTime {
        UNIX_EPOCH + StdDuration::from_secs(self.exp.max(0).unsigned_abs())
    }
}

/// Identity of an authenticated caller, available to handlers as an extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UserInfo {
    /// User ID
    pub user_id: String,
    pub email: String,
    /// Display name
    pub name: Option<String>,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub institution: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone().or_else(|| Some(user.full_name.clone())),
            role: user.role,
            specialization: user.specialization.clone(),
            institution: user.institution.clone(),
        }
    }
}

impl From<&Claims> for UserInfo {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            role: claims.role,
            specialization: claims.specialization.clone(),
            institution: claims.institution.clone(),
        }
    }
}

/// Access and refresh tokens issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues and validates session tokens; shared state of [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct SessionGate {
    tokens: TokenConfig,
    revoked: RevocationList,
}

impl SessionGate {
    pub fn new(tokens: TokenConfig) -> Self {
        Self {
            tokens,
            revoked: RevocationList::new(),
        }
    }

    pub fn revocations(&self) -> &RevocationList {
        &self.revoked
    }

    /// Start a login session: an access and a refresh token sharing one session id
    pub fn issue_tokens(&self, user: &UserInfo) -> Result<TokenPair, SecurityError> {
        let session_id = Uuid::new_v4().to_string();
        Ok(TokenPair {
            access_token: self.tokens.generate_token(user, TokenType::Access, &session_id)?,
            refresh_token: self.tokens.generate_token(user, TokenType::Refresh, &session_id)?,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.access_ttl.num_seconds(),
        })
    }

    /// Validate an access token and make sure it was not revoked
    pub fn validate_access(&self, token: &str) -> Result<Claims, SecurityError> {
        self.validate(token, TokenType::Access)
    }

    /// Exchange a refresh token for a new access token
    pub fn refresh(&self, refresh_token: &str) -> Result<(String, Claims), SecurityError> {
        let claims = self.validate(refresh_token, TokenType::Refresh)?;
        let access = self
            .tokens
            .generate_token(&UserInfo::from(&claims), TokenType::Access, &claims.sid)?;
        Ok((access, claims))
    }

    /// End the login session behind `claims`.
    ///
    /// Revokes the token itself and its session id; the session id stays
    /// revoked for the refresh lifetime so the session's refresh token is
    /// rejected as well.
    pub fn revoke(&self, claims: &Claims) {
        self.revoked.revoke(&claims.jti, claims.expires_at());
        let session_end = SystemTime::now() + self.tokens.refresh_ttl.to_std().unwrap_or_default();
        self.revoked.revoke(&claims.sid, session_end);
        log_token_revocation(&claims.sub, Some("Logout"));
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.tokens.access_ttl.num_seconds()
    }

    fn validate(&self, token: &str, expected: TokenType) -> Result<Claims, SecurityError> {
        let claims = self.tokens.validate_token(token, expected)?;
        if self.revoked.is_revoked(&claims.jti) || self.revoked.is_revoked(&claims.sid) {
            return Err(SecurityError::TokenRevoked);
        }
        Ok(claims)
    }
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err("Authorization header does not contain Bearer token"),
    }
}

/// 401 body shared by the gate and the auth handlers
pub fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Authentication middleware for protected routes
///
/// On success the request carries both [`UserInfo`] and [`Claims`] extensions.
pub async fn auth_middleware(State(gate): State<SessionGate>, mut req: Request<Body>, next: Next) -> Response {
    let request_path = req.uri().path().to_string();
    let start_time = std::time::Instant::now();

    let token = match bearer_token(req.headers()) {
        Ok(token) => token,
        Err(reason) => {
            debug!("Rejecting {}: {}", request_path, reason);

            let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(reason)
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            return unauthorized("Authentication required");
        }
    };

    match gate.validate_access(token) {
        Ok(claims) => {
            debug!("Token validated for user: {}", claims.sub);

            let event = AuthEvent::new(AuthEventType::TokenValidation, Some(&claims.sub), true)
                .with_details("JWT validation successful")
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            req.extensions_mut().insert(UserInfo::from(&claims));
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            warn!("Token rejected for {}: {}", request_path, e);

            let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(e.to_string())
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            let message = match e {
                SecurityError::TokenExpired => "Token has expired",
                SecurityError::TokenRevoked => "Token has been revoked",
                _ => "Invalid or expired token",
            };
            unauthorized(message)
        }
    }
}

/// Configure CORS and security headers for the application
pub fn configure_auth(app: axum::Router) -> axum::Router {
    use axum::http::{HeaderName, HeaderValue, Method};
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::set_header::SetResponseHeaderLayer;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains; preload"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ));

    app.layer(cors).layer(security_headers)
}
