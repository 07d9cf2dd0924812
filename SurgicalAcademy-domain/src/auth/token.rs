use std::env;
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::{Claims, UserInfo};

/// Security errors for authentication and token operations
#[derive(Debug, Error)]
pub enum SecurityError {
    /// JWT validation error
    #[error("Token validation error: {0}")]
    TokenValidation(String),

    /// Expired token
    #[error("Token has expired")]
    TokenExpired,

    /// Invalid token structure
    #[error("Invalid token format")]
    InvalidToken,

    /// Access token presented where a refresh token is expected, or the reverse
    #[error("Expected a {expected} token")]
    WrongTokenType { expected: TokenType },

    /// Token has been revoked
    #[error("Token has been revoked")]
    TokenRevoked,

    /// Configuration error
    #[error("Security configuration error: {0}")]
    ConfigError(String),
}

/// Token types for authentication
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived access token
    Access,
    /// Long-lived refresh token
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Signing key and lifetimes for issued tokens
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }

    /// Load from `JWT_SECRET`, `JWT_ISSUER`, `ACCESS_TOKEN_EXPIRATION_MINUTES`
    /// and `REFRESH_TOKEN_EXPIRATION_DAYS`
    pub fn from_env() -> Result<Self, SecurityError> {
        let secret = env::var("JWT_SECRET").map_err(|e| {
            error!("JWT_SECRET environment variable not found: {}", e);
            SecurityError::ConfigError("JWT_SECRET environment variable not found".to_string())
        })?;

        if secret.trim().is_empty() {
            return Err(SecurityError::ConfigError("JWT_SECRET must not be empty".to_string()));
        }

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "surgical-academy-api".to_string());
        let access_minutes: i64 = parse_env("ACCESS_TOKEN_EXPIRATION_MINUTES", 15)?;
        let refresh_days: i64 = parse_env("REFRESH_TOKEN_EXPIRATION_DAYS", 7)?;

        Ok(Self {
            secret,
            issuer,
            access_ttl: Duration::minutes(access_minutes),
            refresh_ttl: Duration::days(refresh_days),
        })
    }

    /// Lifetime of a token of the given type
    pub fn expiration(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    /// Sign a new token for `user` within login session `session_id`
    pub fn generate_token(
        &self,
        user: &UserInfo,
        token_type: TokenType,
        session_id: &str,
    ) -> Result<String, SecurityError> {
        let now = Utc::now();
        let expiration = now + self.expiration(token_type);

        let claims = Claims {
            sub: user.user_id.clone(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
            sid: session_id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            specialization: user.specialization.clone(),
            institution: user.institution.clone(),
            token_type,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            error!("Failed to encode JWT token: {}", e);
            SecurityError::TokenValidation(e.to_string())
        })?;

        // Log token generation (but not the token itself)
        info!("Generated {} token for user {}", token_type, user.user_id);
        debug!("Token expiration: {}", expiration);

        Ok(token)
    }

    /// Verify signature, issuer and expiry, and check the token type
    pub fn validate_token(&self, token: &str, expected: TokenType) -> Result<Claims, SecurityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidToken => SecurityError::InvalidToken,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                SecurityError::TokenValidation("Invalid signature".to_string())
            }
            _ => SecurityError::TokenValidation(e.to_string()),
        })?;

        if token_data.claims.token_type != expected {
            return Err(SecurityError::WrongTokenType { expected });
        }

        Ok(token_data.claims)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, SecurityError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| SecurityError::ConfigError(format!("{} must be a number, got {:?}", key, value))),
        Err(_) => Ok(default),
    }
}
