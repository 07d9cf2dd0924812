use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::auth::logging::{log_logout, log_token_refresh};
use crate::auth::{auth_middleware, unauthorized, Claims, SessionGate, UserInfo};
use crate::services::{ServiceError, UserService};

/// State shared by the credential routes
#[derive(Clone)]
pub struct AuthState {
    pub gate: SessionGate,
    pub users: UserService,
}

/// Email and password login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Tokens and identity issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LogoutResponse {
    pub message: String,
}

/// Error body of the credential routes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AuthErrorResponse {
    pub error: String,
    pub message: String,
}

fn auth_error(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(AuthErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

/// Credential routes, meant to be nested under `/auth`
///
/// `/login` and `/refresh` are public; `/session` and `/logout` sit behind the
/// session gate. The returned router carries its own state and can be nested
/// into a router of any state type.
pub fn auth_routes<S>(state: AuthState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/session", get(session_handler))
        .route("/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(state.gate.clone(), auth_middleware));

    Router::new()
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .merge(protected)
        .with_state(state)
}

/// Exchange email and password for tokens
#[cfg_attr(feature = "with-api", utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Malformed request", body = AuthErrorResponse),
        (status = 401, description = "Invalid email or password", body = AuthErrorResponse)
    )
))]
#[instrument(skip(state, body))]
pub async fn login_handler(
    State(state): State<AuthState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return auth_error(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text()),
    };

    let user = match state.users.authenticate(&request.email, &request.password).await {
        Ok(user) => user,
        Err(ServiceError::Unauthorized(message)) => return unauthorized(&message),
        Err(e) => {
            error!("Login failed: {}", e);
            return auth_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Login failed");
        }
    };

    let identity = UserInfo::from(&user);
    match state.gate.issue_tokens(&identity) {
        Ok(tokens) => Json(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            user: identity,
        })
        .into_response(),
        Err(e) => {
            error!("Token issuance failed: {}", e);
            auth_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Login failed")
        }
    }
}

/// Exchange a refresh token for a new access token
#[cfg_attr(feature = "with-api", utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Invalid, expired or revoked refresh token", body = AuthErrorResponse)
    )
))]
#[instrument(skip(state, body))]
pub async fn refresh_handler(
    State(state): State<AuthState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return auth_error(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text()),
    };

    match state.gate.refresh(&request.refresh_token) {
        Ok((access_token, claims)) => {
            log_token_refresh(&claims.sub, true, None);
            Json(RefreshResponse {
                access_token,
                token_type: "Bearer".to_string(),
                expires_in: state.gate.access_ttl_seconds(),
            })
            .into_response()
        }
        Err(e) => {
            let details = e.to_string();
            log_token_refresh("unknown", false, Some(&details));
            unauthorized("Invalid or expired refresh token")
        }
    }
}

/// Identity behind the presented access token
#[cfg_attr(feature = "with-api", utoipa::path(
    get,
    path = "/auth/session",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current identity", body = UserInfo),
        (status = 401, description = "Not authenticated", body = AuthErrorResponse)
    ),
    security(("bearer_auth" = []))
))]
pub async fn session_handler(Extension(user): Extension<UserInfo>) -> Json<UserInfo> {
    Json(user)
}

/// End the login session of the presented access token
///
/// The refresh token issued with it stops working as well.
#[cfg_attr(feature = "with-api", utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session ended", body = LogoutResponse),
        (status = 401, description = "Not authenticated", body = AuthErrorResponse)
    ),
    security(("bearer_auth" = []))
))]
#[instrument(skip(state, claims), fields(user = %claims.sub))]
pub async fn logout_handler(State(state): State<AuthState>, Extension(claims): Extension<Claims>) -> Response {
    state.gate.revoke(&claims);
    log_logout(&claims.sub);

    Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    })
    .into_response()
}
