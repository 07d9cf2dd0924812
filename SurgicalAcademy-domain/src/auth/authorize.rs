use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::logging::{log_access_denied, log_auth_event, AuthEvent, AuthEventType};
use crate::auth::UserInfo;
use surgical_academy_data::models::UserRole;

/// Whether a role may author courses and articles
pub fn can_create_content(role: UserRole) -> bool {
    matches!(role, UserRole::Admin | UserRole::Teacher)
}

/// Whether `user_id` may edit a course written by `author_id`
pub fn can_edit_course(role: UserRole, author_id: &str, user_id: &str) -> bool {
    role == UserRole::Admin || author_id == user_id
}

/// Middleware for role-based access control
///
/// Must run after the session gate: the caller's [`UserInfo`] is read from the
/// request extensions. Callers without any of `required_roles` get 403.
pub async fn require_roles(req: Request<Body>, next: Next, required_roles: Vec<UserRole>) -> Response {
    let request_path = req.uri().path().to_string();

    let user = match req.extensions().get::<UserInfo>() {
        Some(user) => user,
        None => {
            warn!("No user info found in request extensions for path: {}", request_path);

            let event = AuthEvent::new(AuthEventType::AccessDenied, None, false)
                .with_details("Authentication context missing in request extensions")
                .with_resource(request_path)
                .with_auth_method("rbac");
            log_auth_event(event);

            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Authentication required"
                })),
            )
                .into_response();
        }
    };

    if required_roles.contains(&user.role) {
        debug!("User {} has required role for resource access: {}", user.user_id, request_path);
        return next.run(req).await;
    }

    let required: Vec<String> = required_roles.iter().map(|role| role.to_string()).collect();
    warn!(
        "User {} with role {} lacks required roles {:?} for resource: {}",
        user.user_id, user.role, required, request_path
    );
    log_access_denied(&user.user_id, &request_path, &required);

    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": "You don't have the required permissions to access this resource",
            "required_roles": required
        })),
    )
        .into_response()
}

/// Middleware factory that requires a specific role for access
///
/// ```ignore
/// let admin_routes = Router::new()
///     .route("/api/admin/users", get(list_users))
///     .route_layer(middleware::from_fn(require_role(UserRole::Admin)));
/// ```
pub fn require_role(role: UserRole) -> impl Fn(Request<Body>, Next) -> BoxFuture<'static, Response> + Clone + Send + 'static {
    require_any_role(&[role])
}

/// Middleware factory that requires any of the specified roles for access
pub fn require_any_role(
    roles: &[UserRole],
) -> impl Fn(Request<Body>, Next) -> BoxFuture<'static, Response> + Clone + Send + 'static {
    let roles = roles.to_vec();
    move |req, next| {
        let roles = roles.clone();
        Box::pin(async move { require_roles(req, next, roles).await })
    }
}
