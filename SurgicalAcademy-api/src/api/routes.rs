use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use surgical_academy_data::models::UserRole;
use surgical_academy_domain::auth::routes::auth_routes;
use surgical_academy_domain::auth::{auth_middleware, authorize, configure_auth};

use crate::api::handlers::{self, health};
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let gate = state.gate.clone();

    // Course authoring: session first, then role
    let courses = get(handlers::list_courses).merge(
        post(handlers::create_course)
            .route_layer(middleware::from_fn(authorize::require_any_role(&[
                UserRole::Admin,
                UserRole::Teacher,
            ])))
            .route_layer(middleware::from_fn_with_state(gate.clone(), auth_middleware)),
    );

    // Set up public routes that don't require authentication
    let public_routes = Router::new()
        .route("/api/signup", post(handlers::signup))
        .route("/api/courses", courses)
        .route("/api/courses/:slug", get(handlers::get_course))
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/:slug", get(handlers::get_article))
        .route("/api/categories", get(handlers::list_categories));

    debug!("Public routes configured");

    // Set up routes that require a session
    let session_routes = Router::new()
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/ai-search", post(handlers::ai_search))
        .route(
            "/api/fhir/resources",
            get(handlers::list_resources).post(handlers::create_resource),
        )
        .route("/api/fhir/samples", get(handlers::list_samples))
        .route_layer(middleware::from_fn_with_state(gate.clone(), auth_middleware));

    debug!("Session routes configured");

    // Set up admin routes; authentication must happen before authorization
    let admin_routes = Router::new()
        .route("/api/admin/users", get(handlers::list_users))
        .route_layer(middleware::from_fn(authorize::require_role(UserRole::Admin)))
        .route_layer(middleware::from_fn_with_state(gate, auth_middleware));

    debug!("Admin routes configured");

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(state.health.clone()));

    let app = Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .merge(health_routes)
        .nest("/auth", auth_routes(state.auth_state()))
        .with_state(state);

    debug!("Base routes merged");

    let app = app.merge(configure_swagger_routes());
    debug!("Swagger UI merged");

    // Apply security configuration
    let app = configure_auth(app);
    debug!("Security configuration applied");

    health::initialize_server_start_time();

    app.layer(TraceLayer::new_for_http())
}
