use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Catalogue endpoints
        crate::api::handlers::courses::list_courses,
        crate::api::handlers::courses::get_course,
        crate::api::handlers::courses::create_course,
        crate::api::handlers::articles::list_articles,
        crate::api::handlers::articles::get_article,
        crate::api::handlers::articles::list_categories,

        // Account endpoints
        crate::api::handlers::accounts::signup,
        crate::api::handlers::dashboard::dashboard,
        crate::api::handlers::admin::list_users,

        // FHIR endpoints
        crate::api::handlers::fhir::list_resources,
        crate::api::handlers::fhir::create_resource,
        crate::api::handlers::fhir::list_samples,

        // Search relay
        crate::api::handlers::search::ai_search,

        // Auth endpoints
        surgical_academy_domain::auth::routes::login_handler,
        surgical_academy_domain::auth::routes::refresh_handler,
        surgical_academy_domain::auth::routes::session_handler,
        surgical_academy_domain::auth::routes::logout_handler
    ),
    components(
        schemas(
            // Request entities
            crate::entities::PublicCreateCourseRequest,
            crate::entities::PublicSignupRequest,
            crate::entities::PublicCreateFhirRequest,
            crate::entities::PublicSearchRequest,

            // Errors and health
            crate::api::handlers::error::ErrorResponse,
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Catalogue
            surgical_academy_data::models::CourseSummary,
            surgical_academy_data::models::CourseDetail,
            surgical_academy_data::models::CourseCounts,
            surgical_academy_data::models::Lesson,
            surgical_academy_data::models::Difficulty,
            surgical_academy_data::models::ArticleSummary,
            surgical_academy_data::models::Category,
            surgical_academy_data::models::CategorySummary,
            surgical_academy_data::models::Tag,
            surgical_academy_data::models::AuthorSummary,
            surgical_academy_domain::entities::CourseList,
            surgical_academy_domain::entities::ArticleList,
            surgical_academy_domain::entities::Pagination,

            // Accounts and dashboard
            surgical_academy_data::models::User,
            surgical_academy_data::models::UserRole,
            surgical_academy_data::models::UserStats,
            surgical_academy_data::models::ProgressSummary,
            surgical_academy_data::models::ProgressCourse,
            surgical_academy_domain::entities::SignupResult,
            surgical_academy_domain::entities::CreatedUser,
            surgical_academy_domain::entities::UserList,
            surgical_academy_domain::entities::Dashboard,
            surgical_academy_domain::entities::Capabilities,

            // FHIR and search
            surgical_academy_data::models::FhirResource,
            surgical_academy_domain::entities::FhirSample,
            surgical_academy_domain::entities::SearchResults,

            // Auth schemas
            surgical_academy_domain::auth::UserInfo,
            surgical_academy_domain::auth::routes::LoginRequest,
            surgical_academy_domain::auth::routes::LoginResponse,
            surgical_academy_domain::auth::routes::RefreshRequest,
            surgical_academy_domain::auth::routes::RefreshResponse,
            surgical_academy_domain::auth::routes::LogoutResponse,
            surgical_academy_domain::auth::routes::AuthErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "courses", description = "Course catalogue and authoring"),
        (name = "articles", description = "Articles and categories"),
        (name = "accounts", description = "Registration"),
        (name = "dashboard", description = "Personal overview"),
        (name = "admin", description = "Administration"),
        (name = "fhir", description = "FHIR resources"),
        (name = "search", description = "AI search relay"),
        (name = "Authentication", description = "Authentication and authorization endpoints")
    ),
    info(
        title = "SurgicalAcademy API",
        version = "0.1.0",
        description = "Surgical education platform: courses, articles, FHIR data and AI search",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "SurgicalAcademy API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "courses"));
        assert!(tags.iter().any(|tag| tag.name == "Authentication"));

        for path in [
            "/health",
            "/api/courses",
            "/api/courses/{slug}",
            "/api/articles",
            "/api/articles/{slug}",
            "/api/categories",
            "/api/signup",
            "/api/dashboard",
            "/api/admin/users",
            "/api/fhir/resources",
            "/api/fhir/samples",
            "/api/ai-search",
            "/auth/login",
            "/auth/refresh",
            "/auth/session",
            "/auth/logout",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
