use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Recommender API",
        version = "1.0.0",
        description = "Submit a list of skills and get job-title recommendations from an AI provider.\n\n**Authentication:** protected endpoints accept the `session` cookie set at login or the same token as a Bearer header.\n\n**Fail-soft:** provider failures never surface as errors; `/api/recommend` answers 200 with a one-element fallback message instead."
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::get_me,

        // Recommendations
        crate::api::recommend::recommend,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::CredentialsRequest,
            crate::services::auth_service::RegisterResponse,
            crate::services::auth_service::LoginResponse,
            crate::models::UserInfo,

            // Recommendations
            crate::models::RecommendRequest,
            crate::models::ErrorResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login/logout and the current user's saved skills."),
        (name = "Recommendations", description = "Skills in, job titles out."),
        (name = "Health", description = "Health check and counters for monitoring."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token returned by /api/auth/login"))
                        .build()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_recommend_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/recommend"));
        assert!(doc.paths.paths.contains_key("/api/auth/login"));
    }
}
