pub mod auth;
pub mod health;
pub mod metrics;
pub mod recommend;
pub mod swagger;


use actix_web::{error::InternalError, web, HttpResponse};

use crate::middleware::AuthMiddleware;

/// Registers every route; shared by the server and the HTTP tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Auth endpoints
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                // Protected endpoints requiring a session
                .service(
                    web::resource("/logout")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(auth::logout)),
                )
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::get_me)),
                ),
        )
        // Recommendations - requires a session
        .service(
            web::resource("/api/recommend")
                .wrap(AuthMiddleware)
                .route(web::post().to(recommend::recommend)),
        );
}

/// Malformed JSON bodies answer with the same `{"error": ...}` shape as validation failures
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("❌ Rejected JSON body: {}", message);
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}
