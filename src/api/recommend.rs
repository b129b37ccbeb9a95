use actix_web::{web, HttpResponse};

use crate::{
    models::{ErrorResponse, RecommendRequest},
    services::{auth_service::{self, AuthenticatedUser}, recommendation_service},
    state::AppState,
};

/// POST /api/recommend
/// Saves the submitted skills and returns job titles (or the fallback payload)
#[utoipa::path(
    post,
    path = "/api/recommend",
    tag = "Recommendations",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Job titles, or a one-element fallback message", body = Vec<String>),
        (status = 400, description = "No skills provided", body = ErrorResponse),
        (status = 401, description = "Not logged in")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn recommend(
    state: web::Data<AppState>,
    user: web::ReqData<AuthenticatedUser>,
    request: web::Json<RecommendRequest>,
) -> HttpResponse {
    log::info!(
        "🎯 POST /recommend - user_id: {}, skills: {}",
        user.user_id,
        request.skills.len()
    );

    let current = match auth_service::get_current_user(state.store.as_ref(), &user.user_id).await {
        Ok(current) => current,
        Err(e) => {
            log::warn!("❌ Session user could not be resolved: {}", e);
            return HttpResponse::build(e.status_code()).json(ErrorResponse {
                error: e.message().to_string(),
            });
        }
    };

    match recommendation_service::submit_skills(
        state.store.as_ref(),
        state.provider.as_ref(),
        &current.user_id,
        &request.skills,
    )
    .await
    {
        Ok(recommendations) => HttpResponse::Ok().json(recommendations),
        Err(e) => {
            log::warn!("❌ Recommendation request rejected: {}", e);
            HttpResponse::build(e.status_code()).json(ErrorResponse {
                error: e.message().to_string(),
            })
        }
    }
}
