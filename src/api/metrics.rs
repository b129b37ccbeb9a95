use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static RECOMMENDATION_REQUESTS: AtomicU64 = AtomicU64::new(0);
static RECOMMENDATION_FALLBACKS: AtomicU64 = AtomicU64::new(0);
static SKILL_SAVE_FAILURES: AtomicU64 = AtomicU64::new(0);

pub fn increment_recommendation_requests() {
    RECOMMENDATION_REQUESTS.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_recommendation_fallbacks() {
    RECOMMENDATION_FALLBACKS.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_skill_save_failures() {
    SKILL_SAVE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub recommendation_requests_total: u64,
    pub recommendation_fallbacks_total: u64,
    pub skill_save_failures_total: u64,
}

impl MetricsResponse {
    fn snapshot() -> Self {
        Self {
            recommendation_requests_total: RECOMMENDATION_REQUESTS.load(Ordering::Relaxed),
            recommendation_fallbacks_total: RECOMMENDATION_FALLBACKS.load(Ordering::Relaxed),
            skill_save_failures_total: SKILL_SAVE_FAILURES.load(Ordering::Relaxed),
        }
    }

    fn render(&self) -> String {
        format!(
            "# HELP recommendation_requests_total Recommendation requests that passed validation\n\
             # TYPE recommendation_requests_total counter\n\
             recommendation_requests_total {}\n\
             \n\
             # HELP recommendation_fallbacks_total Requests answered with the fallback payload\n\
             # TYPE recommendation_fallbacks_total counter\n\
             recommendation_fallbacks_total {}\n\
             \n\
             # HELP skill_save_failures_total Skill list writes that failed and were skipped\n\
             # TYPE skill_save_failures_total counter\n\
             skill_save_failures_total {}\n",
            self.recommendation_requests_total,
            self.recommendation_fallbacks_total,
            self.skill_save_failures_total
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus counters", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().render())
}
