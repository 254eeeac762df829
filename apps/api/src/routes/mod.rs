pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommend::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(handlers::handle_get_recommendations),
        )
        .route(
            "/api/v1/recommendations/assessment",
            post(handlers::handle_submit_assessment),
        )
        .route(
            "/api/v1/recommendations/resume",
            post(handlers::handle_submit_resume),
        )
        .route(
            "/api/v1/recommendations/resume-text",
            post(handlers::handle_submit_resume_text),
        )
        .route("/api/v1/skill-gaps", post(handlers::handle_skill_gaps))
        // Résumés, assessments, users
        .route("/api/v1/resumes/parse", post(handlers::handle_parse_resume))
        .route(
            "/api/v1/assessments/latest",
            get(handlers::handle_latest_assessment),
        )
        .route("/api/v1/users/:id/profile", get(handlers::handle_user_profile))
        // Market data
        .route("/api/v1/market", get(handlers::handle_market_data))
        .with_state(state)
}
