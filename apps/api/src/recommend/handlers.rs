//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::market::{market_data_for, CountryMarketData};
use crate::models::assessment::AssessmentAnswers;
use crate::models::recommendation::{CareerRecommendation, SkillGap};
use crate::models::resume::ResumeData;
use crate::models::user::UserProfile;
use crate::recommend::generator::{analyze_skill_gaps, parse_resume_text};
use crate::recommend::submission::{
    skill_gaps_for_user, submit_assessment, submit_resume, submit_resume_text,
};
use crate::state::AppState;
use crate::store::get_recommendations;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    /// Comma-separated display names.
    pub countries: String,
}

#[derive(Debug, Deserialize)]
pub struct AssessmentSubmission {
    pub user_id: Uuid,
    pub answers: AssessmentAnswers,
}

#[derive(Debug, Deserialize)]
pub struct ResumeSubmission {
    pub user_id: Uuid,
    pub resume: ResumeData,
}

#[derive(Debug, Deserialize)]
pub struct ResumeTextSubmission {
    pub user_id: Uuid,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

/// Skills come from `user_skills` when given, otherwise from the user's latest assessment.
#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    pub user_id: Option<Uuid>,
    pub user_skills: Option<Vec<String>>,
    pub target: CareerRecommendation,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<CareerRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct SkillGapsResponse {
    pub skill_gaps: Vec<SkillGap>,
}

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub resume: ResumeData,
}

#[derive(Debug, Serialize)]
pub struct LatestAssessmentResponse {
    pub answers: AssessmentAnswers,
}

#[derive(Debug, Serialize)]
pub struct MarketResponse {
    pub countries: Vec<CountryMarketData>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations/assessment
///
/// Saves the answers, generates a fresh set and replaces the user's stored recommendations.
/// Returns the set as now stored.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    Json(request): Json<AssessmentSubmission>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let recommendations = submit_assessment(
        state.store.as_ref(),
        &state.llm,
        request.user_id,
        &request.answers,
    )
    .await?;
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// POST /api/v1/recommendations/resume
pub async fn handle_submit_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeSubmission>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let recommendations = submit_resume(
        state.store.as_ref(),
        &state.llm,
        request.user_id,
        &request.resume,
    )
    .await?;
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// POST /api/v1/recommendations/resume-text
///
/// Structures the text with the model first, then proceeds as a résumé submission.
pub async fn handle_submit_resume_text(
    State(state): State<AppState>,
    Json(request): Json<ResumeTextSubmission>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let recommendations = submit_resume_text(
        state.store.as_ref(),
        &state.llm,
        request.user_id,
        &request.resume_text,
    )
    .await?;
    Ok(Json(RecommendationsResponse { recommendations }))
}

/// GET /api/v1/recommendations?user_id=
///
/// Never fails on storage errors; the list is empty instead.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Json<RecommendationsResponse> {
    let recommendations = get_recommendations(state.store.as_ref(), query.user_id).await;
    Json(RecommendationsResponse { recommendations })
}

/// POST /api/v1/skill-gaps
pub async fn handle_skill_gaps(
    State(state): State<AppState>,
    Json(request): Json<SkillGapRequest>,
) -> Result<Json<SkillGapsResponse>, AppError> {
    let skill_gaps = match (request.user_skills, request.user_id) {
        (Some(skills), _) => analyze_skill_gaps(&state.llm, &skills, &request.target).await?,
        (None, Some(user_id)) => {
            skill_gaps_for_user(state.store.as_ref(), &state.llm, user_id, &request.target)
                .await?
        }
        (None, None) => {
            return Err(AppError::Validation(
                "Either user_skills or user_id is required".to_string(),
            ))
        }
    };
    Ok(Json(SkillGapsResponse { skill_gaps }))
}

/// POST /api/v1/resumes/parse
///
/// Preview of résumé extraction. Nothing is stored.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let resume = parse_resume_text(&state.llm, &request.resume_text).await?;
    Ok(Json(ParseResumeResponse { resume }))
}

/// GET /api/v1/assessments/latest?user_id=
pub async fn handle_latest_assessment(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<LatestAssessmentResponse>, AppError> {
    let answers = state
        .store
        .latest_assessment(query.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No assessment found for user {}", query.user_id))
        })?;
    Ok(Json(LatestAssessmentResponse { answers }))
}

/// GET /api/v1/users/:id/profile
pub async fn handle_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .store
        .user_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    Ok(Json(profile))
}

/// GET /api/v1/market?countries=Germany,Canada
pub async fn handle_market_data(
    Query(query): Query<MarketQuery>,
) -> Result<Json<MarketResponse>, AppError> {
    let names: Vec<&str> = query
        .countries
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        return Err(AppError::Validation(
            "countries must name at least one country".to_string(),
        ));
    }
    Ok(Json(MarketResponse {
        countries: market_data_for(&names[..]),
    }))
}
