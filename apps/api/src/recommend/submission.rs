//! Submission reconciliation: generate a fresh recommendation set, replace the user's stored set
//! with it, then serve back what the store now holds.
//!
//! Order per submission: validate → save assessment → generate → replace → re-fetch.
//! A failed generation leaves the saved assessment and the previous recommendations in place.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::assessment::AssessmentAnswers;
use crate::models::recommendation::{CareerRecommendation, SkillGap};
use crate::models::resume::ResumeData;
use crate::recommend::generator::{
    analyze_skill_gaps, generate_from_assessment, generate_from_resume, parse_resume_text,
};
use crate::recommend::prompt_builder::build_assessment_prompt;
use crate::store::{get_recommendations, RecommendationStore};

pub async fn submit_assessment(
    store: &dyn RecommendationStore,
    llm: &LlmClient,
    user_id: Uuid,
    answers: &AssessmentAnswers,
) -> Result<Vec<CareerRecommendation>, AppError> {
    // Reject before any I/O when no country was chosen.
    build_assessment_prompt(answers)?;

    let assessment_id = store.save_assessment(user_id, answers).await?;
    let recommendations = generate_from_assessment(llm, answers).await?;
    let countries = answers.selected_countries();

    store
        .save_recommendations(user_id, assessment_id, &recommendations, &countries)
        .await?;
    info!(
        "Stored {} recommendations for user {} from assessment {}",
        recommendations.len(),
        user_id,
        assessment_id
    );

    Ok(get_recommendations(store, user_id).await)
}

/// Résumé submissions record an empty assessment so every set has an originating submission.
pub async fn submit_resume(
    store: &dyn RecommendationStore,
    llm: &LlmClient,
    user_id: Uuid,
    resume: &ResumeData,
) -> Result<Vec<CareerRecommendation>, AppError> {
    let assessment_id = store
        .save_assessment(user_id, &AssessmentAnswers::new())
        .await?;
    let recommendations = generate_from_resume(llm, resume).await?;

    store
        .save_recommendations(user_id, assessment_id, &recommendations, &[])
        .await?;
    info!(
        "Stored {} resume-based recommendations for user {}",
        recommendations.len(),
        user_id
    );

    Ok(get_recommendations(store, user_id).await)
}

pub async fn submit_resume_text(
    store: &dyn RecommendationStore,
    llm: &LlmClient,
    user_id: Uuid,
    raw_text: &str,
) -> Result<Vec<CareerRecommendation>, AppError> {
    let resume = parse_resume_text(llm, raw_text).await?;
    submit_resume(store, llm, user_id, &resume).await
}

/// Skill gaps for `target` using the skills from the user's latest assessment.
pub async fn skill_gaps_for_user(
    store: &dyn RecommendationStore,
    llm: &LlmClient,
    user_id: Uuid,
    target: &CareerRecommendation,
) -> Result<Vec<SkillGap>, AppError> {
    let skills = store
        .latest_assessment(user_id)
        .await?
        .map(|answers| answers.skills())
        .unwrap_or_default();
    analyze_skill_gaps(llm, &skills, target).await
}
