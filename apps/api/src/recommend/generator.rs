//! Generation pipeline: prompt → cached model call → extraction → validation.
//!
//! Nothing here touches storage; `recommend::submission` reconciles results with the store.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::extract::parse_validated;
use crate::llm_client::LlmClient;
use crate::models::assessment::AssessmentAnswers;
use crate::models::recommendation::{CareerRecommendation, SkillGap};
use crate::models::resume::ResumeData;
use crate::recommend::prompt_builder::{
    build_assessment_prompt, build_resume_extraction_prompt, build_resume_prompt,
    build_skill_gap_prompt,
};
use crate::recommend::prompts::RECOMMENDATION_COUNT;
use crate::recommend::validation::RecommendationSet;

/// Recommendations for a completed questionnaire, salaries in the selected countries' currencies.
pub async fn generate_from_assessment(
    llm: &LlmClient,
    answers: &AssessmentAnswers,
) -> Result<Vec<CareerRecommendation>, AppError> {
    let prompt = build_assessment_prompt(answers)?;
    info!(
        "Generating recommendations from assessment ({} answers, countries: {})",
        answers.len(),
        answers.selected_countries().join(", ")
    );
    recommendations_for(llm, &prompt).await
}

/// Recommendations for a structured résumé, salaries in USD.
pub async fn generate_from_resume(
    llm: &LlmClient,
    resume: &ResumeData,
) -> Result<Vec<CareerRecommendation>, AppError> {
    let prompt = build_resume_prompt(resume);
    info!(
        "Generating recommendations from resume ({} roles, {} skills)",
        resume.experience.len(),
        resume.skills.len()
    );
    recommendations_for(llm, &prompt).await
}

/// Skill gaps between `user_skills` and `target`. Computed on demand and never stored.
pub async fn analyze_skill_gaps(
    llm: &LlmClient,
    user_skills: &[String],
    target: &CareerRecommendation,
) -> Result<Vec<SkillGap>, AppError> {
    let prompt = build_skill_gap_prompt(user_skills, target);
    let raw = llm.complete(&prompt).await?;
    let gaps: Vec<SkillGap> = parse_validated(&raw)?;
    info!("Skill gap analysis for '{}': {} gaps", target.title, gaps.len());
    Ok(gaps)
}

/// Structures free résumé text with the model.
pub async fn parse_resume_text(llm: &LlmClient, raw_text: &str) -> Result<ResumeData, AppError> {
    if raw_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text cannot be empty".to_string()));
    }

    let prompt = build_resume_extraction_prompt(raw_text);
    let raw = llm.complete(&prompt).await?;
    let resume: ResumeData = parse_validated(&raw)?;
    info!(
        "Parsed resume text: {} roles, {} skills, {} education entries",
        resume.experience.len(),
        resume.skills.len(),
        resume.education.len()
    );
    Ok(resume)
}

async fn recommendations_for(
    llm: &LlmClient,
    prompt: &str,
) -> Result<Vec<CareerRecommendation>, AppError> {
    let raw = llm.complete(prompt).await?;
    let RecommendationSet(recommendations) = parse_validated(&raw)?;

    if recommendations.len() != RECOMMENDATION_COUNT {
        warn!(
            "Model returned {} recommendations, expected {}",
            recommendations.len(),
            RECOMMENDATION_COUNT
        );
    }
    Ok(recommendations)
}
