//! Deterministic prompt construction. Identical inputs always produce byte-identical prompts,
//! which is what makes the response cache effective.

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::market::{market_data_for, CountryMarketData};
use crate::models::assessment::AssessmentAnswers;
use crate::models::recommendation::CareerRecommendation;
use crate::models::resume::ResumeData;
use crate::recommend::prompts::{
    ASSESSMENT_PROMPT_TEMPLATE, MARKET_BLOCK_TEMPLATE, RECOMMENDATION_COUNT,
    RESUME_EXTRACTION_PROMPT_TEMPLATE, RESUME_PROMPT_TEMPLATE, SKILL_GAP_PROMPT_TEMPLATE,
};

const NOT_PROVIDED: &str = "Not provided";
const NO_SKILLS: &str = "None specified";

/// Prompt for assessment-based recommendations.
///
/// Fails with `Validation` when the `country` answer names no country; no other work is done.
pub fn build_assessment_prompt(answers: &AssessmentAnswers) -> Result<String, AppError> {
    let countries = answers.selected_countries();
    let markets = market_data_for(&countries[..]);
    let Some(reference) = markets.first() else {
        return Err(AppError::Validation(
            "Please select at least one country for career recommendations".to_string(),
        ));
    };

    let assessment = answers
        .iter()
        .map(|a| format!("{}: {}", a.question_id.as_str(), a.answer.display()))
        .collect::<Vec<_>>()
        .join("\n");

    let market_blocks = markets
        .iter()
        .map(market_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    let salary_formats = markets
        .iter()
        .map(|m| {
            format!(
                "- {}: {sym}XX,XXX - {sym}XXX,XXX {}",
                m.name,
                m.currency,
                sym = m.symbol
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let count = RECOMMENDATION_COUNT.to_string();
    Ok(fill(
        ASSESSMENT_PROMPT_TEMPLATE,
        &[
            ("countries", &countries.join(", ")),
            ("assessment", &assessment),
            ("market_blocks", &market_blocks),
            ("salary_formats", &salary_formats),
            ("count", &count),
            ("countries_slash", &countries.join("/")),
            ("symbol", &reference.symbol),
            ("currency", &reference.currency),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    ))
}

/// Prompt for résumé-based recommendations. Salaries are requested in USD.
pub fn build_resume_prompt(resume: &ResumeData) -> String {
    let experience = resume
        .experience
        .iter()
        .map(|e| format!("{} at {}", e.title, e.company))
        .collect::<Vec<_>>();
    let education = resume
        .education
        .iter()
        .map(|e| format!("{} in {}", e.degree, e.field))
        .collect::<Vec<_>>();

    let count = RECOMMENDATION_COUNT.to_string();
    fill(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("count", &count),
            ("name", or_not_provided(resume.name.trim())),
            ("experience", &join_or(&experience, NOT_PROVIDED)),
            ("skills", &join_or(&resume.skills, NOT_PROVIDED)),
            ("education", &join_or(&education, NOT_PROVIDED)),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Prompt for a skill-gap analysis of `user_skills` against `target`.
pub fn build_skill_gap_prompt(user_skills: &[String], target: &CareerRecommendation) -> String {
    fill(
        SKILL_GAP_PROMPT_TEMPLATE,
        &[
            ("user_skills", &join_or(user_skills, NO_SKILLS)),
            ("title", &target.title),
            ("required_skills", &join_or(&target.required_skills, NOT_PROVIDED)),
            ("description", &target.description),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Prompt asking the model to structure free résumé text as `ResumeData`.
pub fn build_resume_extraction_prompt(raw_text: &str) -> String {
    fill(
        RESUME_EXTRACTION_PROMPT_TEMPLATE,
        &[
            ("resume_text", raw_text.trim()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

fn market_block(market: &CountryMarketData) -> String {
    fill(
        MARKET_BLOCK_TEMPLATE,
        &[
            ("name", &market.name),
            ("currency", &market.currency),
            ("symbol", &market.symbol),
            ("industries", &market.major_industries.join(", ")),
            ("condition", &market.job_market_condition),
            ("visa", if market.work_visa_required { "true" } else { "false" }),
            ("languages", &market.languages.join(", ")),
            ("cost_of_living", &market.cost_of_living_index),
        ],
    )
}

/// Single-pass `{key}` substitution. Substituted values are never re-scanned, so user text
/// that happens to contain a placeholder is copied verbatim.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = values.iter().find(|(key, _)| {
            tail.starts_with(key) && tail[key.len()..].starts_with('}')
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn join_or(items: &[String], empty: &str) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn or_not_provided(value: &str) -> &str {
    if value.is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}
