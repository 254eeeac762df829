//! Shape checks run on model output after deserialization. Anything that fails here surfaces
//! as a `ParseError`; malformed records are never defaulted or dropped silently.

use std::collections::HashSet;

use serde::Deserialize;

use crate::llm_client::extract::Validate;
use crate::models::recommendation::{CareerRecommendation, SkillGap};
use crate::models::resume::ResumeData;

const MIN_LEVEL: u8 = 1;
const MAX_LEVEL: u8 = 5;

impl Validate for CareerRecommendation {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("recommendation id is empty".to_string());
        }
        if self.title.trim().is_empty() {
            return Err(format!("recommendation '{}' has an empty title", self.id));
        }
        if self.match_percentage > 100 {
            return Err(format!(
                "recommendation '{}' has match {} outside 0-100",
                self.id, self.match_percentage
            ));
        }
        Ok(())
    }
}

impl Validate for SkillGap {
    fn validate(&self) -> Result<(), String> {
        if self.skill.trim().is_empty() {
            return Err("skill name is empty".to_string());
        }
        for (label, level) in [
            ("currentLevel", self.current_level),
            ("requiredLevel", self.required_level),
        ] {
            if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
                return Err(format!(
                    "skill '{}' has {label} {level} outside {MIN_LEVEL}-{MAX_LEVEL}",
                    self.skill
                ));
            }
        }
        Ok(())
    }
}

impl Validate for ResumeData {
    fn validate(&self) -> Result<(), String> {
        let has_name = !self.name.trim().is_empty();
        let has_skills = self.skills.iter().any(|s| !s.trim().is_empty());
        let has_experience = !self.experience.is_empty();
        if !(has_name || has_skills || has_experience) {
            return Err("resume has no name, skills or experience".to_string());
        }
        Ok(())
    }
}

/// One generated recommendation set. Beyond per-item checks, the set must be non-empty and ids
/// must be unique in it. An empty set would replace the user's stored recommendations with nothing.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct RecommendationSet(pub Vec<CareerRecommendation>);

impl Validate for RecommendationSet {
    fn validate(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("model returned no recommendations".to_string());
        }
        self.0.validate()?;
        let mut seen = HashSet::new();
        for rec in &self.0 {
            if !seen.insert(rec.id.as_str()) {
                return Err(format!("duplicate recommendation id '{}'", rec.id));
            }
        }
        Ok(())
    }
}
