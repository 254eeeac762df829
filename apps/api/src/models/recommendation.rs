use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Labor-market demand label attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Demand {
    High,
    Medium,
    Low,
}

impl Demand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Demand::High => "high",
            Demand::Medium => "medium",
            Demand::Low => "low",
        }
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Demand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Demand::High),
            "medium" => Ok(Demand::Medium),
            "low" => Ok(Demand::Low),
            other => Err(format!("unknown job market demand '{other}'")),
        }
    }
}

/// Priority of closing a skill gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single career suggestion as produced by the model and served back to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendation {
    pub id: String,
    pub title: String,
    /// 0 – 100
    #[serde(rename = "match")]
    pub match_percentage: u8,
    pub description: String,
    pub average_salary: String,
    pub growth_rate: String,
    pub required_skills: Vec<String>,
    /// Steps in learning order.
    pub learning_path: Vec<String>,
    pub job_market_demand: Demand,
}

/// Gap between the user's level and the level a target career needs, on a 1 – 5 scale.
/// `required_level <= current_level` is legal and kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: String,
    pub current_level: u8,
    pub required_level: u8,
    pub priority: Priority,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRecommendationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub assessment_id: Option<Uuid>,
    pub rank: i32,
    pub title: String,
    pub match_percentage: i32,
    pub description: String,
    pub average_salary: String,
    pub growth_rate: String,
    pub required_skills: Vec<String>,
    pub learning_path: Vec<String>,
    pub job_market_demand: String,
    pub selected_countries: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CareerRecommendationRow> for CareerRecommendation {
    type Error = String;

    fn try_from(row: CareerRecommendationRow) -> Result<Self, Self::Error> {
        Ok(CareerRecommendation {
            id: row.id.to_string(),
            title: row.title,
            match_percentage: row.match_percentage.clamp(0, 100) as u8,
            description: row.description,
            average_salary: row.average_salary,
            growth_rate: row.growth_rate,
            required_skills: row.required_skills,
            learning_path: row.learning_path,
            job_market_demand: row.job_market_demand.parse()?,
        })
    }
}
