//! In-memory `RecommendationStore` for tests. Mirrors the PostgreSQL ordering rules:
//! newest set first, generation order within a set, capped at `RECOMMENDATION_LIMIT`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::assessment::AssessmentAnswers;
use crate::models::recommendation::{CareerRecommendation, Demand};
use crate::models::user::UserProfile;
use crate::store::{RecommendationStore, StoreError, RECOMMENDATION_LIMIT};

struct StoredAssessment {
    user_id: Uuid,
    answers: AssessmentAnswers,
}

struct StoredRecommendation {
    user_id: Uuid,
    generation: u64,
    rank: usize,
    recommendation: CareerRecommendation,
    selected_countries: Vec<String>,
}

#[derive(Default)]
struct Tables {
    assessments: Vec<StoredAssessment>,
    recommendations: Vec<StoredRecommendation>,
    profiles: Vec<UserProfile>,
    generation: u64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn add_profile(&self, id: Uuid, name: &str, email: &str) {
        let now = Utc::now();
        self.tables.lock().unwrap().profiles.push(UserProfile {
            id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        });
    }

    pub fn assessment_count(&self, user_id: Uuid) -> usize {
        self.tables
            .lock()
            .unwrap()
            .assessments
            .iter()
            .filter(|a| a.user_id == user_id)
            .count()
    }

    pub fn stored_countries(&self, user_id: Uuid) -> Vec<Vec<String>> {
        self.tables
            .lock()
            .unwrap()
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.selected_countries.clone())
            .collect()
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl RecommendationStore for MemoryStore {
    async fn save_assessment(
        &self,
        user_id: Uuid,
        answers: &AssessmentAnswers,
    ) -> Result<Uuid, StoreError> {
        self.check(&self.fail_writes)?;
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().assessments.push(StoredAssessment {
            user_id,
            answers: answers.clone(),
        });
        Ok(id)
    }

    async fn save_recommendations(
        &self,
        user_id: Uuid,
        _assessment_id: Uuid,
        recommendations: &[CareerRecommendation],
        selected_countries: &[String],
    ) -> Result<(), StoreError> {
        self.check(&self.fail_writes)?;
        let mut tables = self.tables.lock().unwrap();
        tables.generation += 1;
        let generation = tables.generation;
        tables.recommendations.retain(|r| r.user_id != user_id);
        for (rank, rec) in recommendations.iter().enumerate() {
            let mut stored = rec.clone();
            stored.id = Uuid::new_v4().to_string();
            tables.recommendations.push(StoredRecommendation {
                user_id,
                generation,
                rank,
                recommendation: stored,
                selected_countries: selected_countries.to_vec(),
            });
        }
        Ok(())
    }

    async fn fetch_recommendations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CareerRecommendation>, StoreError> {
        self.check(&self.fail_reads)?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| b.generation.cmp(&a.generation).then(a.rank.cmp(&b.rank)));
        Ok(rows
            .into_iter()
            .take(RECOMMENDATION_LIMIT as usize)
            .map(|r| r.recommendation.clone())
            .collect())
    }

    async fn latest_assessment(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AssessmentAnswers>, StoreError> {
        self.check(&self.fail_reads)?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .assessments
            .iter()
            .rev()
            .find(|a| a.user_id == user_id)
            .map(|a| a.answers.clone()))
    }

    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        self.check(&self.fail_reads)?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned())
    }
}

/// Fixture recommendation with the given id and title.
pub fn recommendation(id: &str, title: &str) -> CareerRecommendation {
    CareerRecommendation {
        id: id.to_string(),
        title: title.to_string(),
        match_percentage: 80,
        description: format!("{title} role"),
        average_salary: "$80,000 - $120,000 USD".to_string(),
        growth_rate: "+10%".to_string(),
        required_skills: vec!["Communication".to_string()],
        learning_path: vec!["Step 1".to_string(), "Step 2".to_string()],
        job_market_demand: Demand::High,
    }
}
