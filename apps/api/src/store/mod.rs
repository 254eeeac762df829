//! Recommendation Store: persistence for assessments and recommendation sets.
//!
//! A user's stored recommendations are always exactly the most recent generation:
//! `save_recommendations` replaces the previous set atomically.
//!
//! `AppState` holds an `Arc<dyn RecommendationStore>`; production uses `PgRecommendationStore`.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::assessment::AssessmentAnswers;
use crate::models::recommendation::CareerRecommendation;
use crate::models::user::UserProfile;

pub use self::postgres::PgRecommendationStore;

/// Most recent recommendations served back to a user.
pub const RECOMMENDATION_LIMIT: i64 = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored data could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored row is invalid: {0}")]
    InvalidRow(String),

    #[error("Storage call timed out after {0}s")]
    Timeout(u64),
}

#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Persists an immutable answer set (possibly empty) and returns its id.
    async fn save_assessment(
        &self,
        user_id: Uuid,
        answers: &AssessmentAnswers,
    ) -> Result<Uuid, StoreError>;

    /// Replaces every stored recommendation for `user_id` with `recommendations`.
    async fn save_recommendations(
        &self,
        user_id: Uuid,
        assessment_id: Uuid,
        recommendations: &[CareerRecommendation],
        selected_countries: &[String],
    ) -> Result<(), StoreError>;

    /// Most recent first, in generation order within a set, capped at `RECOMMENDATION_LIMIT`.
    async fn fetch_recommendations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CareerRecommendation>, StoreError>;

    async fn latest_assessment(&self, user_id: Uuid)
        -> Result<Option<AssessmentAnswers>, StoreError>;

    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError>;
}

/// Read path for display: storage errors degrade to an empty list.
pub async fn get_recommendations(
    store: &dyn RecommendationStore,
    user_id: Uuid,
) -> Vec<CareerRecommendation> {
    match store.fetch_recommendations(user_id).await {
        Ok(recommendations) => recommendations,
        Err(e) => {
            warn!("Failed to fetch recommendations for user {user_id}, showing none: {e}");
            Vec::new()
        }
    }
}
