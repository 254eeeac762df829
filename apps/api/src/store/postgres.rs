use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::assessment::{AssessmentAnswers, AssessmentRow};
use crate::models::recommendation::{CareerRecommendation, CareerRecommendationRow};
use crate::models::user::UserProfile;
use crate::store::{RecommendationStore, StoreError, RECOMMENDATION_LIMIT};

pub struct PgRecommendationStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Bounds one storage call. On timeout the inner future is dropped, which rolls back any
    /// open transaction.
    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout.as_secs()))?
    }
}

#[async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn save_assessment(
        &self,
        user_id: Uuid,
        answers: &AssessmentAnswers,
    ) -> Result<Uuid, StoreError> {
        let (answer_count, from_resume) = (answers.len(), answers.is_empty());
        let answers = serde_json::to_value(answers)?;
        self.bounded(async {
            let id: Uuid = sqlx::query_scalar(
                "INSERT INTO assessments (user_id, answers) VALUES ($1, $2) RETURNING id",
            )
            .bind(user_id)
            .bind(&answers)
            .fetch_one(&self.pool)
            .await?;
            debug!(
                "Saved assessment {id} for user {user_id} ({} answers{})",
                answer_count,
                if from_resume { ", resume submission" } else { "" }
            );
            Ok(id)
        })
        .await
    }

    /// Delete and re-insert run in one transaction: readers see either the old set or the
    /// new one. A per-user advisory lock taken first serializes overlapping writers, so the
    /// second writer's delete sees the first writer's committed rows.
    async fn save_recommendations(
        &self,
        user_id: Uuid,
        assessment_id: Uuid,
        recommendations: &[CareerRecommendation],
        selected_countries: &[String],
    ) -> Result<(), StoreError> {
        self.bounded(async {
            let mut tx = self.pool.begin().await?;

            // Released on commit or rollback.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

            let deleted = sqlx::query("DELETE FROM career_recommendations WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            for (rank, rec) in recommendations.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO career_recommendations
                        (user_id, assessment_id, rank, title, match_percentage, description,
                         average_salary, growth_rate, required_skills, learning_path,
                         job_market_demand, selected_countries)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(user_id)
                .bind(assessment_id)
                .bind(rank as i32)
                .bind(&rec.title)
                .bind(rec.match_percentage as i32)
                .bind(&rec.description)
                .bind(&rec.average_salary)
                .bind(&rec.growth_rate)
                .bind(&rec.required_skills)
                .bind(&rec.learning_path)
                .bind(rec.job_market_demand.as_str())
                .bind(selected_countries)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            info!(
                "Replaced {} recommendations with {} for user {} (assessment {})",
                deleted,
                recommendations.len(),
                user_id,
                assessment_id
            );
            Ok(())
        })
        .await
    }

    async fn fetch_recommendations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CareerRecommendation>, StoreError> {
        let rows = self
            .bounded(async {
                Ok(sqlx::query_as::<_, CareerRecommendationRow>(
                    r#"
                    SELECT * FROM career_recommendations
                    WHERE user_id = $1
                    ORDER BY created_at DESC, rank ASC
                    LIMIT $2
                    "#,
                )
                .bind(user_id)
                .bind(RECOMMENDATION_LIMIT)
                .fetch_all(&self.pool)
                .await?)
            })
            .await?;

        debug!("Fetched {} recommendations for user {user_id}", rows.len());
        rows.into_iter()
            .map(|row| CareerRecommendation::try_from(row).map_err(StoreError::InvalidRow))
            .collect()
    }

    async fn latest_assessment(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AssessmentAnswers>, StoreError> {
        let row = self
            .bounded(async {
                Ok(sqlx::query_as::<_, AssessmentRow>(
                    "SELECT * FROM assessments WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
                )
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?)
            })
            .await?;

        row.map(|r| serde_json::from_value(r.answers))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        self.bounded(async {
            Ok(
                sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await?,
            )
        })
        .await
    }
}

/// Run against a live PostgreSQL when `TEST_DATABASE_URL` is set; skipped otherwise.
/// Every test works on fresh user ids, so a shared database is fine.
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::create_pool;
    use crate::store::memory::recommendation;

    async fn test_store() -> Option<Arc<PgRecommendationStore>> {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping PostgreSQL store test");
            return None;
        };
        let pool = create_pool(&url, Duration::from_secs(10)).await.unwrap();
        Some(Arc::new(PgRecommendationStore::new(
            pool,
            Duration::from_secs(30),
        )))
    }

    fn titled(prefix: &str, count: usize) -> Vec<CareerRecommendation> {
        (0..count)
            .map(|i| recommendation(&i.to_string(), &format!("{prefix}{i}")))
            .collect()
    }

    fn titles(recs: &[CareerRecommendation]) -> Vec<String> {
        recs.iter().map(|r| r.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_replace_returns_only_new_set_in_rank_order() {
        let Some(store) = test_store().await else { return };
        let user = Uuid::new_v4();

        let first = store.save_assessment(user, &AssessmentAnswers::new()).await.unwrap();
        store
            .save_recommendations(user, first, &titled("Old", 3), &[])
            .await
            .unwrap();

        let second = store.save_assessment(user, &AssessmentAnswers::new()).await.unwrap();
        let mut fresh = titled("New", 5);
        fresh[2].match_percentage = 55;
        store
            .save_recommendations(user, second, &fresh, &["Germany".to_string()])
            .await
            .unwrap();

        let served = store.fetch_recommendations(user).await.unwrap();
        assert_eq!(titles(&served), vec!["New0", "New1", "New2", "New3", "New4"]);
        assert_eq!(served[2].match_percentage, 55);
        assert!(served.iter().all(|r| Uuid::parse_str(&r.id).is_ok()));
    }

    #[tokio::test]
    async fn test_fetch_is_capped_at_limit() {
        let Some(store) = test_store().await else { return };
        let user = Uuid::new_v4();
        let a = store.save_assessment(user, &AssessmentAnswers::new()).await.unwrap();
        store
            .save_recommendations(user, a, &titled("Role", 15), &[])
            .await
            .unwrap();

        let served = store.fetch_recommendations(user).await.unwrap();
        assert_eq!(served.len(), RECOMMENDATION_LIMIT as usize);
        assert_eq!(served[0].title, "Role0");
        assert_eq!(served[9].title, "Role9");
    }

    #[tokio::test]
    async fn test_concurrent_replaces_never_mix_sets() {
        let Some(store) = test_store().await else { return };

        for _ in 0..20 {
            let user = Uuid::new_v4();
            let seed = store.save_assessment(user, &AssessmentAnswers::new()).await.unwrap();
            store
                .save_recommendations(user, seed, &titled("Seed", 1), &[])
                .await
                .unwrap();

            let (a, b) = (titled("A", 5), titled("B", 5));
            let (ra, rb) = tokio::join!(
                store.save_recommendations(user, seed, &a, &[]),
                store.save_recommendations(user, seed, &b, &[]),
            );
            ra.unwrap();
            rb.unwrap();

            let served = titles(&store.fetch_recommendations(user).await.unwrap());
            assert_eq!(served.len(), 5, "mixed set: {served:?}");
            let prefix = &served[0][..1];
            assert!(
                served.iter().all(|t| t.starts_with(prefix)),
                "mixed set: {served:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_writes_never_mix_sets() {
        let Some(store) = test_store().await else { return };
        let user = Uuid::new_v4();
        let seed = store.save_assessment(user, &AssessmentAnswers::new()).await.unwrap();

        let (a, b) = (titled("A", 4), titled("B", 4));
        let (ra, rb) = tokio::join!(
            store.save_recommendations(user, seed, &a, &[]),
            store.save_recommendations(user, seed, &b, &[]),
        );
        ra.unwrap();
        rb.unwrap();

        assert_eq!(store.fetch_recommendations(user).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_latest_assessment_round_trips_answers() {
        use crate::models::assessment::{AnswerValue, AssessmentAnswer, QuestionId};

        let Some(store) = test_store().await else { return };
        let user = Uuid::new_v4();
        assert!(store.latest_assessment(user).await.unwrap().is_none());

        let answers = AssessmentAnswers::from(vec![
            AssessmentAnswer::new(
                QuestionId::Experience,
                AnswerValue::Scalar("Entry Level".to_string()),
            ),
            AssessmentAnswer::new(
                QuestionId::Country,
                AnswerValue::List(vec!["Japan".to_string()]),
            ),
        ]);
        store.save_assessment(user, &answers).await.unwrap();
        assert_eq!(store.latest_assessment(user).await.unwrap(), Some(answers));
        assert!(store.user_profile(user).await.unwrap().is_none());
    }
}
