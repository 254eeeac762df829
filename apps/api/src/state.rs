use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::store::RecommendationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Default: PgRecommendationStore.
    pub store: Arc<dyn RecommendationStore>,
    /// Owns the response cache; clones share it.
    pub llm: LlmClient,
}
