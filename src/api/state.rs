use std::sync::Arc;

use crate::db::MemoryBackend;
use crate::services::{HybridRecommender, RecommendationService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(recommendations: RecommendationService) -> Self {
        Self {
            recommendations: Arc::new(recommendations),
        }
    }

    /// State whose every collaborator is the given in-memory backend
    pub fn in_memory(backend: MemoryBackend, recommender: HybridRecommender) -> Self {
        let shared = Arc::new(backend);
        Self::new(RecommendationService::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared,
            recommender,
        ))
    }
}
