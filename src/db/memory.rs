use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{AnalysisReport, Employer, EmployerId, FeedbackSets, Recommendation, RecommendationKey},
    services::providers::{CatalogSource, FeedbackSource, MetricsSource, RecommendationStore},
};

/// In-process backend serving every collaborator from shared maps
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<MemoryBackendInner>>,
}

#[derive(Default)]
struct MemoryBackendInner {
    employers: Vec<Employer>,
    feedback: HashMap<i64, FeedbackSets>,
    analyses: HashMap<String, AnalysisReport>,
    records: HashMap<RecommendationKey, Recommendation>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_employers(&self, employers: Vec<Employer>) {
        self.inner.write().await.employers = employers;
    }

    pub async fn set_feedback(&self, user_id: i64, feedback: FeedbackSets) {
        self.inner.write().await.feedback.insert(user_id, feedback);
    }

    pub async fn insert_analysis(&self, selected_repositories_id: &str, report: AnalysisReport) {
        self.inner
            .write()
            .await
            .analyses
            .insert(selected_repositories_id.to_string(), report);
    }

    pub async fn record_count(&self) -> usize {
        self.inner.read().await.records.len()
    }
}

#[async_trait::async_trait]
impl CatalogSource for MemoryBackend {
    async fn load_employers(&self) -> AppResult<Vec<Employer>> {
        Ok(self.inner.read().await.employers.clone())
    }
}

#[async_trait::async_trait]
impl FeedbackSource for MemoryBackend {
    async fn load_feedback(&self, user_id: i64) -> AppResult<FeedbackSets> {
        Ok(self
            .inner
            .read()
            .await
            .feedback
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_search_detail(&self, user_id: i64, employer_id: EmployerId) -> AppResult<()> {
        self.inner
            .write()
            .await
            .feedback
            .entry(user_id)
            .or_default()
            .searched
            .insert(employer_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl MetricsSource for MemoryBackend {
    async fn load_analysis(&self, selected_repositories_id: &str) -> AppResult<AnalysisReport> {
        self.inner
            .read()
            .await
            .analyses
            .get(selected_repositories_id)
            .cloned()
            .ok_or_else(|| {
                AppError::MissingInputData(format!(
                    "No analysis found for repository selection {}",
                    selected_repositories_id
                ))
            })
    }
}

#[async_trait::async_trait]
impl RecommendationStore for MemoryBackend {
    async fn upsert(&self, record: &Recommendation) -> AppResult<()> {
        self.inner
            .write()
            .await
            .records
            .insert(record.key(), record.clone());
        Ok(())
    }

    async fn find(&self, key: &RecommendationKey) -> AppResult<Option<Recommendation>> {
        Ok(self.inner.read().await.records.get(key).cloned())
    }
}
