use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{
        Employer, EmployerId, FeedbackSets, RankedEmployer, Recommendation, RecommendationKey,
        RecommendationRequest, RepositoryMetrics,
    },
    services::{
        collaborative::CollaborativeScorer,
        content::{ContentScorer, ScoringWeights},
        employer_profile::build_employer_profiles,
        factorization::FactorizationParams,
        fusion::fuse_and_rank,
        profile::build_user_profile,
        providers::{CatalogSource, FeedbackSource, MetricsSource, RecommendationStore},
    },
};

/// The hybrid content + collaborative-filtering ranking pipeline
#[derive(Debug, Clone)]
pub struct HybridRecommender {
    weights: ScoringWeights,
    factorization: FactorizationParams,
    logo_dir: String,
}

impl Default for HybridRecommender {
    fn default() -> Self {
        Self::new(
            ScoringWeights::default(),
            FactorizationParams::default(),
            "./crawling_img".to_string(),
        )
    }
}

impl HybridRecommender {
    pub fn new(weights: ScoringWeights, factorization: FactorizationParams, logo_dir: String) -> Self {
        Self {
            weights,
            factorization,
            logo_dir,
        }
    }

    /// Ranks every non-blacklisted employer for one user
    ///
    /// Fails when there are no repository metrics or no employers; a ranking
    /// built from either would be meaningless.
    pub fn recommend(
        &self,
        user_name: &str,
        repositories: &[RepositoryMetrics],
        employers: &[Employer],
        feedback: &FeedbackSets,
    ) -> AppResult<Vec<RankedEmployer>> {
        if repositories.is_empty() {
            return Err(AppError::MissingInputData(
                "Analysis result contains no repositories".to_string(),
            ));
        }
        if employers.is_empty() {
            return Err(AppError::MissingInputData(
                "Employer catalog is empty".to_string(),
            ));
        }

        let user_profile = build_user_profile(repositories)?;

        let employer_profiles = build_employer_profiles(employers);
        let content_scores =
            ContentScorer::new(&self.weights).score(&user_profile, &employer_profiles, feedback);

        let cf_scores = CollaborativeScorer::new(self.factorization).score(
            user_name,
            &user_profile,
            employers,
            feedback,
        );

        let ranked = fuse_and_rank(
            employers,
            &content_scores,
            &cf_scores,
            feedback,
            &self.weights,
            &self.logo_dir,
        );

        tracing::debug!(
            employers = employers.len(),
            cf_scored = cf_scores.len(),
            ranked = ranked.len(),
            "Hybrid ranking computed"
        );

        Ok(ranked)
    }
}

/// Runs recommendations against the configured collaborators
pub struct RecommendationService {
    catalog: Arc<dyn CatalogSource>,
    feedback: Arc<dyn FeedbackSource>,
    metrics: Arc<dyn MetricsSource>,
    store: Arc<dyn RecommendationStore>,
    recommender: HybridRecommender,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        feedback: Arc<dyn FeedbackSource>,
        metrics: Arc<dyn MetricsSource>,
        store: Arc<dyn RecommendationStore>,
        recommender: HybridRecommender,
    ) -> Self {
        Self {
            catalog,
            feedback,
            metrics,
            store,
            recommender,
        }
    }

    /// Computes, persists and returns the recommendation for a repository selection
    ///
    /// Nothing is persisted when the run fails.
    pub async fn run(&self, request: RecommendationRequest) -> AppResult<Recommendation> {
        let start = Instant::now();
        let RecommendationRequest {
            user_id,
            selected_repositories_id,
            user_github_name,
            analysis,
        } = request;

        tracing::info!(
            user_id,
            selected_repositories_id = %selected_repositories_id,
            inline_analysis = analysis.is_some(),
            "Starting recommendation run"
        );

        let analysis_future = async {
            match analysis {
                Some(report) => Ok(report),
                None => self.metrics.load_analysis(&selected_repositories_id).await,
            }
        };

        let (employers, feedback, report) = tokio::try_join!(
            self.catalog.load_employers(),
            self.feedback.load_feedback(user_id),
            analysis_future,
        )?;

        tracing::info!(
            employers = employers.len(),
            repositories = report.repositories.len(),
            liked = feedback.liked.len(),
            blacklisted = feedback.blacklisted.len(),
            scraped = feedback.scraped.len(),
            searched = feedback.searched.len(),
            "Inputs loaded"
        );

        let recommender = self.recommender.clone();
        let user_name = user_github_name.clone();
        let ranked = tokio::task::spawn_blocking(move || {
            recommender.recommend(&user_name, &report.repositories, &employers, &feedback)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        let record = Recommendation {
            user_id,
            selected_repositories_id,
            user_github_name,
            recommendations: ranked,
            timestamp: Utc::now(),
        };

        self.store.upsert(&record).await?;

        tracing::info!(
            user_id,
            selected_repositories_id = %record.selected_repositories_id,
            recommendations = record.recommendations.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendation run stored"
        );

        Ok(record)
    }

    /// Most recent stored result for a user and repository selection
    pub async fn latest(&self, key: &RecommendationKey) -> AppResult<Recommendation> {
        self.store
            .find(key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No recommendation for {}", key)))
    }

    /// Records an employer detail view for later search bonuses
    pub async fn record_search_detail(&self, user_id: i64, employer_id: EmployerId) -> AppResult<()> {
        self.feedback.record_search_detail(user_id, employer_id).await?;
        tracing::debug!(user_id, employer_id, "Recorded search detail view");
        Ok(())
    }
}
