//! Collaborator seams for a recommendation run.
//!
//! The engine never talks to storage or remote services directly. Each input
//! comes through one of these traits so the relational catalog, the feedback
//! stores, the analysis service and the result store can be swapped out
//! (Postgres/Redis/HTTP in production, in-memory in tests).

use crate::{
    error::AppResult,
    models::{AnalysisReport, Employer, EmployerId, FeedbackSets, Recommendation, RecommendationKey},
};

pub mod analysis;

pub use analysis::AnalysisClient;

/// Source of the employer and job-posting catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every employer with all of its postings, in a stable order
    async fn load_employers(&self) -> AppResult<Vec<Employer>>;
}

/// Source of a user's explicit feedback
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedbackSource: Send + Sync {
    /// Liked, blacklisted, scraped and searched employers of the user
    async fn load_feedback(&self, user_id: i64) -> AppResult<FeedbackSets>;

    /// Records that the user opened an employer's detail page
    async fn record_search_detail(&self, user_id: i64, employer_id: EmployerId) -> AppResult<()>;
}

/// Source of repository analysis results
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetricsSource: Send + Sync {
    /// Analysis report for a repository selection
    async fn load_analysis(&self, selected_repositories_id: &str) -> AppResult<AnalysisReport>;
}

/// Keyed store of recommendation results, last write wins
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Inserts or fully replaces the record under its key
    async fn upsert(&self, record: &Recommendation) -> AppResult<()>;

    async fn find(&self, key: &RecommendationKey) -> AppResult<Option<Recommendation>>;
}
