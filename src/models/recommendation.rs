use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

use super::{AnalysisReport, EmployerId};

/// Employer id → score for one family of scores within one run
pub type ScoreMap = HashMap<EmployerId, f64>;

/// Key under which a recommendation run is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecommendationKey {
    pub user_id: i64,
    pub selected_repositories_id: String,
}

impl RecommendationKey {
    pub fn new(user_id: i64, selected_repositories_id: impl Into<String>) -> Self {
        Self {
            user_id,
            selected_repositories_id: selected_repositories_id.into(),
        }
    }
}

impl Display for RecommendationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.user_id, self.selected_repositories_id)
    }
}

/// One employer in the final ranking with every score that produced its rank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEmployer {
    pub company_id: EmployerId,
    pub company_name: String,
    pub content_score_raw: f64,
    pub cf_score_raw: f64,
    pub content_score_norm: f64,
    pub cf_score_norm: f64,
    pub hybrid_score: f64,
    pub logo: String,
}

/// Persisted result of a recommendation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub user_id: i64,
    pub selected_repositories_id: String,
    pub user_github_name: String,
    pub recommendations: Vec<RankedEmployer>,
    pub timestamp: DateTime<Utc>,
}

impl Recommendation {
    pub fn key(&self) -> RecommendationKey {
        RecommendationKey::new(self.user_id, self.selected_repositories_id.clone())
    }
}

/// Request to compute recommendations for a repository selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationRequest {
    pub user_id: i64,
    pub selected_repositories_id: String,
    pub user_github_name: String,
    /// Inline analysis; fetched from the analysis service when absent
    #[serde(default)]
    pub analysis: Option<AnalysisReport>,
}
