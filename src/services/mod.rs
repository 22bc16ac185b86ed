pub mod collaborative;
pub mod content;
pub mod employer_profile;
pub mod factorization;
pub mod fusion;
pub mod profile;
pub mod providers;
pub mod recommendations;
pub mod tfidf;

pub use content::{ContentScorer, ScoringWeights};
pub use factorization::{FactorizationParams, MatrixFactorization};
pub use providers::{CatalogSource, FeedbackSource, MetricsSource, RecommendationStore};
pub use recommendations::{HybridRecommender, RecommendationService};
