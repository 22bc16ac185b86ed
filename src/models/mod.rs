mod employer;
mod feedback;
mod metrics;
mod recommendation;

pub use employer::{Employer, EmployerId, JobPosting};
pub use feedback::FeedbackSets;
pub use metrics::{
    AnalysisReport, ComplexityMetrics, LanguageCommits, MergedUserMetrics, ReadmeAnalysis,
    RepositoryMetrics,
};
pub use recommendation::{
    RankedEmployer, Recommendation, RecommendationKey, RecommendationRequest, ScoreMap,
};
