use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

/// Per-language complexity figures produced by the repository analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    #[serde(default)]
    pub average_cyclomatic_complexity: f64,
    /// Number of analyzed files for the language
    #[serde(default, alias = "file_count")]
    pub total_files: u64,
    #[serde(default)]
    pub average_nloc: f64,
    #[serde(default)]
    pub average_token_count: f64,
    #[serde(default)]
    pub average_parameter_count: f64,
}

/// Commit activity for one language
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageCommits {
    #[serde(default)]
    pub commit_count: u64,
}

/// README readability summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadmeAnalysis {
    #[serde(default)]
    pub word_count: u64,
    /// Absent when the repository has no README or it could not be scored
    #[serde(default)]
    pub flesch_reading_ease: Option<f64>,
}

/// Metrics captured for a single analyzed repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetrics {
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub language_commit_metrics: BTreeMap<String, LanguageCommits>,
    #[serde(default)]
    pub complexity_metrics: BTreeMap<String, ComplexityMetrics>,
    #[serde(default)]
    pub readme_analysis: Option<ReadmeAnalysis>,
}

impl RepositoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records commits for a language, accumulating into any existing count
    pub fn with_commits(mut self, language: &str, commit_count: u64) -> Self {
        self.language_commit_metrics
            .entry(language.to_string())
            .or_default()
            .commit_count += commit_count;
        self
    }

    /// Sets the average cyclomatic complexity for a language
    pub fn with_complexity(mut self, language: &str, average_cyclomatic_complexity: f64) -> Self {
        self.complexity_metrics.insert(
            language.to_string(),
            ComplexityMetrics {
                average_cyclomatic_complexity,
                ..ComplexityMetrics::default()
            },
        );
        self
    }

    /// Sets the README Flesch Reading Ease score
    pub fn with_flesch(mut self, flesch_reading_ease: f64) -> Self {
        let readme = self.readme_analysis.get_or_insert_with(ReadmeAnalysis::default);
        readme.flesch_reading_ease = Some(flesch_reading_ease);
        self
    }
}

/// Analysis document for one repository selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub repositories: Vec<RepositoryMetrics>,
}

impl AnalysisReport {
    /// Parses an analysis document, tolerating a leading byte-order mark
    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim().trim_start_matches('\u{feff}');
        serde_json::from_str(trimmed)
            .map_err(|e| AppError::InvalidInput(format!("Malformed analysis report: {}", e)))
    }
}

/// All selected repositories folded into one view of the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedUserMetrics {
    pub commits: BTreeMap<String, u64>,
    pub complexity: BTreeMap<String, ComplexityMetrics>,
    /// Highest Flesch Reading Ease across repositories, 0 when none was scored
    pub max_flesch: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_report() {
        let raw = r#"{
            "repositories": [{
                "repository": "octo/tool",
                "language_commit_metrics": {"Rust": {"commit_count": 12}},
                "complexity_metrics": {"Rust": {"average_cyclomatic_complexity": 2.5, "total_files": 4}},
                "readme_analysis": {"word_count": 120, "flesch_reading_ease": 65.3}
            }]
        }"#;

        let report = AnalysisReport::from_json_str(raw).unwrap();
        assert_eq!(report.repositories.len(), 1);
        let repo = &report.repositories[0];
        assert_eq!(repo.repository.as_deref(), Some("octo/tool"));
        assert_eq!(repo.language_commit_metrics["Rust"].commit_count, 12);
        assert_eq!(repo.complexity_metrics["Rust"].total_files, 4);
        assert_eq!(
            repo.readme_analysis.as_ref().unwrap().flesch_reading_ease,
            Some(65.3)
        );
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let raw = "\u{feff}{\"repositories\": []}  ";
        let report = AnalysisReport::from_json_str(raw).unwrap();
        assert!(report.repositories.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = AnalysisReport::from_json_str("{\"repositories\": [");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_null_flesch_is_none() {
        let raw = r#"{"repositories": [{"readme_analysis": {"word_count": 0, "flesch_reading_ease": null}}]}"#;
        let report = AnalysisReport::from_json_str(raw).unwrap();
        let readme = report.repositories[0].readme_analysis.as_ref().unwrap();
        assert_eq!(readme.flesch_reading_ease, None);
    }

    #[test]
    fn test_builder_accumulates_commits() {
        let repo = RepositoryMetrics::new()
            .with_commits("Go", 3)
            .with_commits("Go", 4)
            .with_complexity("Go", 1.5)
            .with_flesch(72.0);

        assert_eq!(repo.language_commit_metrics["Go"].commit_count, 7);
        assert_eq!(repo.complexity_metrics["Go"].average_cyclomatic_complexity, 1.5);
        assert_eq!(
            repo.readme_analysis.unwrap().flesch_reading_ease,
            Some(72.0)
        );
    }
}
