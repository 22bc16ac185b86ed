use crate::error::{AppError, AppResult};
use crate::models::{MergedUserMetrics, RepositoryMetrics};

/// Flesch Reading Ease above which a user's READMEs count as easy to read
pub const EASY_READ_THRESHOLD: f64 = 70.0;
pub const EASY_READ_TOKEN: &str = "EasyRead";
pub const HARD_READ_TOKEN: &str = "HardRead";

/// Largest merged commit count accepted for a single language
///
/// The profile repeats each language once per effective commit, so the bound
/// caps the size of the token bag.
pub const MAX_COMMIT_COUNT: u64 = 1_000_000;

/// Folds the metrics of every selected repository into one view
///
/// Commit counts are summed. A language's complexity entry is taken from its
/// first repository and replaced by a later one only when that later entry has
/// a strictly positive average cyclomatic complexity. Repositories without a
/// Flesch score do not take part in the maximum.
pub fn merge_repository_metrics(repositories: &[RepositoryMetrics]) -> MergedUserMetrics {
    let mut merged = MergedUserMetrics::default();
    let mut flesch_scores = Vec::new();

    for repo in repositories {
        for (language, commits) in &repo.language_commit_metrics {
            let total = merged.commits.entry(language.clone()).or_insert(0);
            *total = total.saturating_add(commits.commit_count);
        }

        for (language, metrics) in &repo.complexity_metrics {
            match merged.complexity.get_mut(language) {
                Some(existing) => {
                    if metrics.average_cyclomatic_complexity > 0.0 {
                        *existing = metrics.clone();
                    }
                }
                None => {
                    merged.complexity.insert(language.clone(), metrics.clone());
                }
            }
        }

        if let Some(score) = repo
            .readme_analysis
            .as_ref()
            .and_then(|readme| readme.flesch_reading_ease)
        {
            flesch_scores.push(score);
        }
    }

    merged.max_flesch = flesch_scores.into_iter().fold(0.0, f64::max);
    merged
}

/// Smallest positive average cyclomatic complexity among languages with commits
fn min_complexity(merged: &MergedUserMetrics) -> f64 {
    merged
        .commits
        .iter()
        .filter(|(_, &commit_count)| commit_count > 0)
        .filter_map(|(language, _)| merged.complexity.get(language))
        .map(|metrics| metrics.average_cyclomatic_complexity)
        .filter(|cc| *cc > 0.0)
        .reduce(f64::min)
        .unwrap_or(1.0)
}

/// Complexity-adjusted commit count per language with commits, in language order
pub fn effective_commits(merged: &MergedUserMetrics) -> Vec<(String, u64)> {
    let floor = min_complexity(merged);

    merged
        .commits
        .iter()
        .filter(|(_, &commit_count)| commit_count > 0)
        .map(|(language, &commit_count)| {
            let avg_cc = merged
                .complexity
                .get(language)
                .map(|m| m.average_cyclomatic_complexity)
                .filter(|cc| *cc > 0.0)
                .unwrap_or(1.0);
            let weight = floor / avg_cc;
            // Half-way cases round to even
            let effective = (commit_count as f64 * weight).round_ties_even().max(1.0) as u64;
            (language.clone(), effective)
        })
        .collect()
}

/// Builds the weighted token bag describing the user
///
/// Each language appears as many times as its effective commit count, followed
/// by a single readability token. Fails when a language's merged commit count
/// exceeds [`MAX_COMMIT_COUNT`].
pub fn build_user_profile(repositories: &[RepositoryMetrics]) -> AppResult<String> {
    let merged = merge_repository_metrics(repositories);
    if let Some((language, count)) = merged
        .commits
        .iter()
        .find(|(_, &count)| count > MAX_COMMIT_COUNT)
    {
        return Err(AppError::InvalidInput(format!(
            "Commit count {} for {} exceeds the limit of {}",
            count, language, MAX_COMMIT_COUNT
        )));
    }

    let weighted = effective_commits(&merged);

    let mut tokens: Vec<&str> = Vec::new();
    for (language, count) in &weighted {
        tokens.extend(std::iter::repeat(language.as_str()).take(*count as usize));
    }

    let readability = if merged.max_flesch > EASY_READ_THRESHOLD {
        EASY_READ_TOKEN
    } else {
        HARD_READ_TOKEN
    };
    tokens.push(readability);

    tracing::debug!(
        languages = weighted.len(),
        max_flesch = merged.max_flesch,
        readability,
        "Built user profile"
    );

    Ok(tokens.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_count(profile: &str, token: &str) -> usize {
        profile.split_whitespace().filter(|t| *t == token).count()
    }

    #[test]
    fn test_single_language_profile() {
        let repo = RepositoryMetrics::new()
            .with_commits("Python", 10)
            .with_complexity("Python", 2.0)
            .with_flesch(80.0);

        let profile = build_user_profile(&[repo]).unwrap();
        assert_eq!(token_count(&profile, "Python"), 10);
        assert_eq!(token_count(&profile, EASY_READ_TOKEN), 1);
        assert_eq!(profile.split_whitespace().count(), 11);
    }

    #[test]
    fn test_complex_language_is_damped() {
        let repo = RepositoryMetrics::new()
            .with_commits("Python", 10)
            .with_complexity("Python", 2.0)
            .with_commits("Java", 10)
            .with_complexity("Java", 4.0);

        let profile = build_user_profile(&[repo]).unwrap();
        assert_eq!(token_count(&profile, "Python"), 10);
        assert_eq!(token_count(&profile, "Java"), 5);
        assert_eq!(token_count(&profile, HARD_READ_TOKEN), 1);
    }

    #[test]
    fn test_every_used_language_keeps_one_token() {
        let repo = RepositoryMetrics::new()
            .with_commits("Shell", 1)
            .with_complexity("Shell", 50.0)
            .with_commits("Go", 4)
            .with_complexity("Go", 1.0);

        let profile = build_user_profile(&[repo]).unwrap();
        assert_eq!(token_count(&profile, "Shell"), 1);
    }

    #[test]
    fn test_zero_commit_language_is_left_out() {
        let repo = RepositoryMetrics::new()
            .with_commits("Python", 10)
            .with_complexity("Python", 2.0)
            .with_commits("Java", 0)
            .with_flesch(80.0);
        let profile = build_user_profile(&[repo]).unwrap();
        assert_eq!(token_count(&profile, "Java"), 0);
        assert_eq!(token_count(&profile, "Python"), 10);
        assert_eq!(profile.split_whitespace().count(), 11);
    }

    #[test]
    fn test_zero_commit_language_does_not_set_complexity_floor() {
        let repo = RepositoryMetrics::new()
            .with_commits("Python", 10)
            .with_complexity("Python", 2.0)
            .with_commits("Java", 0)
            .with_complexity("Java", 0.5);
        let merged = merge_repository_metrics(&[repo]);
        assert_eq!(effective_commits(&merged), vec![("Python".to_string(), 10)]);
    }

    #[test]
    fn test_commit_count_above_limit_is_rejected() {
        let repo = RepositoryMetrics::new().with_commits("Python", MAX_COMMIT_COUNT + 1);
        let result = build_user_profile(&[repo]);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));

        let at_limit = RepositoryMetrics::new().with_commits("Go", MAX_COMMIT_COUNT);
        let merged = merge_repository_metrics(&[at_limit]);
        assert_eq!(merged.commits["Go"], MAX_COMMIT_COUNT);
    }

    #[test]
    fn test_commit_sum_saturates() {
        let a = RepositoryMetrics::new().with_commits("Rust", u64::MAX);
        let b = RepositoryMetrics::new().with_commits("Rust", 5);
        let merged = merge_repository_metrics(&[a.clone(), b.clone()]);
        assert_eq!(merged.commits["Rust"], u64::MAX);
        assert!(matches!(
            build_user_profile(&[a, b]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_complexity_defaults_to_neutral_weight() {
        let repo = RepositoryMetrics::new().with_commits("Ruby", 6);
        let merged = merge_repository_metrics(&[repo]);
        assert_eq!(effective_commits(&merged), vec![("Ruby".to_string(), 6)]);
    }

    #[test]
    fn test_commits_are_summed_across_repositories() {
        let a = RepositoryMetrics::new().with_commits("Rust", 3);
        let b = RepositoryMetrics::new().with_commits("Rust", 4);
        let merged = merge_repository_metrics(&[a, b]);
        assert_eq!(merged.commits["Rust"], 7);
    }

    #[test]
    fn test_last_positive_complexity_wins() {
        let first = RepositoryMetrics::new().with_complexity("Rust", 3.0);
        let second = RepositoryMetrics::new().with_complexity("Rust", 5.0);
        let zero = RepositoryMetrics::new().with_complexity("Rust", 0.0);

        let merged = merge_repository_metrics(&[first.clone(), second, zero.clone()]);
        assert_eq!(merged.complexity["Rust"].average_cyclomatic_complexity, 5.0);

        // A zero entry seen first is still inserted, then replaced
        let merged = merge_repository_metrics(&[zero, first]);
        assert_eq!(merged.complexity["Rust"].average_cyclomatic_complexity, 3.0);
    }

    #[test]
    fn test_max_flesch_across_repositories() {
        let a = RepositoryMetrics::new().with_flesch(40.0);
        let b = RepositoryMetrics::new().with_flesch(71.5);
        let c = RepositoryMetrics::new();
        let merged = merge_repository_metrics(&[a, b, c]);
        assert_eq!(merged.max_flesch, 71.5);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let repo = RepositoryMetrics::new()
            .with_commits("C", 1)
            .with_flesch(70.0);
        let profile = build_user_profile(&[repo]).unwrap();
        assert!(profile.ends_with(HARD_READ_TOKEN));
    }

    #[test]
    fn test_commit_count_monotonicity() {
        let mut previous = 0;
        for commits in 0..40 {
            let repo = RepositoryMetrics::new()
                .with_commits("Python", commits)
                .with_complexity("Python", 3.0)
                .with_commits("Go", 7)
                .with_complexity("Go", 1.5);
            let profile = build_user_profile(&[repo]).unwrap();
            let count = token_count(&profile, "Python");
            assert!(count >= previous, "count dropped at {} commits", commits);
            previous = count;
        }
    }
}
