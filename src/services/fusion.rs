use std::path::Path;

use crate::models::{Employer, FeedbackSets, RankedEmployer, ScoreMap};
use crate::services::content::ScoringWeights;

/// Min-max normalizes a score map into [0, 1]
///
/// A map whose scores are all equal is returned unchanged; dividing by a zero
/// range would make every value undefined.
pub fn min_max_normalize(scores: &ScoreMap) -> ScoreMap {
    let min = scores.values().copied().fold(f64::INFINITY, f64::min);
    let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);

    if scores.is_empty() || max == min {
        return scores.clone();
    }

    let range = max - min;
    scores
        .iter()
        .map(|(id, score)| (*id, (score - min) / range))
        .collect()
}

/// Path of an employer's logo under `logo_dir`, empty when there is none
pub fn logo_path(logo_dir: &str, logo: Option<&str>) -> String {
    match logo.filter(|name| !name.is_empty()) {
        Some(name) => Path::new(logo_dir).join(name).to_string_lossy().into_owned(),
        None => String::new(),
    }
}

/// Combines both score families into the final ranked list
///
/// Employers keep catalog order until the stable sort, so equal hybrid scores
/// stay in catalog order. Blacklisted employers never appear.
pub fn fuse_and_rank(
    employers: &[Employer],
    content_scores: &ScoreMap,
    cf_scores: &ScoreMap,
    feedback: &FeedbackSets,
    weights: &ScoringWeights,
    logo_dir: &str,
) -> Vec<RankedEmployer> {
    let content_norm = min_max_normalize(content_scores);
    let cf_norm = min_max_normalize(cf_scores);

    let mut ranked: Vec<RankedEmployer> = employers
        .iter()
        .filter(|employer| !feedback.is_blacklisted(employer.id))
        .map(|employer| {
            let content_score_norm = content_norm.get(&employer.id).copied().unwrap_or(0.0);
            let cf_score_norm = cf_norm.get(&employer.id).copied().unwrap_or(0.0);
            RankedEmployer {
                company_id: employer.id,
                company_name: employer.name.clone(),
                content_score_raw: content_scores.get(&employer.id).copied().unwrap_or(0.0),
                cf_score_raw: cf_scores.get(&employer.id).copied().unwrap_or(0.0),
                content_score_norm,
                cf_score_norm,
                hybrid_score: weights.content_weight * content_score_norm
                    + weights.cf_weight * cf_score_norm,
                logo: logo_path(logo_dir, employer.logo.as_deref()),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.hybrid_score.total_cmp(&a.hybrid_score));

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employers() -> Vec<Employer> {
        vec![
            Employer::new(1, "One").with_logo("one.png"),
            Employer::new(2, "Two"),
            Employer::new(3, "Three"),
        ]
    }

    fn map(entries: &[(i64, f64)]) -> ScoreMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_normalize_bounds() {
        let normalized = min_max_normalize(&map(&[(1, 2.0), (2, 4.0), (3, 3.0)]));
        assert_eq!(normalized[&1], 0.0);
        assert_eq!(normalized[&2], 1.0);
        assert_eq!(normalized[&3], 0.5);
        assert!(normalized.values().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_normalize_degenerate_passes_through() {
        let scores = map(&[(1, 0.7), (2, 0.7)]);
        assert_eq!(min_max_normalize(&scores), scores);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(min_max_normalize(&ScoreMap::new()).is_empty());
    }

    #[test]
    fn test_blacklisted_top_employer_is_excluded() {
        let content = map(&[(1, 0.2), (2, 0.5), (3, 0.9)]);
        let cf = map(&[(1, 1.0), (2, 2.0), (3, 5.0)]);
        let feedback = FeedbackSets::new().blacklist(3);

        let ranked = fuse_and_rank(
            &employers(),
            &content,
            &cf,
            &feedback,
            &ScoringWeights::default(),
            "./logos",
        );

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.company_id != 3));
        assert_eq!(ranked[0].company_id, 2);
    }

    #[test]
    fn test_degenerate_maps_still_rank() {
        let content = map(&[(1, 0.0), (2, 0.0), (3, 0.0)]);
        let cf = map(&[(1, 3.0), (2, 3.0), (3, 3.0)]);
        let ranked = fuse_and_rank(
            &employers(),
            &content,
            &cf,
            &FeedbackSets::new(),
            &ScoringWeights::default(),
            "",
        );
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.hybrid_score.is_finite()));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let content = map(&[(1, 0.5), (2, 0.5), (3, 0.5)]);
        for _ in 0..5 {
            let ranked = fuse_and_rank(
                &employers(),
                &content,
                &ScoreMap::new(),
                &FeedbackSets::new(),
                &ScoringWeights::default(),
                "",
            );
            let order: Vec<i64> = ranked.iter().map(|r| r.company_id).collect();
            assert_eq!(order, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_empty_cf_map_leaves_content_term_only() {
        let weights = ScoringWeights::default();
        let content = map(&[(1, 0.1), (2, 0.6), (3, 0.3)]);
        let ranked = fuse_and_rank(
            &employers(),
            &content,
            &ScoreMap::new(),
            &FeedbackSets::new(),
            &weights,
            "",
        );
        for r in &ranked {
            assert_eq!(r.cf_score_norm, 0.0);
            assert_eq!(r.hybrid_score, weights.content_weight * r.content_score_norm);
        }
    }

    #[test]
    fn test_ranking_is_descending_with_stable_ties() {
        let content = map(&[(1, 0.2), (2, 0.9), (3, 0.9)]);
        let ranked = fuse_and_rank(
            &employers(),
            &content,
            &ScoreMap::new(),
            &FeedbackSets::new(),
            &ScoringWeights::default(),
            "",
        );
        let order: Vec<i64> = ranked.iter().map(|r| r.company_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_logo_path() {
        assert_eq!(logo_path("./crawling_img", Some("acme.png")), "./crawling_img/acme.png");
        assert_eq!(logo_path("./crawling_img", Some("")), "");
        assert_eq!(logo_path("./crawling_img", None), "");
    }
}
