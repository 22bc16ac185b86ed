use crate::models::{EmployerId, FeedbackSets, ScoreMap};
use crate::services::tfidf::{cosine_similarities, cosine_similarity, SparseVector, TfidfVectorizer};

/// Weights for every feedback signal and for the final fusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Multiplier for the mean similarity to liked employers
    pub like_bonus: f64,
    /// Multiplier for the mean similarity to blacklisted employers
    pub blacklist_penalty: f64,
    /// Flat bonus for scraped employers
    pub scraped_bonus: f64,
    /// Flat bonus for employers whose detail page the user opened
    pub search_bonus: f64,
    /// Share of the normalized content score in the hybrid score
    pub content_weight: f64,
    /// Share of the normalized collaborative-filtering score in the hybrid score
    pub cf_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            like_bonus: 0.3,
            blacklist_penalty: 0.5,
            scraped_bonus: 0.5,
            search_bonus: 0.1,
            content_weight: 0.9,
            cf_weight: 0.1,
        }
    }
}

/// Scores employers by profile similarity, adjusted by the user's feedback
pub struct ContentScorer<'a> {
    weights: &'a ScoringWeights,
}

impl<'a> ContentScorer<'a> {
    pub fn new(weights: &'a ScoringWeights) -> Self {
        Self { weights }
    }

    /// Computes the content score of every employer profile
    ///
    /// The vocabulary is learned from the employer profiles alone; terms that
    /// only the user profile contains carry no weight.
    pub fn score(
        &self,
        user_profile: &str,
        employer_profiles: &[(EmployerId, String)],
        feedback: &FeedbackSets,
    ) -> ScoreMap {
        let texts: Vec<&str> = employer_profiles.iter().map(|(_, text)| text.as_str()).collect();
        let (vectorizer, employer_vectors) = TfidfVectorizer::fit_transform(&texts);
        let user_vector = vectorizer.transform(user_profile);

        let base_similarities = cosine_similarities(&user_vector, &employer_vectors);

        let liked = Self::indices_of(employer_profiles, feedback.liked.iter());
        let blacklisted = Self::indices_of(employer_profiles, feedback.blacklisted.iter());

        employer_profiles
            .iter()
            .enumerate()
            .map(|(idx, (employer_id, _))| {
                let vector = &employer_vectors[idx];
                let avg_like = Self::mean_similarity(vector, &employer_vectors, &liked);
                let avg_blacklist = Self::mean_similarity(vector, &employer_vectors, &blacklisted);

                let mut score = base_similarities[idx] + self.weights.like_bonus * avg_like
                    - self.weights.blacklist_penalty * avg_blacklist;

                if feedback.scraped.contains(employer_id) {
                    score += self.weights.scraped_bonus;
                }
                if feedback.searched.contains(employer_id) {
                    score += self.weights.search_bonus;
                }

                (*employer_id, score)
            })
            .collect()
    }

    /// Positions of the given employers in the corpus; unknown ids are skipped
    fn indices_of<'b>(
        employer_profiles: &[(EmployerId, String)],
        ids: impl Iterator<Item = &'b EmployerId>,
    ) -> Vec<usize> {
        ids.filter_map(|id| employer_profiles.iter().position(|(e, _)| e == id))
            .collect()
    }

    fn mean_similarity(vector: &SparseVector, all: &[SparseVector], indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let total: f64 = indices
            .iter()
            .map(|&i| cosine_similarity(vector, &all[i]))
            .sum();
        total / indices.len() as f64
    }
}
