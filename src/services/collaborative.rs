use std::collections::HashMap;

use crate::models::{Employer, EmployerId, FeedbackSets, ScoreMap};
use crate::services::factorization::{
    FactorizationParams, MatrixFactorization, Rating, RatingModel,
};
use crate::services::tfidf::{cosine_similarities, TfidfVectorizer};

pub const LIKED_RATING: f64 = 5.0;
pub const BLACKLISTED_RATING: f64 = 1.0;

/// Estimates employer scores from a latent-factor model over synthetic ratings
///
/// The rating table holds exactly one actor, the user, so the model acts as a
/// regularized smoother of the synthetic ratings rather than drawing signal
/// from other users.
pub struct CollaborativeScorer {
    trainer: MatrixFactorization,
}

impl CollaborativeScorer {
    pub fn new(params: FactorizationParams) -> Self {
        Self {
            trainer: MatrixFactorization::new(params),
        }
    }

    /// Summed similarity between the user and each employer's postings
    ///
    /// Returns `None` when no posting carries any tech-stack text.
    pub fn interactions(user_profile: &str, employers: &[Employer]) -> Option<HashMap<EmployerId, f64>> {
        let (owners, texts): (Vec<EmployerId>, Vec<String>) = employers
            .iter()
            .flat_map(|employer| employer.postings.iter())
            .map(|posting| (posting.employer_id, posting.tech_text()))
            .filter(|(_, text)| !text.is_empty())
            .unzip();

        if texts.is_empty() {
            return None;
        }

        let (vectorizer, job_vectors) = TfidfVectorizer::fit_transform(&texts);
        let user_vector = vectorizer.transform(user_profile);
        let similarities = cosine_similarities(&user_vector, &job_vectors);

        let mut interaction: HashMap<EmployerId, f64> = HashMap::new();
        for (owner, similarity) in owners.into_iter().zip(similarities) {
            *interaction.entry(owner).or_insert(0.0) += similarity;
        }
        Some(interaction)
    }

    /// One synthetic rating per catalog employer for `actor`
    pub fn synthetic_ratings<A: Clone>(
        actor: &A,
        employers: &[Employer],
        interaction: &HashMap<EmployerId, f64>,
        feedback: &FeedbackSets,
    ) -> Vec<Rating<A, EmployerId>> {
        let max_interaction = interaction.values().copied().fold(f64::NEG_INFINITY, f64::max);
        // All-zero interactions would divide by zero; rate them all at the floor
        let divisor = if max_interaction > 0.0 { max_interaction } else { 1.0 };

        employers
            .iter()
            .map(|employer| {
                let value = if feedback.liked.contains(&employer.id) {
                    LIKED_RATING
                } else if feedback.blacklisted.contains(&employer.id) {
                    BLACKLISTED_RATING
                } else {
                    let base = interaction.get(&employer.id).copied().unwrap_or(0.0);
                    (base / divisor) * 4.0 + 1.0
                };
                Rating::new(actor.clone(), employer.id, value)
            })
            .collect()
    }

    /// Predicted score for every catalog employer, empty if no posting has text
    pub fn score(
        &self,
        user_name: &str,
        user_profile: &str,
        employers: &[Employer],
        feedback: &FeedbackSets,
    ) -> ScoreMap {
        let Some(interaction) = Self::interactions(user_profile, employers) else {
            tracing::info!("No job posting carries tech-stack text; skipping collaborative filtering");
            return ScoreMap::new();
        };

        let actor = user_name.to_string();
        let ratings = Self::synthetic_ratings(&actor, employers, &interaction, feedback);
        let model = self.trainer.fit(&ratings);

        employers
            .iter()
            .map(|employer| (employer.id, model.predict(&actor, &employer.id)))
            .collect()
    }
}
