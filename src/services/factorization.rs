//! Biased matrix factorization trained with stochastic gradient descent.
//!
//! Predictions follow `r̂ = μ + b_a + b_i + p_a · q_i`, clipped to the rating
//! scale. The trainer is generic over actor and item keys so a table with many
//! actors trains the same way as the single-user table used for employer
//! recommendations. With one actor the model reduces to a regularized
//! smoothing of that actor's ratings.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;
use std::hash::Hash;

/// One observed (actor, item) rating
#[derive(Debug, Clone, PartialEq)]
pub struct Rating<A, I> {
    pub actor: A,
    pub item: I,
    pub value: f64,
}

impl<A, I> Rating<A, I> {
    pub fn new(actor: A, item: I, value: f64) -> Self {
        Self { actor, item, value }
    }
}

/// Anything that can estimate a rating for an (actor, item) pair
pub trait RatingModel<A, I> {
    fn predict(&self, actor: &A, item: &I) -> f64;
}

/// Hyper-parameters for [`MatrixFactorization`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorizationParams {
    pub factors: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    pub regularization: f64,
    pub init_std_dev: f64,
    pub seed: u64,
    pub rating_min: f64,
    pub rating_max: f64,
}

impl Default for FactorizationParams {
    fn default() -> Self {
        Self {
            factors: 100,
            epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
            init_std_dev: 0.1,
            seed: 42,
            rating_min: 1.0,
            rating_max: 5.0,
        }
    }
}

/// Trainer for latent-factor models
#[derive(Debug, Clone, Default)]
pub struct MatrixFactorization {
    params: FactorizationParams,
}

/// A trained latent-factor model
#[derive(Debug, Clone)]
pub struct FactorizedModel<A, I> {
    global_mean: f64,
    actor_index: HashMap<A, usize>,
    item_index: HashMap<I, usize>,
    actor_bias: Vec<f64>,
    item_bias: Vec<f64>,
    actor_factors: Vec<Vec<f64>>,
    item_factors: Vec<Vec<f64>>,
    rating_min: f64,
    rating_max: f64,
}

impl MatrixFactorization {
    pub fn new(params: FactorizationParams) -> Self {
        Self { params }
    }

    /// Trains on `ratings`, visiting them in the given order every epoch
    pub fn fit<A, I>(&self, ratings: &[Rating<A, I>]) -> FactorizedModel<A, I>
    where
        A: Clone + Eq + Hash,
        I: Clone + Eq + Hash,
    {
        let p = &self.params;
        let mut rng = StdRng::seed_from_u64(p.seed);
        // A negative or non-finite spread leaves the factors at zero
        let init = Normal::new(0.0, p.init_std_dev).ok();

        let mut actor_index: HashMap<A, usize> = HashMap::new();
        let mut item_index: HashMap<I, usize> = HashMap::new();
        let mut observations = Vec::with_capacity(ratings.len());
        for rating in ratings {
            let next_actor = actor_index.len();
            let a = *actor_index.entry(rating.actor.clone()).or_insert(next_actor);
            let next_item = item_index.len();
            let i = *item_index.entry(rating.item.clone()).or_insert(next_item);
            observations.push((a, i, rating.value));
        }

        let global_mean = if observations.is_empty() {
            0.0
        } else {
            observations.iter().map(|(_, _, r)| r).sum::<f64>() / observations.len() as f64
        };

        let mut actor_bias = vec![0.0; actor_index.len()];
        let mut item_bias = vec![0.0; item_index.len()];
        let mut actor_factors: Vec<Vec<f64>> = (0..actor_index.len())
            .map(|_| gaussian_vector(&mut rng, p.factors, init.as_ref()))
            .collect();
        let mut item_factors: Vec<Vec<f64>> = (0..item_index.len())
            .map(|_| gaussian_vector(&mut rng, p.factors, init.as_ref()))
            .collect();

        for _ in 0..p.epochs {
            for &(a, i, r) in &observations {
                let dot: f64 = actor_factors[a]
                    .iter()
                    .zip(&item_factors[i])
                    .map(|(x, y)| x * y)
                    .sum();
                let err = r - (global_mean + actor_bias[a] + item_bias[i] + dot);

                actor_bias[a] += p.learning_rate * (err - p.regularization * actor_bias[a]);
                item_bias[i] += p.learning_rate * (err - p.regularization * item_bias[i]);

                for f in 0..p.factors {
                    let pf = actor_factors[a][f];
                    let qf = item_factors[i][f];
                    actor_factors[a][f] += p.learning_rate * (err * qf - p.regularization * pf);
                    item_factors[i][f] += p.learning_rate * (err * pf - p.regularization * qf);
                }
            }
        }

        FactorizedModel {
            global_mean,
            actor_index,
            item_index,
            actor_bias,
            item_bias,
            actor_factors,
            item_factors,
            rating_min: p.rating_min,
            rating_max: p.rating_max,
        }
    }
}

impl<A, I> RatingModel<A, I> for FactorizedModel<A, I>
where
    A: Eq + Hash,
    I: Eq + Hash,
{
    fn predict(&self, actor: &A, item: &I) -> f64 {
        let a = self.actor_index.get(actor).copied();
        let i = self.item_index.get(item).copied();

        let mut estimate = self.global_mean;
        if let Some(a) = a {
            estimate += self.actor_bias[a];
        }
        if let Some(i) = i {
            estimate += self.item_bias[i];
        }
        if let (Some(a), Some(i)) = (a, i) {
            estimate += self.actor_factors[a]
                .iter()
                .zip(&self.item_factors[i])
                .map(|(x, y)| x * y)
                .sum::<f64>();
        }

        estimate.clamp(self.rating_min, self.rating_max)
    }
}

fn gaussian_vector(rng: &mut StdRng, len: usize, init: Option<&Normal<f64>>) -> Vec<f64> {
    match init {
        Some(normal) => (0..len).map(|_| normal.sample(rng)).collect(),
        None => vec![0.0; len],
    }
}
