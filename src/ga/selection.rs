//! Fitness normalization and roulette-wheel sampling.
//!
//! Each generation the engine ranks the population, rescales fitness to
//! `[0, 1]` with min-max scaling, and samples parents with probability
//! proportional to the rescaled value.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)

use crate::error::{PlannerError, Result};
use rand::Rng;

/// Min-max scales `fitnesses` to `[0, 1]`.
///
/// The best value maps to 1 and the worst to 0. When every value is equal
/// there is no spread to scale, and every individual gets 1.
pub fn normalize(fitnesses: &[f64]) -> Vec<f64> {
    let best = fitnesses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let worst = fitnesses.iter().copied().fold(f64::INFINITY, f64::min);
    if best > worst {
        let spread = best - worst;
        fitnesses.iter().map(|&f| (f - worst) / spread).collect()
    } else {
        vec![1.0; fitnesses.len()]
    }
}

/// Fitness-proportionate sampler over a fixed list of weights.
///
/// Sampling is with replacement: the same slot can be drawn repeatedly.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    weights: Vec<f64>,
    total: f64,
}

impl RouletteWheel {
    pub fn new(weights: Vec<f64>) -> Self {
        let total = weights.iter().sum();
        Self { weights, total }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Draws a threshold in `[0, total)` and returns the first slot whose
    /// running sum reaches it.
    ///
    /// # Errors
    /// - [`PlannerError::EmptyPopulation`] if there are no slots.
    /// - [`PlannerError::SelectionExhausted`] if rounding leaves the running
    ///   sum short of the threshold.
    pub fn try_spin<R: Rng>(&self, rng: &mut R) -> Result<usize> {
        if self.weights.is_empty() {
            return Err(PlannerError::EmptyPopulation);
        }
        let threshold = rng.random::<f64>() * self.total;
        let mut cumulative = 0.0;
        for (i, &w) in self.weights.iter().enumerate() {
            cumulative += w;
            if cumulative >= threshold {
                return Ok(i);
            }
        }
        Err(PlannerError::SelectionExhausted { threshold })
    }

    /// Like [`try_spin`](Self::try_spin), but an exhausted scan falls back
    /// to the last slot.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> Result<usize> {
        match self.try_spin(rng) {
            Err(PlannerError::SelectionExhausted { threshold }) => {
                tracing::trace!(threshold, total = self.total, "roulette fell back to last slot");
                Ok(self.weights.len() - 1)
            }
            other => other,
        }
    }
}
