//! Search configuration.
//!
//! [`PlannerConfig`] holds the parameters that shape the evolutionary loop.
//! The operator rates are fixed by the algorithm and are not configurable.

use crate::error::{PlannerError, Result};

/// Configuration for the course-planning search.
///
/// # Defaults
///
/// ```
/// use gpa_planner::ga::PlannerConfig;
///
/// let config = PlannerConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use gpa_planner::ga::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Number of individuals in the population.
    ///
    /// Each generation samples `floor(2 * population_size / 3)` parents and
    /// replaces half that many of the worst-ranked individuals.
    pub population_size: usize,

    /// Number of generations to run. The search always runs them all.
    pub max_generations: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Shorthand for `default()` with the given size and generation count.
    pub fn new(population_size: usize, max_generations: usize) -> Self {
        Self {
            population_size,
            max_generations,
            seed: None,
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of parents sampled per generation.
    pub fn parent_count(&self) -> usize {
        2 * self.population_size / 3
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(PlannerError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(PlannerError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
