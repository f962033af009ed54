//! Genetic search over course selections and grade targets.
//!
//! A fixed-shape, single-threaded, single-objective genetic algorithm:
//! roulette-wheel selection over min-max normalized fitness, independent
//! one-point crossover of the inclusion and grade vectors, fitness-scaled
//! single-locus mutation, and elitist truncation replacement.
//!
//! # Key Types
//!
//! - [`Solution`]: the chromosome with its fitness cache
//! - [`PlannerConfig`]: population size, generation count, seed
//! - [`SearchEngine`]: owns the population and runs the generational loop
//!
//! # Submodules
//!
//! - [`operators`]: `seed`, `reproduce`, `mutate`
//! - [`selection`]: normalization and the roulette wheel
//! - [`explore`]: canonical form of the explored search space
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod explore;
pub mod operators;
mod runner;
pub mod selection;
mod solution;

pub use config::PlannerConfig;
pub use explore::{canonicalize_explored, CanonicalPlan};
pub use runner::{GenerationStats, SearchEngine};
pub use solution::Solution;
