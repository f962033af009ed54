//! The generational search loop.
//!
//! [`SearchEngine`] owns the population and drives each generation:
//! rank and sample parents → cross over pairs and mutate the population →
//! replace the worst-ranked slice with the offspring.

use super::config::PlannerConfig;
use super::explore::{canonicalize_explored, CanonicalPlan};
use super::operators;
use super::selection::{normalize, RouletteWheel};
use super::solution::Solution;
use crate::error::{PlannerError, Result};
use crate::profile::StudentProfile;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Population summary taken when a generation is ranked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generations completed before this ranking.
    pub generation: usize,
    pub best_fitness: f64,
    pub worst_fitness: f64,
    pub mean_fitness: f64,
    /// Individuals with non-zero fitness.
    pub feasible: usize,
}

/// Genetic search over course/grade plans.
///
/// # Usage
///
/// ```
/// use gpa_planner::ga::{PlannerConfig, SearchEngine};
/// use gpa_planner::StudentProfile;
///
/// let config = PlannerConfig::new(10, 5).with_seed(42);
/// let mut engine = SearchEngine::new(StudentProfile::sample(), config).unwrap();
/// let best = engine.run().unwrap();
/// assert_eq!(best.data().len(), 22);
/// assert!(best.fitness().unwrap() >= 0.0);
/// ```
///
/// The individual steps (`select`, `reproduce`, `replace`) are public so a
/// host can drive generations one at a time.
#[derive(Debug)]
pub struct SearchEngine<R: Rng = StdRng> {
    profile: StudentProfile,
    config: PlannerConfig,
    population: Vec<Solution>,
    generation: usize,
    ranked: bool,
    explored: Vec<Vec<u8>>,
    history: Vec<GenerationStats>,
    rng: R,
}

impl SearchEngine<StdRng> {
    /// Creates an engine with a `StdRng` seeded from `config.seed`, or from
    /// a random seed when unset.
    pub fn new(profile: StudentProfile, config: PlannerConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_rng(profile, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SearchEngine<R> {
    /// Creates an engine drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn with_rng(profile: StudentProfile, config: PlannerConfig, rng: R) -> Result<Self> {
        config.validate()?;
        profile.validate()?;
        Ok(Self {
            profile,
            population: Vec::with_capacity(config.population_size),
            config,
            generation: 0,
            ranked: false,
            explored: Vec::new(),
            history: Vec::new(),
            rng,
        })
    }

    pub fn profile(&self) -> &StudentProfile {
        &self.profile
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn population_size(&self) -> usize {
        self.config.population_size
    }

    pub fn max_generations(&self) -> usize {
        self.config.max_generations
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current population. After [`select`](Self::select) it is in rank
    /// order, best first.
    pub fn population(&self) -> &[Solution] {
        &self.population
    }

    /// Per-generation statistics, one entry per call to `select`.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Genes of every parent sampled during [`evolve`](Self::evolve), in
    /// sampling order, duplicates included.
    pub fn explored(&self) -> &[Vec<u8>] {
        &self.explored
    }

    /// Distinct effective plans among the sampled parents.
    ///
    /// This is a by-product of the run; [`run`](Self::run) returns only the
    /// best individual.
    pub fn canonical_explored(&self) -> BTreeSet<CanonicalPlan> {
        canonicalize_explored(&self.explored)
    }

    /// Fills the population with `population_size` random solutions.
    pub fn generate_initial_population(&mut self) {
        let profile = &self.profile;
        let rng = &mut self.rng;
        self.population = (0..self.config.population_size)
            .map(|_| operators::seed(profile, rng))
            .collect();
        self.ranked = false;
    }

    /// Replaces the population with caller-supplied solutions.
    ///
    /// # Errors
    /// - [`PlannerError::InvalidConfig`] if the count differs from
    ///   `population_size`.
    /// - [`PlannerError::CourseCountMismatch`] if a solution encodes a
    ///   different number of courses than the profile.
    pub fn set_population(&mut self, population: Vec<Solution>) -> Result<()> {
        if population.len() != self.config.population_size {
            return Err(PlannerError::InvalidConfig(format!(
                "expected {} solutions, got {}",
                self.config.population_size,
                population.len()
            )));
        }
        self.check_course_count(&population)?;
        self.population = population;
        self.ranked = false;
        Ok(())
    }

    /// Ranks the population and samples `floor(2 * population_size / 3)`
    /// parents with replacement.
    ///
    /// The population is stably sorted by descending fitness and each
    /// individual receives its min-max normalized fitness, which both
    /// weights the roulette wheel and sets its mutation rate for this
    /// generation. The returned parents are copies.
    ///
    /// # Errors
    /// [`PlannerError::EmptyPopulation`] if there is nothing to select from.
    pub fn select(&mut self) -> Result<Vec<Solution>> {
        if self.population.is_empty() {
            return Err(PlannerError::EmptyPopulation);
        }

        evaluate_population(&self.profile, &mut self.population)?;
        self.population
            .sort_by(|a, b| score(b).total_cmp(&score(a)));

        let fitnesses: Vec<f64> = self.population.iter().map(score).collect();
        let normalized = normalize(&fitnesses);
        for (solution, &n) in self.population.iter_mut().zip(&normalized) {
            solution.set_normalized_fitness(n);
        }
        self.ranked = true;
        self.record_stats(&fitnesses);

        let wheel = RouletteWheel::new(normalized);
        let count = self.config.parent_count();
        let mut parents = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = wheel.spin(&mut self.rng)?;
            parents.push(self.population[idx].clone());
        }
        Ok(parents)
    }

    /// Crosses consecutive parent pairs and mutates the current population.
    ///
    /// Parents `(0, 1), (2, 3), ...` each produce one child; an odd
    /// trailing parent is dropped. Mutation sweeps the whole population,
    /// not the parents, and only touches individuals ranked by the latest
    /// [`select`](Self::select). The ranking's normalized fitness is
    /// consumed by the sweep.
    ///
    /// # Errors
    /// [`PlannerError::MismatchedParentLength`] if a pair differs in length.
    pub fn reproduce(&mut self, parents: &[Solution]) -> Result<Vec<Solution>> {
        let rng = &mut self.rng;
        let offspring = parents
            .chunks_exact(2)
            .map(|pair| operators::reproduce(&pair[0], &pair[1], rng))
            .collect::<Result<Vec<_>>>()?;

        let mut mutated = 0usize;
        for individual in self.population.iter_mut() {
            if operators::mutate(individual, &self.profile, &mut self.rng) {
                mutated += 1;
            }
            individual.clear_normalized_fitness();
        }

        debug!(
            parents = parents.len(),
            offspring = offspring.len(),
            mutated,
            "reproduced"
        );
        Ok(offspring)
    }

    /// Replaces the worst-ranked `offspring.len()` individuals.
    ///
    /// Expects the population in the descending-fitness order left by
    /// [`select`](Self::select); the leading
    /// `population_size - offspring.len()` individuals survive unchanged.
    ///
    /// # Errors
    /// - [`PlannerError::EmptyPopulation`] on an empty population.
    /// - [`PlannerError::PopulationNotRanked`] if `select` has not run since
    ///   the population last changed.
    /// - [`PlannerError::OffspringOverflow`] if there are more offspring
    ///   than individuals.
    /// - [`PlannerError::CourseCountMismatch`] if an offspring does not
    ///   match the profile.
    pub fn replace(&mut self, offspring: Vec<Solution>) -> Result<()> {
        if self.population.is_empty() {
            return Err(PlannerError::EmptyPopulation);
        }
        if !self.ranked {
            return Err(PlannerError::PopulationNotRanked);
        }
        if offspring.len() > self.population.len() {
            return Err(PlannerError::OffspringOverflow {
                offspring: offspring.len(),
                population: self.population.len(),
            });
        }
        self.check_course_count(&offspring)?;

        let survivors = self.population.len() - offspring.len();
        self.population.truncate(survivors);
        self.population.extend(offspring);
        self.ranked = false;
        Ok(())
    }

    /// Returns the fittest individual, evaluating any stale fitness first.
    ///
    /// On ties the lowest-index individual wins.
    ///
    /// # Errors
    /// [`PlannerError::EmptyPopulation`] if there is no population.
    pub fn best_solution(&mut self) -> Result<&Solution> {
        if self.population.is_empty() {
            return Err(PlannerError::EmptyPopulation);
        }
        evaluate_population(&self.profile, &mut self.population)?;

        let mut best = 0;
        for (i, solution) in self.population.iter().enumerate().skip(1) {
            if score(solution) > score(&self.population[best]) {
                best = i;
            }
        }
        Ok(&self.population[best])
    }

    /// Seeds a fresh population and runs `max_generations` generations.
    ///
    /// Returns the best individual of the final population. The exploration
    /// log and statistics of any earlier run are discarded.
    pub fn run(&mut self) -> Result<Solution> {
        info!(
            population_size = self.config.population_size,
            max_generations = self.config.max_generations,
            courses = self.profile.course_count(),
            "starting search"
        );
        self.generation = 0;
        self.explored.clear();
        self.history.clear();
        self.generate_initial_population();
        self.evolve()
    }

    /// Runs `max_generations` generations on the current population.
    ///
    /// Each generation selects parents, logs their genes, reproduces, and
    /// replaces the worst-ranked individuals.
    pub fn evolve(&mut self) -> Result<Solution> {
        if self.population.is_empty() {
            return Err(PlannerError::EmptyPopulation);
        }

        for _ in 0..self.config.max_generations {
            let parents = self.select()?;
            self.explored
                .extend(parents.iter().map(|p| p.data().to_vec()));
            let offspring = self.reproduce(&parents)?;
            self.replace(offspring)?;
            self.generation += 1;
        }

        let best = self.best_solution()?.clone();
        info!(
            generations = self.generation,
            best_fitness = score(&best),
            explored = self.explored.len(),
            "search finished"
        );
        Ok(best)
    }

    fn record_stats(&mut self, fitnesses: &[f64]) {
        let n = fitnesses.len().max(1) as f64;
        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: fitnesses.first().copied().unwrap_or(0.0),
            worst_fitness: fitnesses.last().copied().unwrap_or(0.0),
            mean_fitness: fitnesses.iter().sum::<f64>() / n,
            feasible: fitnesses.iter().filter(|&&f| f > 0.0).count(),
        };
        debug!(
            generation = stats.generation,
            best = stats.best_fitness,
            worst = stats.worst_fitness,
            mean = stats.mean_fitness,
            feasible = stats.feasible,
            "ranked population"
        );
        self.history.push(stats);
    }

    fn check_course_count(&self, solutions: &[Solution]) -> Result<()> {
        let expected = self.profile.course_count();
        match solutions.iter().find(|s| s.course_count() != expected) {
            Some(s) => Err(PlannerError::CourseCountMismatch {
                expected,
                found: s.course_count(),
            }),
            None => Ok(()),
        }
    }
}

/// Evaluates every individual with a stale fitness.
///
/// Chromosomes with invalid genes are scored zero rather than aborting the
/// run.
fn evaluate_population(profile: &StudentProfile, population: &mut [Solution]) -> Result<()> {
    for (i, solution) in population.iter_mut().enumerate() {
        match solution.evaluate(profile) {
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {
                warn!(index = i, error = %err, "scoring invalid chromosome as zero");
                solution.assign_fitness(0.0);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Cached fitness; only meaningful after `evaluate_population`.
fn score(solution: &Solution) -> f64 {
    solution.fitness().unwrap_or(0.0)
}

// ============================================================================
// Tests
// ============================================================================
