//! The chromosome.
//!
//! A [`Solution`] is a flat vector of `2N` genes: for course `i`, gene `2i`
//! is the inclusion flag (0 or 1) and gene `2i + 1` the target grade code.
//! Each solution carries two derived values:
//!
//! - a memoized fitness, filled by [`Solution::evaluate`] and cleared by
//!   [`Solution::invalidate`] whenever the genes change;
//! - a normalized fitness in `[0, 1]`, assigned by the engine during
//!   selection and meaningful only within that generation.

use crate::error::{PlannerError, Result};
use crate::profile::StudentProfile;

/// One candidate course/grade assignment.
#[derive(Debug, Clone)]
pub struct Solution {
    data: Vec<u8>,
    fitness: Option<f64>,
    normalized_fitness: Option<f64>,
}

impl Solution {
    /// Wraps raw chromosome data.
    ///
    /// Returns [`PlannerError::MalformedChromosome`] if the length is odd.
    /// Gene values are checked later, on evaluation.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.len() % 2 != 0 {
            return Err(PlannerError::MalformedChromosome(data.len()));
        }
        Ok(Self::from_data(data))
    }

    pub(crate) fn from_data(data: Vec<u8>) -> Self {
        Self {
            data,
            fitness: None,
            normalized_fitness: None,
        }
    }

    /// Re-interleaves separate flag and grade vectors.
    pub(crate) fn from_parts(flags: &[u8], grades: &[u8]) -> Self {
        debug_assert_eq!(flags.len(), grades.len());
        let data = flags
            .iter()
            .zip(grades)
            .flat_map(|(&f, &g)| [f, g])
            .collect();
        Self::from_data(data)
    }

    /// Raw genes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of courses encoded (`N`).
    pub fn course_count(&self) -> usize {
        self.data.len() / 2
    }

    /// `(inclusion flag, grade code)` pairs, one per course.
    pub fn genes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.data.chunks_exact(2).map(|g| (g[0], g[1]))
    }

    /// Splits into the inclusion vector and the grade vector.
    pub fn split(&self) -> (Vec<u8>, Vec<u8>) {
        self.genes().unzip()
    }

    /// Whether course `i` is included.
    pub fn includes(&self, course: usize) -> bool {
        self.data.get(2 * course) == Some(&1)
    }

    /// Cached fitness, if evaluated since the last change.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Returns the fitness against `profile`, computing and caching it if
    /// unset.
    pub fn evaluate(&mut self, profile: &StudentProfile) -> Result<f64> {
        if let Some(f) = self.fitness {
            return Ok(f);
        }
        let f = profile.fitness_of(&self.data)?;
        self.fitness = Some(f);
        Ok(f)
    }

    /// Drops the cached fitness.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Whether the fitness cache is filled.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Normalized fitness from the current generation's selection, if any.
    pub fn normalized_fitness(&self) -> Option<f64> {
        self.normalized_fitness
    }

    /// Caches a fitness without evaluating. Used to score rejected
    /// chromosomes as zero.
    pub(crate) fn assign_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub(crate) fn set_normalized_fitness(&mut self, value: f64) {
        self.normalized_fitness = Some(value);
    }

    pub(crate) fn clear_normalized_fitness(&mut self) {
        self.normalized_fitness = None;
    }

    /// Overwrites the inclusion flag of `course` and drops the cache.
    pub(crate) fn set_flag(&mut self, course: usize, flag: u8) {
        self.data[2 * course] = flag;
        self.invalidate();
    }

    /// Overwrites the grade code of `course` and drops the cache.
    pub(crate) fn set_grade(&mut self, course: usize, code: u8) {
        self.data[2 * course + 1] = code;
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_odd_length() {
        assert_eq!(
            Solution::new(vec![1, 2, 3]).unwrap_err(),
            PlannerError::MalformedChromosome(3)
        );
        assert!(Solution::new(vec![]).is_ok());
    }

    #[test]
    fn test_split_and_rejoin() {
        let s = Solution::new(vec![0, 1, 1, 2, 0, 6]).unwrap();
        let (flags, grades) = s.split();
        assert_eq!(flags, vec![0, 1, 0]);
        assert_eq!(grades, vec![1, 2, 6]);
        assert_eq!(Solution::from_parts(&flags, &grades).data(), s.data());
        assert_eq!(s.course_count(), 3);
        assert!(s.includes(1));
        assert!(!s.includes(2));
        assert!(!s.includes(7));
    }

    #[test]
    fn test_fitness_cache_lifecycle() {
        let profile = StudentProfile::sample();
        let data = vec![
            0, 1, 0, 1, 0, 1, 0, 1, 1, 1, 0, 1, 1, 2, 1, 1, 1, 3, 0, 1, 0, 1,
        ];
        let mut s = Solution::new(data).unwrap();
        assert!(s.fitness().is_none());

        let f = s.evaluate(&profile).unwrap();
        assert!((f - 3.7).abs() < 1e-9);
        assert_eq!(s.fitness(), Some(f));

        // Dropping Programming I leaves 12 credits, under the band.
        s.set_flag(4, 0);
        assert!(!s.is_evaluated());
        assert_eq!(s.evaluate(&profile).unwrap(), 0.0);
    }

    #[test]
    fn test_cache_is_not_recomputed() {
        let profile = StudentProfile::sample();
        let mut s = Solution::from_data((0..11).flat_map(|_| [0, 1]).collect());
        s.assign_fitness(2.5);
        assert_eq!(s.evaluate(&profile).unwrap(), 2.5);
        s.invalidate();
        assert_eq!(s.evaluate(&profile).unwrap(), 0.0);
    }

    #[test]
    fn test_evaluate_propagates_invalid_genes() {
        let profile = StudentProfile::sample();
        let mut data: Vec<u8> = (0..11).flat_map(|_| [0, 1]).collect();
        data[1] = 0;
        let mut s = Solution::new(data).unwrap();
        assert_eq!(
            s.evaluate(&profile),
            Err(PlannerError::InvalidGradeCode { course: 0, code: 0 })
        );
        assert!(!s.is_evaluated());
    }

    #[test]
    fn test_set_grade_invalidates() {
        let mut s = Solution::from_data(vec![1, 1, 0, 1]);
        s.assign_fitness(1.0);
        s.set_grade(1, 5);
        assert_eq!(s.data(), &[1, 1, 0, 5]);
        assert!(!s.is_evaluated());
    }
}
