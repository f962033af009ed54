//! Genetic operators for course/grade chromosomes.
//!
//! - [`seed`]: uniform random chromosome for the initial population
//! - [`reproduce`]: independent one-point crossover of the flag and grade
//!   vectors
//! - [`mutate`]: fitness-scaled single-locus perturbation
//!
//! All operators draw from the caller's generator, so a seeded generator
//! makes them fully reproducible.

use super::solution::Solution;
use crate::error::{PlannerError, Result};
use crate::profile::StudentProfile;
use rand::Rng;

/// Mutation probability of the least fit individual of a generation.
pub const MUTATION_SCALE: f64 = 0.4;

/// Creates a random solution for `profile`.
///
/// Each course gets a uniform inclusion flag in `{0, 1}` and a uniform grade
/// code over the whole grade scale.
pub fn seed<R: Rng>(profile: &StudentProfile, rng: &mut R) -> Solution {
    let max_code = profile.grade_scale.max_code();
    let data = (0..profile.course_count())
        .flat_map(|_| [rng.random_range(0..=1u8), rng.random_range(1..=max_code)])
        .collect();
    Solution::from_data(data)
}

/// One-point crossover with independent cut points for flags and grades.
///
/// Both cut points are drawn from `[1, N-1]`, so the child always takes at
/// least one locus from each parent in both vectors. Single-course
/// chromosomes have no interior cut point; the child is then a copy of `a`.
///
/// # Errors
/// [`PlannerError::MismatchedParentLength`] if the parents differ in length.
pub fn reproduce<R: Rng>(a: &Solution, b: &Solution, rng: &mut R) -> Result<Solution> {
    if a.data().len() != b.data().len() {
        return Err(PlannerError::MismatchedParentLength {
            left: a.data().len(),
            right: b.data().len(),
        });
    }

    let n = a.course_count();
    if n < 2 {
        return Ok(Solution::from_data(a.data().to_vec()));
    }

    let (a_flags, a_grades) = a.split();
    let (b_flags, b_grades) = b.split();

    let flag_point = rng.random_range(1..n);
    let grade_point = rng.random_range(1..n);

    let flags = splice(&a_flags, &b_flags, flag_point);
    let grades = splice(&a_grades, &b_grades, grade_point);

    Ok(Solution::from_parts(&flags, &grades))
}

/// Perturbs one flag and one grade, with a probability that falls as the
/// solution's normalized fitness rises.
///
/// Does nothing unless the solution was ranked by the current generation's
/// selection. Returns whether the mutation fired; the fresh draws may repeat
/// the old gene values.
pub fn mutate<R: Rng>(solution: &mut Solution, profile: &StudentProfile, rng: &mut R) -> bool {
    let Some(normalized) = solution.normalized_fitness() else {
        return false;
    };
    let n = solution.course_count();
    if n == 0 || !rng.random_bool(mutation_probability(normalized)) {
        return false;
    }

    let course = rng.random_range(0..n);
    solution.set_flag(course, rng.random_range(0..=1));

    let course = rng.random_range(0..n);
    solution.set_grade(course, rng.random_range(1..=profile.grade_scale.max_code()));

    true
}

/// `(1 - normalized) * MUTATION_SCALE`, clamped to a probability.
pub fn mutation_probability(normalized: f64) -> f64 {
    ((1.0 - normalized) * MUTATION_SCALE).clamp(0.0, 1.0)
}

/// `head[..point] ++ tail[point..]`.
fn splice(head: &[u8], tail: &[u8], point: usize) -> Vec<u8> {
    head[..point].iter().chain(&tail[point..]).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn uniform(n: usize, flag: u8, grade: u8) -> Solution {
        Solution::from_data((0..n).flat_map(|_| [flag, grade]).collect())
    }

    #[test]
    fn test_seed_shape_and_domain() {
        let profile = StudentProfile::sample();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let s = seed(&profile, &mut rng);
            assert_eq!(s.data().len(), 22);
            assert!(s.fitness().is_none());
            assert!(s.normalized_fitness().is_none());
            for (flag, grade) in s.genes() {
                assert!(flag <= 1);
                assert!((1..=7).contains(&grade));
            }
        }
    }

    #[test]
    fn test_seed_reaches_every_grade() {
        let profile = StudentProfile::sample();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 8];
        for _ in 0..100 {
            for (_, grade) in seed(&profile, &mut rng).genes() {
                seen[grade as usize] = true;
            }
        }
        assert!(seen[1..].iter().all(|&s| s), "grades seen: {seen:?}");
    }

    #[test]
    fn test_reproduce_cut_points_are_interior() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = uniform(11, 0, 1);
        let b = uniform(11, 1, 7);

        for _ in 0..200 {
            let child = reproduce(&a, &b, &mut rng).unwrap();
            let (flags, grades) = child.split();
            assert_eq!(flags.len(), 11);

            // Prefix from a, suffix from b, never all of one parent.
            assert_eq!(flags[0], 0);
            assert_eq!(flags[10], 1);
            assert!(flags.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(grades[0], 1);
            assert_eq!(grades[10], 7);
            assert!(grades.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_reproduce_cut_points_are_independent() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = uniform(11, 0, 1);
        let b = uniform(11, 1, 7);

        let differs = (0..100).any(|_| {
            let (flags, grades) = reproduce(&a, &b, &mut rng).unwrap().split();
            let flag_cut = flags.iter().position(|&f| f == 1);
            let grade_cut = grades.iter().position(|&g| g == 7);
            flag_cut != grade_cut
        });
        assert!(differs, "flag and grade cut points never diverged");
    }

    #[test]
    fn test_reproduce_rejects_mismatched_parents() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = reproduce(&uniform(11, 0, 1), &uniform(10, 0, 1), &mut rng).unwrap_err();
        assert_eq!(
            err,
            PlannerError::MismatchedParentLength {
                left: 22,
                right: 20
            }
        );
    }

    #[test]
    fn test_reproduce_single_course_copies_first_parent() {
        let mut rng = StdRng::seed_from_u64(42);
        let child = reproduce(&uniform(1, 1, 2), &uniform(1, 0, 5), &mut rng).unwrap();
        assert_eq!(child.data(), &[1, 2]);
    }

    #[test]
    fn test_mutate_requires_ranking() {
        let profile = StudentProfile::sample();
        let mut rng = StdRng::seed_from_u64(42);
        let mut s = uniform(11, 0, 1);
        for _ in 0..100 {
            assert!(!mutate(&mut s, &profile, &mut rng));
        }
        assert_eq!(s.data(), uniform(11, 0, 1).data());
    }

    #[test]
    fn test_mutate_never_touches_the_best() {
        let profile = StudentProfile::sample();
        let mut rng = StdRng::seed_from_u64(42);
        let mut s = uniform(11, 0, 1);
        s.set_normalized_fitness(1.0);
        for _ in 0..100 {
            assert!(!mutate(&mut s, &profile, &mut rng));
        }
    }

    #[test]
    fn test_mutate_rate_for_the_worst() {
        let profile = StudentProfile::sample();
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = 0;
        let trials = 5000;
        for _ in 0..trials {
            let mut s = uniform(11, 0, 1);
            s.set_normalized_fitness(0.0);
            if mutate(&mut s, &profile, &mut rng) {
                hits += 1;
            }
        }
        // Expected 0.4 * 5000 = 2000.
        assert!((1700..2300).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_mutate_changes_at_most_one_flag_and_one_grade() {
        let profile = StudentProfile::sample();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let original = uniform(11, 0, 1);
            let mut s = original.clone();
            s.set_normalized_fitness(0.0);
            s.assign_fitness(3.0);
            if mutate(&mut s, &profile, &mut rng) {
                assert!(!s.is_evaluated());
                let (f0, g0) = original.split();
                let (f1, g1) = s.split();
                assert!(f0.iter().zip(&f1).filter(|(a, b)| a != b).count() <= 1);
                assert!(g0.iter().zip(&g1).filter(|(a, b)| a != b).count() <= 1);
                assert!(g1.iter().all(|g| (1..=7).contains(g)));
            }
        }
    }

    #[test]
    fn test_mutation_probability() {
        assert!((mutation_probability(0.0) - 0.4).abs() < 1e-12);
        assert!((mutation_probability(0.5) - 0.2).abs() < 1e-12);
        assert_eq!(mutation_probability(1.0), 0.0);
        assert_eq!(mutation_probability(2.0), 0.0);
    }
}
