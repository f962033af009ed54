//! End-to-end behaviour of the search on the reference student record.

use gpa_planner::ga::{operators, PlannerConfig, SearchEngine, Solution};
use gpa_planner::{CoursePlan, StudentProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn engine(population_size: usize, generations: usize, seed: u64) -> SearchEngine {
    let config = PlannerConfig::new(population_size, generations).with_seed(seed);
    SearchEngine::new(StudentProfile::sample(), config).unwrap()
}

#[test]
fn test_small_run_returns_valid_solution() {
    let mut search = engine(10, 5, 42);
    let best = search.run().unwrap();
    assert_eq!(best.data().len(), 22);
    assert!(best.fitness().unwrap() >= 0.0);
}

#[test]
fn test_selection_returns_two_thirds_of_population() {
    let mut search = engine(10, 5, 42);
    search.generate_initial_population();
    assert_eq!(search.population().len(), 10);

    let selected = search.select().unwrap();
    assert_eq!(selected.len(), 6);
    assert!(selected.iter().all(|s| s.data().len() == 22));
}

#[test]
fn test_offspring_join_population() {
    let mut search = engine(10, 5, 42);
    search.generate_initial_population();
    let selected = search.select().unwrap();
    let offspring = search.reproduce(&selected).unwrap();
    let genes: Vec<Vec<u8>> = offspring.iter().map(|o| o.data().to_vec()).collect();

    search.replace(offspring).unwrap();
    assert_eq!(search.population().len(), 10);
    for g in &genes {
        assert!(search.population().iter().any(|s| s.data() == g.as_slice()));
    }
}

#[test]
fn test_reproduction_of_known_parents() {
    let c1 = Solution::new(vec![
        0, 1, 1, 2, 0, 1, 1, 1, 0, 3, 1, 1, 0, 3, 1, 1, 1, 2, 0, 6, 1, 2,
    ])
    .unwrap();
    let c2 = Solution::new(vec![
        0, 2, 0, 6, 0, 1, 0, 1, 0, 3, 0, 4, 1, 2, 0, 4, 1, 3, 1, 4, 1, 5,
    ])
    .unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let mut differs = false;
    for _ in 0..50 {
        let c3 = operators::reproduce(&c1, &c2, &mut rng).unwrap();
        assert_eq!(c3.data().len(), 22);
        differs |= c3.data() != c1.data() && c3.data() != c2.data();
    }
    assert!(differs);
}

#[test]
fn test_population_size_is_invariant() {
    let mut search = engine(12, 1, 9);
    search.generate_initial_population();
    for _ in 0..25 {
        let parents = search.select().unwrap();
        let offspring = search.reproduce(&parents).unwrap();
        search.replace(offspring).unwrap();
        assert_eq!(search.population().len(), 12);
        assert!(search.population().iter().all(|s| s.data().len() == 22));
    }
}

#[test]
fn test_best_plan_respects_constraints() {
    let profile = StudentProfile::sample();
    let config = PlannerConfig::new(60, 150).with_seed(2024);
    let mut search = SearchEngine::new(profile.clone(), config).unwrap();
    let best = search.run().unwrap();
    let fitness = best.fitness().unwrap();

    let plan = CoursePlan::from_solution(&best, &profile).unwrap();
    if fitness > 0.0 {
        assert!(plan.feasible);
        assert!((16.0..=20.0).contains(&plan.total_credits));
        assert!(plan.projected_cgpa >= 3.7);
        assert!((plan.projected_cgpa - fitness).abs() < 1e-9);
    } else {
        assert!(!plan.feasible);
    }
}

#[test]
fn test_relaxed_target_finds_feasible_plan() {
    let profile = StudentProfile::sample().with_target_cgpa(3.2);
    let config = PlannerConfig::new(40, 60).with_seed(5);
    let mut search = SearchEngine::new(profile.clone(), config).unwrap();
    let best = search.run().unwrap();

    let plan = CoursePlan::from_solution(&best, &profile).unwrap();
    assert!(plan.feasible, "no feasible plan:\n{plan}");
    assert!(plan.projected_cgpa >= 3.2);
    assert!(search.history().last().unwrap().feasible > 0);
}

#[test]
fn test_exploration_log_is_not_the_result() {
    let mut search = engine(10, 5, 1);
    let best = search.run().unwrap();

    let canonical = search.canonical_explored();
    assert!(!canonical.is_empty());
    assert!(canonical.len() <= search.explored().len());
    assert!(canonical
        .iter()
        .all(|plan| plan.len() == 22 && plan.chunks(2).all(|g| g[0] != Some(0))));
    assert_eq!(best.data().len(), 22);
}
