//! Course and grade planning by genetic search.
//!
//! Given a student's prior record and a catalog of candidate courses, the
//! search looks for the selection of courses and target grades that
//! maximizes projected cumulative GPA while keeping the term's credit load
//! inside a band and the projection above a target.
//!
//! - [`StudentProfile`]: the fixed parameter set (catalog, prior record,
//!   credit band, target, grade scale)
//! - [`ga`]: chromosome, operators, and the [`SearchEngine`](ga::SearchEngine)
//! - [`CoursePlan`]: readable decoding of the best chromosome
//!
//! # Example
//!
//! ```
//! use gpa_planner::ga::{PlannerConfig, SearchEngine};
//! use gpa_planner::{CoursePlan, StudentProfile};
//!
//! let profile = StudentProfile::sample();
//! let config = PlannerConfig::new(30, 20).with_seed(7);
//! let mut engine = SearchEngine::new(profile.clone(), config).unwrap();
//!
//! let best = engine.run().unwrap();
//! let plan = CoursePlan::from_solution(&best, &profile).unwrap();
//! if plan.feasible {
//!     assert_eq!(plan.projected_cgpa, best.fitness().unwrap());
//! }
//! ```
//!
//! Logging goes through `tracing`; install a subscriber in the host to see
//! per-generation statistics.

pub mod error;
pub mod ga;
pub mod plan;
pub mod profile;

pub use error::{PlannerError, Result};
pub use plan::{CoursePlan, PlannedCourse};
pub use profile::{Course, Grade, GradeScale, Projection, StudentProfile};
