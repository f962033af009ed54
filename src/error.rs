//! Error taxonomy for the planner.

/// Errors raised by the planner.
///
/// Most variants are contract violations that the caller must fix. A few
/// (see [`is_recoverable`](PlannerError::is_recoverable)) are handled locally
/// by the search engine and never abort a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("grade code {code} for course {course} is not on the grade scale")]
    InvalidGradeCode { course: usize, code: u8 },

    #[error("inclusion flag {flag} for course {course} must be 0 or 1")]
    InvalidInclusionFlag { course: usize, flag: u8 },

    #[error("parents differ in length: {left} vs {right}")]
    MismatchedParentLength { left: usize, right: usize },

    #[error("chromosome length {0} is not even")]
    MalformedChromosome(usize),

    #[error("chromosome encodes {found} courses, profile lists {expected}")]
    CourseCountMismatch { expected: usize, found: usize },

    #[error("population is empty")]
    EmptyPopulation,

    #[error("roulette scan found no candidate for threshold {threshold}")]
    SelectionExhausted { threshold: f64 },

    #[error("population must be ranked by select() before replacement")]
    PopulationNotRanked,

    #[error("{offspring} offspring cannot replace a population of {population}")]
    OffspringOverflow { offspring: usize, population: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlannerError {
    /// Whether the engine can absorb this error without aborting the run.
    ///
    /// Invalid genes score zero fitness; an exhausted roulette scan falls
    /// back to the last individual.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlannerError::InvalidGradeCode { .. }
                | PlannerError::InvalidInclusionFlag { .. }
                | PlannerError::SelectionExhausted { .. }
        )
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PlannerError>;
