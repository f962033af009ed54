//! Student record and grading parameters.
//!
//! A [`StudentProfile`] is the immutable parameter set the search is run
//! against: the candidate course catalog, the student's prior academic
//! record, the credit-load band for the coming term, the CGPA target, and
//! the [`GradeScale`] mapping grade codes to grade points.
//!
//! The host application is responsible for building the profile (from a
//! registrar database, a form, a JSON document...). Nothing here reads
//! global state.

use crate::error::{PlannerError, Result};

/// A candidate course with its credit weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    /// Display name.
    pub name: String,
    /// Credit hours. Must be positive.
    pub credits: f64,
}

impl Course {
    pub fn new(name: impl Into<String>, credits: f64) -> Self {
        Self {
            name: name.into(),
            credits,
        }
    }
}

/// One tier of a grade scale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grade {
    /// Code stored in the chromosome (1-based).
    pub code: u8,
    /// Letter grade, e.g. `"A-"`.
    pub letter: String,
    /// Grade points awarded per credit.
    pub points: f64,
}

/// Maps grade codes `1..=max_code` to letter grades and grade points.
///
/// Code 1 is the best grade. Codes are contiguous; anything outside
/// `1..=max_code` is rejected as [`PlannerError::InvalidGradeCode`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradeScale {
    grades: Vec<Grade>,
}

impl GradeScale {
    /// Builds a scale from `(letter, points)` tiers, best first.
    ///
    /// Tiers receive codes `1, 2, ...` in order.
    pub fn new<S: Into<String>>(tiers: impl IntoIterator<Item = (S, f64)>) -> Result<Self> {
        let scale = Self::from_tiers(tiers);
        scale.validate()?;
        Ok(scale)
    }

    /// The seven-tier scale used by the planner: A (4.00) down to C (2.00).
    pub fn standard() -> Self {
        Self::from_tiers([
            ("A", 4.00),
            ("A-", 3.70),
            ("B+", 3.30),
            ("B", 3.00),
            ("B-", 2.70),
            ("C+", 2.30),
            ("C", 2.00),
        ])
    }

    fn from_tiers<S: Into<String>>(tiers: impl IntoIterator<Item = (S, f64)>) -> Self {
        let grades = tiers
            .into_iter()
            .enumerate()
            .map(|(i, (letter, points))| Grade {
                code: u8::try_from(i + 1).unwrap_or(u8::MAX),
                letter: letter.into(),
                points,
            })
            .collect();
        Self { grades }
    }

    /// Checks that the scale is usable by the search.
    ///
    /// A scale built with [`new`](Self::new) always passes. One loaded
    /// through `serde` may not: it needs between 1 and 255 tiers, codes
    /// `1, 2, ...` in order, and finite non-negative points.
    pub fn validate(&self) -> Result<()> {
        if self.grades.is_empty() {
            return Err(PlannerError::InvalidConfig(
                "grade scale must have at least one tier".into(),
            ));
        }
        if self.grades.len() > u8::MAX as usize {
            return Err(PlannerError::InvalidConfig(format!(
                "grade scale has {} tiers, at most {} are supported",
                self.grades.len(),
                u8::MAX
            )));
        }
        for (i, g) in self.grades.iter().enumerate() {
            if g.code as usize != i + 1 {
                return Err(PlannerError::InvalidConfig(format!(
                    "grade {} at position {} has code {}, expected {}",
                    g.letter,
                    i,
                    g.code,
                    i + 1
                )));
            }
            if !g.points.is_finite() || g.points < 0.0 {
                return Err(PlannerError::InvalidConfig(format!(
                    "grade {} has invalid points {}",
                    g.letter, g.points
                )));
            }
        }
        Ok(())
    }

    /// Looks up a grade tier by code.
    pub fn grade(&self, code: u8) -> Option<&Grade> {
        (code as usize)
            .checked_sub(1)
            .and_then(|i| self.grades.get(i))
            .filter(|g| g.code == code)
    }

    /// Grade points for `code`, or `None` if the code is off the scale.
    pub fn points(&self, code: u8) -> Option<f64> {
        self.grade(code).map(|g| g.points)
    }

    /// Highest valid code (the worst grade).
    ///
    /// Saturates at 255 for an oversized scale, which
    /// [`validate`](Self::validate) rejects.
    pub fn max_code(&self) -> u8 {
        u8::try_from(self.grades.len()).unwrap_or(u8::MAX)
    }

    /// Highest grade points on the scale.
    pub fn top_points(&self) -> f64 {
        self.grades
            .iter()
            .map(|g| g.points)
            .fold(0.0, f64::max)
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::standard()
    }
}

/// Credit load and projected CGPA of one chromosome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Credits of the included courses.
    pub new_credits: f64,
    /// `Σ credits × points` over the included courses.
    pub weighted_points: f64,
    /// Projected CGPA, rounded to two decimals.
    pub cgpa: f64,
}

/// The fixed parameter set a search runs against.
///
/// # Examples
///
/// ```
/// use gpa_planner::{Course, StudentProfile};
///
/// let profile = StudentProfile::new(vec![
///     Course::new("Programming I", 5.0),
///     Course::new("Operating Systems", 4.0),
/// ])
/// .with_prior_record(58.0, 16.0)
/// .with_credit_range(4.0, 9.0)
/// .with_target_cgpa(3.5);
///
/// assert!(profile.validate().is_ok());
/// assert_eq!(profile.course_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StudentProfile {
    /// Candidate courses. Their credits are the chromosome's credit weights.
    pub courses: Vec<Course>,

    /// Grade points already earned (`Σ credits × points` of past terms).
    pub prior_grade_points: f64,

    /// Credits already completed.
    pub prior_credits: f64,

    /// Minimum credit load for the planned term (inclusive).
    pub min_credits: f64,

    /// Maximum credit load for the planned term (inclusive).
    pub max_credits: f64,

    /// Plans projecting below this CGPA score zero fitness.
    pub target_cgpa: f64,

    /// Grade code to grade point mapping.
    pub grade_scale: GradeScale,
}

impl StudentProfile {
    /// Creates a profile with no prior record, an unbounded credit band,
    /// zero target, and the standard grade scale.
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            prior_grade_points: 0.0,
            prior_credits: 0.0,
            min_credits: 0.0,
            max_credits: f64::INFINITY,
            target_cgpa: 0.0,
            grade_scale: GradeScale::standard(),
        }
    }

    /// The reference record of the planner: eleven courses, 58 grade points
    /// over 16 prior credits, a 16–20 credit band and a 3.70 target.
    pub fn sample() -> Self {
        let courses = [
            ("Ethnic Relations", 2.0),
            ("Principles of Information Systems", 3.0),
            ("Computer Systems & Organization", 3.0),
            ("Computing Mathematics I", 3.0),
            ("Programming I", 5.0),
            ("Islamic And Asian Civilization", 2.0),
            ("Operating Systems", 4.0),
            ("Human Computer Interaction", 4.0),
            ("Software Project Management", 4.0),
            ("Programming for Web Engineering", 4.0),
            ("Software Requirements Engineering", 3.0),
        ]
        .iter()
        .map(|&(name, credits)| Course::new(name, credits))
        .collect();

        Self::new(courses)
            .with_prior_record(58.0, 16.0)
            .with_credit_range(16.0, 20.0)
            .with_target_cgpa(3.7)
    }

    /// Sets prior grade points and completed credits.
    pub fn with_prior_record(mut self, grade_points: f64, credits: f64) -> Self {
        self.prior_grade_points = grade_points;
        self.prior_credits = credits;
        self
    }

    /// Sets the inclusive credit band for the planned term.
    pub fn with_credit_range(mut self, min: f64, max: f64) -> Self {
        self.min_credits = min;
        self.max_credits = max;
        self
    }

    pub fn with_target_cgpa(mut self, target: f64) -> Self {
        self.target_cgpa = target;
        self
    }

    pub fn with_grade_scale(mut self, scale: GradeScale) -> Self {
        self.grade_scale = scale;
        self
    }

    /// Number of candidate courses (`N`).
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Credit weight vector, in catalog order.
    pub fn credit_weights(&self) -> Vec<f64> {
        self.courses.iter().map(|c| c.credits).collect()
    }

    /// Validates the profile.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.courses.is_empty() {
            return Err(PlannerError::InvalidConfig(
                "at least one candidate course is required".into(),
            ));
        }
        if let Some(c) = self
            .courses
            .iter()
            .find(|c| !c.credits.is_finite() || c.credits <= 0.0)
        {
            return Err(PlannerError::InvalidConfig(format!(
                "course {:?} has invalid credits {}",
                c.name, c.credits
            )));
        }
        if !self.prior_grade_points.is_finite() || self.prior_grade_points < 0.0 {
            return Err(PlannerError::InvalidConfig(
                "prior_grade_points must be finite and non-negative".into(),
            ));
        }
        if !self.prior_credits.is_finite() || self.prior_credits < 0.0 {
            return Err(PlannerError::InvalidConfig(
                "prior_credits must be finite and non-negative".into(),
            ));
        }
        if self.min_credits.is_nan() || self.max_credits.is_nan() || self.min_credits < 0.0 {
            return Err(PlannerError::InvalidConfig(
                "credit range must be non-negative".into(),
            ));
        }
        if self.min_credits > self.max_credits {
            return Err(PlannerError::InvalidConfig(format!(
                "min_credits {} exceeds max_credits {}",
                self.min_credits, self.max_credits
            )));
        }
        self.grade_scale.validate()?;
        let top = self.grade_scale.top_points();
        if !(0.0..=top).contains(&self.target_cgpa) {
            return Err(PlannerError::InvalidConfig(format!(
                "target_cgpa {} outside [0, {}]",
                self.target_cgpa, top
            )));
        }
        Ok(())
    }

    /// Computes the credit load and projected CGPA encoded by `data`.
    ///
    /// `data` interleaves `(inclusion flag, grade code)` pairs, one per
    /// course. Every gene is checked, including the grade codes of excluded
    /// courses.
    pub fn project(&self, data: &[u8]) -> Result<Projection> {
        if data.len() % 2 != 0 {
            return Err(PlannerError::MalformedChromosome(data.len()));
        }
        let found = data.len() / 2;
        if found != self.courses.len() {
            return Err(PlannerError::CourseCountMismatch {
                expected: self.courses.len(),
                found,
            });
        }

        let mut new_credits = 0.0;
        let mut weighted_points = 0.0;
        for (i, (gene, course)) in data.chunks_exact(2).zip(&self.courses).enumerate() {
            let (flag, code) = (gene[0], gene[1]);
            let points = self
                .grade_scale
                .points(code)
                .ok_or(PlannerError::InvalidGradeCode { course: i, code })?;
            match flag {
                0 => {}
                1 => {
                    new_credits += course.credits;
                    weighted_points += course.credits * points;
                }
                _ => return Err(PlannerError::InvalidInclusionFlag { course: i, flag }),
            }
        }

        let total_credits = self.prior_credits + new_credits;
        let cgpa = if total_credits > 0.0 {
            round2((self.prior_grade_points + weighted_points) / total_credits)
        } else {
            0.0
        };

        Ok(Projection {
            new_credits,
            weighted_points,
            cgpa,
        })
    }

    /// Whether a projection is inside the credit band and meets the target.
    pub fn admits(&self, projection: &Projection) -> bool {
        (self.min_credits..=self.max_credits).contains(&projection.new_credits)
            && projection.cgpa >= self.target_cgpa
    }

    /// Feasibility-gated fitness: the projected CGPA when admitted, else 0.
    pub fn fitness_of(&self, data: &[u8]) -> Result<f64> {
        let projection = self.project(data)?;
        Ok(if self.admits(&projection) {
            projection.cgpa
        } else {
            0.0
        })
    }
}

/// Rounds half away from zero to two decimals.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
