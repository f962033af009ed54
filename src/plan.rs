//! Human-readable decoding of a chromosome.

use crate::error::{PlannerError, Result};
use crate::ga::Solution;
use crate::profile::StudentProfile;
use std::fmt;

/// A course picked by a plan, with its target grade.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedCourse {
    pub name: String,
    pub credits: f64,
    pub grade: String,
    pub grade_points: f64,
}

/// The course selection and grade targets encoded by a [`Solution`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoursePlan {
    /// Included courses, in catalog order.
    pub courses: Vec<PlannedCourse>,
    pub total_credits: f64,
    pub projected_cgpa: f64,
    /// Whether the plan sits inside the credit band and meets the target.
    ///
    /// Usually the same as non-zero fitness. A plan projecting a CGPA of 0
    /// against a zero target is feasible yet scores 0.
    pub feasible: bool,
}

impl CoursePlan {
    /// Decodes `solution` against `profile`.
    pub fn from_solution(solution: &Solution, profile: &StudentProfile) -> Result<Self> {
        let projection = profile.project(solution.data())?;

        let mut courses = Vec::new();
        for (i, ((flag, code), course)) in solution.genes().zip(&profile.courses).enumerate() {
            if flag != 1 {
                continue;
            }
            let grade = profile
                .grade_scale
                .grade(code)
                .ok_or(PlannerError::InvalidGradeCode { course: i, code })?;
            courses.push(PlannedCourse {
                name: course.name.clone(),
                credits: course.credits,
                grade: grade.letter.clone(),
                grade_points: grade.points,
            });
        }

        Ok(Self {
            courses,
            total_credits: projection.new_credits,
            projected_cgpa: projection.cgpa,
            feasible: profile.admits(&projection),
        })
    }
}

impl fmt::Display for CoursePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .courses
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Course".len());

        writeln!(f, "{:<width$}  Credits  Grade", "Course")?;
        for c in &self.courses {
            writeln!(f, "{:<width$}  {:>7}  {:<5}", c.name, c.credits, c.grade)?;
        }
        writeln!(f, "Total credits: {}", self.total_credits)?;
        write!(f, "Projected CGPA: {:.2}", self.projected_cgpa)?;
        if !self.feasible {
            write!(f, " (infeasible)")?;
        }
        Ok(())
    }
}
