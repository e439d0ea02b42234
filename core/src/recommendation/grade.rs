use crate::session::PavementInputs;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Asphalt binder performance grade, rendered as `PG <high>-<low>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceGrade {
    /// Seven-day maximum pavement design temperature, °C.
    pub high_c: i32,
    /// Minimum pavement design temperature, °C (stored as a positive magnitude).
    pub low_c: i32,
}

impl PerformanceGrade {
    pub const fn new(high_c: i32, low_c: i32) -> Self {
        Self { high_c, low_c }
    }
}

impl fmt::Display for PerformanceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PG {}-{}", self.high_c, self.low_c)
    }
}

/// Produces a grade recommendation for the given inputs.
pub trait Recommender {
    fn recommend(&self, inputs: &PavementInputs) -> PerformanceGrade;
}

/// Returns the same grade for every input.
///
/// No selection formula exists yet; the grade does not depend on the
/// inputs, the location or the interpolation mode.
#[derive(Debug, Clone, Copy)]
pub struct FixedGradeRecommender {
    grade: PerformanceGrade,
}

impl FixedGradeRecommender {
    pub const DEFAULT_GRADE: PerformanceGrade = PerformanceGrade::new(64, 22);

    pub fn new(grade: PerformanceGrade) -> Self {
        Self { grade }
    }
}

impl Default for FixedGradeRecommender {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GRADE)
    }
}

impl Recommender for FixedGradeRecommender {
    fn recommend(&self, _inputs: &PavementInputs) -> PerformanceGrade {
        self.grade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{InputField, InterpolationMode};

    #[test]
    fn grade_renders_with_pg_prefix() {
        assert_eq!(PerformanceGrade::new(64, 22).to_string(), "PG 64-22");
    }

    #[test]
    fn fixed_recommender_ignores_inputs() {
        let recommender = FixedGradeRecommender::default();
        let mut inputs = PavementInputs::default();
        let first = recommender.recommend(&inputs);

        inputs.set(InputField::Esal, 999);
        inputs.set(InputField::Reliability, 0);
        inputs.set_mode(InterpolationMode::Idw);
        assert_eq!(recommender.recommend(&inputs), first);
        assert_eq!(first.to_string(), "PG 64-22");
    }
}
