pub mod grade;
pub mod summary;

pub use grade::{FixedGradeRecommender, PerformanceGrade, Recommender};
pub use summary::{calculate, Calculation, ResultSummary, ACKNOWLEDGEMENT};
