use crate::recommendation::grade::{PerformanceGrade, Recommender};
use crate::session::{InputField, PavementInputs, Session};
use serde::{Deserialize, Serialize};

/// Success message shown when the calculate action fires.
pub const ACKNOWLEDGEMENT: &str = "Parámetros guardados correctamente";

/// Human-readable echo of the inputs next to the recommended grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub grade: PerformanceGrade,
    pub lines: Vec<String>,
}

impl ResultSummary {
    pub fn from_inputs(grade: PerformanceGrade, inputs: &PavementInputs) -> Self {
        let mut lines = Vec::with_capacity(InputField::ALL.len() + 1);
        for field in InputField::ALL {
            lines.push(format!("{}: {}", field.spec().label, inputs.echo(field)));
        }
        lines.push(format!("Modo de interpolación: {}", inputs.mode.label()));
        Self { grade, lines }
    }

    pub fn headline(&self) -> String {
        format!("Performance Grade Recomendado: {}", self.grade)
    }

    /// Full plain-text rendering used by every frontend.
    pub fn render(&self) -> String {
        let mut out = self.headline();
        out.push_str("\n\nParámetros utilizados:\n");
        for line in &self.lines {
            out.push_str("- ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Output of one calculate action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub acknowledgement: String,
    pub summary: ResultSummary,
    pub text: String,
}

/// Runs the calculate action against the session's current inputs.
///
/// The session is only read; the summary is returned, never stored.
pub fn calculate<R: Recommender + ?Sized>(session: &Session, recommender: &R) -> Calculation {
    let inputs = session.inputs();
    let grade = recommender.recommend(inputs);
    let summary = ResultSummary::from_inputs(grade, inputs);
    session.metrics().record_calculation();
    log::info!("calculation -> {}", grade);
    Calculation {
        acknowledgement: ACKNOWLEDGEMENT.to_string(),
        text: summary.render(),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::grade::FixedGradeRecommender;
    use crate::session::ViewState;
    use std::sync::Arc;

    #[test]
    fn default_inputs_produce_expected_fragments() {
        let session = Session::start(ViewState::default(), Arc::default());
        let calc = calculate(&session, &FixedGradeRecommender::default());

        assert_eq!(calc.acknowledgement, ACKNOWLEDGEMENT);
        for fragment in ["PG 64-22", "12 mm", "35 mill.", "40 km/h", "70 mm", "98 %"] {
            assert!(calc.text.contains(fragment), "missing {fragment}");
        }
        assert!(calc.text.contains("Estación más cercana (rápido)"));
    }

    #[test]
    fn repeated_calculation_is_byte_identical() {
        let mut session = Session::start(ViewState::default(), Arc::default());
        session.edit(InputField::TrafficSpeed, 80);
        let recommender = FixedGradeRecommender::default();

        let first = calculate(&session, &recommender);
        let second = calculate(&session, &recommender);
        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
        assert_eq!(session.metrics().snapshot().calculations, 2);
    }

    #[test]
    fn summary_tracks_edits_but_grade_does_not() {
        let mut session = Session::start(ViewState::default(), Arc::default());
        session.edit(InputField::LayerDepth, 120);
        let calc = calculate(&session, &FixedGradeRecommender::default());

        assert!(calc.text.contains("Profundidad de capa: 120 mm"));
        assert!(calc.text.starts_with("Performance Grade Recomendado: PG 64-22"));
    }
}
