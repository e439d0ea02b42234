use crate::prelude::DashboardResult;
use crate::session::coordinate::Coordinate;
use crate::session::inputs::{EditOutcome, InputField, InterpolationMode, PavementInputs};
use crate::telemetry::{MetricsRecorder, SessionLog};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder shown until a location lookup exists.
pub const LOCATION_PLACEHOLDER: &str = "Buscando ubicación...";

/// Marker position and location caption, fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    coordinate: Coordinate,
    location_label: String,
}

impl ViewState {
    pub fn new(coordinate: Coordinate, location_label: impl Into<String>) -> Self {
        Self {
            coordinate,
            location_label: location_label.into(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn location_label(&self) -> &str {
        &self.location_label
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Coordinate::default(), LOCATION_PLACEHOLDER)
    }
}

/// One interactive session: the fixed view state plus the editable inputs.
///
/// Created once at startup and handed by reference to every render call.
pub struct Session {
    view: ViewState,
    inputs: PavementInputs,
    logger: SessionLog,
    metrics: Arc<MetricsRecorder>,
}

impl Session {
    pub fn start(view: ViewState, metrics: Arc<MetricsRecorder>) -> Self {
        let logger = SessionLog::scoped(view.coordinate().to_string());
        logger.record(&format!("session started ({})", view.location_label()));
        Self {
            view,
            inputs: PavementInputs::default(),
            logger,
            metrics,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn inputs(&self) -> &PavementInputs {
        &self.inputs
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn edit(&mut self, field: InputField, value: i64) -> EditOutcome {
        let outcome = self.inputs.set(field, value);
        self.note_edit(&outcome);
        outcome
    }

    pub fn edit_raw(&mut self, field: InputField, raw: &str) -> DashboardResult<EditOutcome> {
        let outcome = self.inputs.set_raw(field, raw)?;
        self.note_edit(&outcome);
        Ok(outcome)
    }

    pub fn select_mode(&mut self, mode: InterpolationMode) {
        self.inputs.set_mode(mode);
        self.metrics.record_edit();
        self.logger.record(&format!("mode -> {}", mode.key()));
    }

    fn note_edit(&mut self, outcome: &EditOutcome) {
        self.metrics.record_edit();
        if outcome.was_clamped() {
            self.metrics.record_clamp();
            self.logger
                .clamped(outcome.field.key(), outcome.requested, outcome.stored);
        } else {
            self.logger
                .record(&format!("{} -> {}", outcome.field.key(), outcome.stored));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_state_survives_any_number_of_edits() {
        let mut session = Session::start(ViewState::default(), Arc::default());
        let before = session.view().clone();

        for (i, field) in InputField::ALL.iter().cycle().take(40).enumerate() {
            session.edit(*field, (i as i64) * 37 - 200);
        }
        session.select_mode(InterpolationMode::Idw);

        assert_eq!(session.view(), &before);
        assert_eq!(session.view().location_label(), LOCATION_PLACEHOLDER);
    }

    #[test]
    fn edits_are_counted_and_clamps_flagged() {
        let mut session = Session::start(ViewState::default(), Arc::default());
        session.edit(InputField::RutDepth, 20);
        session.edit(InputField::RutDepth, 250);
        session.select_mode(InterpolationMode::Linear);

        let snapshot = session.metrics().snapshot();
        assert_eq!(snapshot.edits, 3);
        assert_eq!(snapshot.clamped, 1);
        assert_eq!(session.inputs().rut_depth, 100);
    }
}
