use crate::web::model::{saturating_int, CalculateForm, InputEdit, SessionSnapshot};
use pgcore::map::{MapSettings, MapView};
use pgcore::prelude::{DashboardError, DashboardResult};
use pgcore::recommendation::{calculate, Calculation, Recommender};
use pgcore::session::{field_specs, InputField, InterpolationMode, Session};
use std::sync::Arc;

/// Applies user edits to a session and runs the calculate action.
#[derive(Clone)]
pub struct Runner {
    recommender: Arc<dyn Recommender + Send + Sync>,
    map: MapSettings,
}

impl Runner {
    pub fn new(recommender: Arc<dyn Recommender + Send + Sync>, map: MapSettings) -> Self {
        Self { recommender, map }
    }

    pub fn snapshot(&self, session: &Session) -> SessionSnapshot {
        SessionSnapshot {
            view: session.view().clone(),
            inputs: session.inputs().clone(),
            map: MapView::render(session.view(), &self.map),
            fields: field_specs(),
        }
    }

    /// Returns whether the stored value differs from the requested one.
    pub fn apply_edit(&self, session: &mut Session, edit: &InputEdit) -> DashboardResult<bool> {
        match edit {
            InputEdit::Field { field, value } => {
                let field: InputField = field.parse()?;
                let value = saturating_int(value).ok_or_else(|| DashboardError::InvalidNumber {
                    field: field.key().to_string(),
                    value: value.to_string(),
                })?;
                Ok(session.edit(field, value).was_clamped())
            }
            InputEdit::Mode { mode } => {
                let mode: InterpolationMode = mode.parse()?;
                session.select_mode(mode);
                Ok(false)
            }
        }
    }

    /// Applies every field present in the form, validating all of them first.
    pub fn apply_form(&self, session: &mut Session, form: &CalculateForm) -> DashboardResult<()> {
        let mode = form
            .mode
            .as_deref()
            .map(str::parse::<InterpolationMode>)
            .transpose()?;

        let mut staged = session.inputs().clone();
        let mut present = Vec::new();
        for field in InputField::ALL {
            if let Some(raw) = form.value(field) {
                staged.set_raw(field, raw)?;
                present.push((field, raw));
            }
        }

        for (field, raw) in present {
            session.edit_raw(field, raw)?;
        }
        if let Some(mode) = mode {
            session.select_mode(mode);
        }
        Ok(())
    }

    pub fn calculate(&self, session: &Session) -> Calculation {
        calculate(session, self.recommender.as_ref())
    }
}
