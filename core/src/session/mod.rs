pub mod coordinate;
pub mod inputs;
pub mod state;

pub use coordinate::Coordinate;
pub use inputs::{
    field_specs, parse_saturating, EditOutcome, FieldSpec, InputField, InterpolationMode,
    PavementInputs, WidgetKind,
};
pub use state::{Session, ViewState, LOCATION_PLACEHOLDER};
