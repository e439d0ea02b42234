//! Session model and panel content for the PG selection dashboard.
//!
//! The crate owns the editable pavement inputs, the fixed map view, the
//! constant grade recommendation and the static climate/info panels. The
//! `dashboard` service and the `visualizer` client both render from it.

pub mod map;
pub mod panels;
pub mod prelude;
pub mod recommendation;
pub mod session;
pub mod telemetry;

pub use prelude::{DashboardError, DashboardResult};
pub use recommendation::{calculate, Calculation, FixedGradeRecommender, Recommender};
pub use session::{PavementInputs, Session, ViewState};
