pub mod climate;
pub mod info;

pub use climate::{ClimateMetric, ClimatePanel, MetricDelta, Trend};
pub use info::{PlaceholderPanel, Sidebar, StaticPanels, Tab};
