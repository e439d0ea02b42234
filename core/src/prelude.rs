/// Common error type for session and panel operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("unknown input field: {0}")]
    UnknownField(String),
    #[error("unknown tab: {0}")]
    UnknownTab(String),
    #[error("unknown interpolation mode: {0}")]
    UnknownMode(String),
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },
    #[error("map zoom {zoom} is above the tile layer limit of {max}")]
    InvalidZoom { zoom: u8, max: u8 },
    #[error("session state poisoned")]
    StatePoisoned,
}

impl DashboardError {
    /// Whether the error was caused by a malformed request rather than the process.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DashboardError::StatePoisoned)
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
