use log::{info, warn};

const TARGET: &str = "pgcore::session";

/// Session-scoped log sink; every line carries the coordinate the session was opened at.
#[derive(Debug, Clone)]
pub struct SessionLog {
    scope: String,
}

impl SessionLog {
    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn record(&self, message: &str) {
        info!(target: TARGET, "[{}] {}", self.scope, message);
    }

    pub fn clamped(&self, field: &str, requested: i64, stored: u32) {
        warn!(
            target: TARGET,
            "[{}] {} value {} clamped to {}", self.scope, field, requested, stored
        );
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::scoped("session")
    }
}
