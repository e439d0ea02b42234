use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters exposed on the metrics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub edits: usize,
    pub clamped: usize,
    pub calculations: usize,
    pub rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_edit(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.edits += 1;
        }
    }

    pub fn record_clamp(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.clamped += 1;
        }
    }

    pub fn record_calculation(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.calculations += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_each_event_kind() {
        let recorder = MetricsRecorder::new();
        recorder.record_edit();
        recorder.record_edit();
        recorder.record_clamp();
        recorder.record_calculation();
        recorder.record_rejected();

        let snapshot = recorder.snapshot();
        assert_eq!(
            snapshot,
            MetricsSnapshot {
                edits: 2,
                clamped: 1,
                calculations: 1,
                rejected: 1,
            }
        );
    }
}
