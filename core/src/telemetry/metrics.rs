use crate::prelude::RecordKind;
use std::collections::HashMap;
use std::sync::Mutex;

/// Counters collected while sentences are dispatched.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub processed: usize,
    pub unmatched: usize,
    pub errors: usize,
    pub by_kind: HashMap<RecordKind, usize>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_processed(&self, kind: RecordKind) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
            *metrics.by_kind.entry(kind).or_insert(0) += 1;
        }
    }

    pub fn record_unmatched(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
            metrics.unmatched += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics = Metrics::default();
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            metrics.clone()
        } else {
            Metrics::default()
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
    fn counts_dispatches_per_kind() {
        let recorder = MetricsRecorder::new();
        recorder.record_processed(RecordKind::ObjectUpdate);
        recorder.record_processed(RecordKind::ObjectUpdate);
        recorder.record_processed(RecordKind::Timeframe);
        recorder.record_unmatched();
        recorder.record_error();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.processed, 4);
        assert_eq!(snapshot.unmatched, 1);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.by_kind[&RecordKind::ObjectUpdate], 2);

        recorder.reset();
        assert_eq!(recorder.snapshot(), Metrics::default());
    }
}
