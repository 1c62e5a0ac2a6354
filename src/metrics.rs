use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::pipeline::Prediction;

/// Process-wide request counters. Lock-free; the only state shared between
/// requests besides the artifacts.
#[derive(Debug, Default)]
pub struct Metrics {
    requests: AtomicU64,
    predictions: AtomicU64,
    failures: AtomicU64,
    warnings: DashMap<&'static str, u64>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub predictions: u64,
    pub failures: u64,
    pub warnings: BTreeMap<String, u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prediction(&self, prediction: &Prediction) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        for warning in &prediction.warnings {
            *self.warnings.entry(warning.kind()).or_insert(0) += 1;
        }
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            predictions: self.predictions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            warnings: self
                .warnings
                .iter()
                .map(|entry| (entry.key().to_string(), *entry.value()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineWarning;

    #[test]
    fn test_counts_warnings_by_kind() {
        let metrics = Metrics::new();
        let prediction = Prediction {
            value: 1.0,
            warnings: vec![
                PipelineWarning::UnknownCodec {
                    label: "av1".to_string(),
                },
                PipelineWarning::MissingFeatures {
                    names: vec!["x".to_string()],
                },
            ],
        };
        metrics.record_request();
        metrics.record_prediction(&prediction);
        metrics.record_request();
        metrics.record_prediction(&prediction);
        metrics.record_request();
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 3);
        assert_eq!(snapshot.predictions, 2);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.warnings.get("unknown_codec"), Some(&2));
        assert_eq!(snapshot.warnings.get("missing_features"), Some(&2));
    }
}
