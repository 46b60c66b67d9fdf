//! Metric Record - scalar results reported for a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dataset side a metric was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    /// Training examples
    Train,
    /// Held-out validation share of the training set
    Validation,
    /// Test examples
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        };
        f.write_str(name)
    }
}

/// Metric Record represents a single reported value.
///
/// Metrics are keyed by `run_id`, split and key; `step` orders repeated
/// values of the same key (per mask or per epoch).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    run_id: String,
    split: Split,
    key: String,
    step: u64,
    value: f64,
    timestamp: DateTime<Utc>,
}

impl MetricRecord {
    /// Create a new metric record stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `run_id` - ID of the parent run
    /// * `split` - Dataset side the value was computed on
    /// * `key` - Metric name (e.g. "loss", "accuracy")
    /// * `step` - Ordering index among values of the same key
    /// * `value` - Metric value
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        split: Split,
        key: impl Into<String>,
        step: u64,
        value: f64,
    ) -> Self {
        MetricRecordBuilder::new(run_id, split, key, step, value).build()
    }

    /// Create a builder for constructing a metric record with optional fields.
    #[must_use]
    pub fn builder(
        run_id: impl Into<String>,
        split: Split,
        key: impl Into<String>,
        step: u64,
        value: f64,
    ) -> MetricRecordBuilder {
        MetricRecordBuilder::new(run_id, split, key, step, value)
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the split.
    #[must_use]
    pub const fn split(&self) -> Split {
        self.split
    }

    /// Get the metric key/name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the step.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Get the metric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the timestamp when the metric was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Builder for `MetricRecord`.
#[derive(Debug)]
pub struct MetricRecordBuilder {
    run_id: String,
    split: Split,
    key: String,
    step: u64,
    value: f64,
    timestamp: DateTime<Utc>,
}

impl MetricRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        split: Split,
        key: impl Into<String>,
        step: u64,
        value: f64,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            split,
            key: key.into(),
            step,
            value,
            timestamp: Utc::now(),
        }
    }

    /// Set a custom timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the `MetricRecord`.
    #[must_use]
    pub fn build(self) -> MetricRecord {
        MetricRecord {
            run_id: self.run_id,
            split: self.split,
            key: self.key,
            step: self.step,
            value: self.value,
            timestamp: self.timestamp,
        }
    }
}
