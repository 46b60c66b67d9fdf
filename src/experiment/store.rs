//! Experiment Store - in-memory run ledger

use super::{MetricRecord, RunRecord, RunStatus, Split};
use crate::report::write_json_pretty;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// In-memory ledger of runs and their metrics.
///
/// Runs are kept in the order they were added, so summaries list trace
/// files in processing order. Adding a run with an existing ID replaces it
/// in place.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentStore {
    runs: Vec<RunRecord>,
    metrics: Vec<MetricRecord>,
}

impl ExperimentStore {
    /// Create a new empty experiment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store is empty (no runs or metrics).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.metrics.is_empty()
    }

    /// Get the number of runs in the store.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Get the number of metrics in the store.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    /// Add a run, replacing any run with the same ID.
    pub fn add_run(&mut self, run: RunRecord) {
        match self.runs.iter_mut().find(|r| r.run_id() == run.run_id()) {
            Some(existing) => *existing = run,
            None => self.runs.push(run),
        }
    }

    /// Get a run by ID.
    #[must_use]
    pub fn get_run(&self, run_id: &str) -> Option<&RunRecord> {
        self.runs.iter().find(|r| r.run_id() == run_id)
    }

    /// Get a run by ID for status updates.
    pub fn get_run_mut(&mut self, run_id: &str) -> Option<&mut RunRecord> {
        self.runs.iter_mut().find(|r| r.run_id() == run_id)
    }

    /// All runs in insertion order.
    #[must_use]
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Count runs with the given status.
    #[must_use]
    pub fn count_with_status(&self, status: RunStatus) -> usize {
        self.runs.iter().filter(|r| r.status() == status).count()
    }

    /// Add a metric to the store.
    pub fn add_metric(&mut self, metric: MetricRecord) {
        self.metrics.push(metric);
    }

    /// Get metrics for a run, split and key, ordered by step.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use taskrecon::experiment::{ExperimentStore, MetricRecord, Split};
    ///
    /// let mut store = ExperimentStore::new();
    /// for task in (0..4).rev() {
    ///     store.add_metric(MetricRecord::new("run-001", Split::Test, "loss", task, 0.1));
    /// }
    ///
    /// let losses = store.get_metrics_for_run("run-001", Split::Test, "loss");
    /// assert_eq!(losses.len(), 4);
    /// assert_eq!(losses[0].step(), 0);
    /// ```
    #[must_use]
    pub fn get_metrics_for_run(&self, run_id: &str, split: Split, key: &str) -> Vec<MetricRecord> {
        let mut metrics: Vec<MetricRecord> = self
            .metrics
            .iter()
            .filter(|m| m.run_id() == run_id && m.split() == split && m.key() == key)
            .cloned()
            .collect();

        metrics.sort_by_key(MetricRecord::step);

        metrics
    }

    /// Mean of a run's values for one split and key.
    #[must_use]
    pub fn mean_score(&self, run_id: &str, split: Split, key: &str) -> Option<f64> {
        mean(
            self.metrics
                .iter()
                .filter(|m| m.run_id() == run_id && m.split() == split && m.key() == key)
                .map(MetricRecord::value),
        )
    }

    /// Mean over runs of each run's [`mean_score`](Self::mean_score).
    ///
    /// Runs without the metric are skipped, so every run weighs the same
    /// regardless of how many values it reported.
    #[must_use]
    pub fn overall_mean(&self, split: Split, key: &str) -> Option<f64> {
        mean(
            self.runs
                .iter()
                .filter_map(|r| self.mean_score(r.run_id(), split, key)),
        )
    }

    /// Write the ledger as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an IO or JSON error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_pretty(path, self)?;
        tracing::debug!(path = %path.display(), runs = self.runs.len(), "saved run ledger");
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
