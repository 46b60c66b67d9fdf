//! Run Record - one processed trace file

use crate::dataset::Label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is registered but not yet started.
    Pending,
    /// Dataset is being built or the model fitted.
    Running,
    /// A fresh model was fitted and saved.
    Trained,
    /// An existing model artifact was reused.
    Loaded,
    /// Run stopped with an error.
    Failed,
}

impl RunStatus {
    /// Whether the run has reached a final status.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Trained | Self::Loaded | Self::Failed)
    }
}

/// One pipeline execution over a single trace file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    run_id: String,
    trace_path: PathBuf,
    label: Option<Label>,
    rep: Option<u32>,
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl RunRecord {
    /// Create a new run record in Pending status.
    ///
    /// # Arguments
    ///
    /// * `run_id` - Unique identifier for the run (usually the file stem)
    /// * `trace_path` - Trace file the run reads
    #[must_use]
    pub fn new(run_id: impl Into<String>, trace_path: impl Into<PathBuf>) -> Self {
        RunRecordBuilder::new(run_id, trace_path).build()
    }

    /// Create a builder for constructing a run record with optional fields.
    #[must_use]
    pub fn builder(run_id: impl Into<String>, trace_path: impl Into<PathBuf>) -> RunRecordBuilder {
        RunRecordBuilder::new(run_id, trace_path)
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the trace file path.
    #[must_use]
    pub fn trace_path(&self) -> &Path {
        &self.trace_path
    }

    /// Get the workload label, if the file name carried one.
    #[must_use]
    pub const fn label(&self) -> Option<Label> {
        self.label
    }

    /// Get the repetition index, if known.
    #[must_use]
    pub const fn rep(&self) -> Option<u32> {
        self.rep
    }

    /// Get the current run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start timestamp, if the run has started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp, if the run has completed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Get the failure message of a Failed run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start the run, transitioning from Pending to Running.
    ///
    /// Sets the `started_at` timestamp to now.
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Complete the run with the given final status.
    ///
    /// Sets the `ended_at` timestamp to now.
    pub fn complete(&mut self, status: RunStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }

    /// Complete the run as Failed, keeping the error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.complete(RunStatus::Failed);
    }
}

/// Builder for `RunRecord`.
#[derive(Debug)]
pub struct RunRecordBuilder {
    run_id: String,
    trace_path: PathBuf,
    label: Option<Label>,
    rep: Option<u32>,
}

impl RunRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(run_id: impl Into<String>, trace_path: impl Into<PathBuf>) -> Self {
        Self {
            run_id: run_id.into(),
            trace_path: trace_path.into(),
            label: None,
            rep: None,
        }
    }

    /// Set the workload label.
    #[must_use]
    pub const fn label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the repetition index.
    #[must_use]
    pub const fn rep(mut self, rep: u32) -> Self {
        self.rep = Some(rep);
        self
    }

    /// Build the `RunRecord`.
    #[must_use]
    pub fn build(self) -> RunRecord {
        RunRecord {
            run_id: self.run_id,
            trace_path: self.trace_path,
            label: self.label,
            rep: self.rep,
            status: RunStatus::Pending,
            started_at: None,
            ended_at: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_default() {
        let run = RunRecord::new("size4rep1", "size4rep1.data");
        assert_eq!(run.status(), RunStatus::Pending);
        assert!(run.label().is_none());
        assert!(run.started_at().is_none());
        assert!(run.rep().is_none());
    }

    #[test]
    fn test_run_lifecycle() {
        let mut run = RunRecord::builder("size4rep1", "size4rep1.data")
            .label(4)
            .rep(1)
            .build();
        run.start();
        assert_eq!(run.status(), RunStatus::Running);
        assert!(!run.status().is_finished());
        run.complete(RunStatus::Loaded);
        assert_eq!(run.status(), RunStatus::Loaded);
        assert!(run.ended_at().is_some());
        assert_eq!(run.rep(), Some(1));
        assert_eq!(run.label(), Some(4));
    }

    #[test]
    fn test_run_failure_keeps_message() {
        let mut run = RunRecord::new("r", "r.data");
        run.start();
        run.fail("trace is empty after trimming");
        assert_eq!(run.status(), RunStatus::Failed);
        assert_eq!(run.error(), Some("trace is empty after trimming"));
    }
}
