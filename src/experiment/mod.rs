//! Run ledger
//!
//! Every processed trace file becomes one [`RunRecord`]; every scalar the
//! driver reports about it becomes a [`MetricRecord`]. The store keeps both in
//! insertion order and averages scores per run and across runs.
//!
//! ```text
//! ExperimentStore ──< RunRecord (N, one per trace file)
//!                          │
//!                          └──< MetricRecord (N) [split, key, step]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use taskrecon::experiment::{ExperimentStore, MetricRecord, RunRecord, RunStatus, Split};
//!
//! let mut store = ExperimentStore::new();
//!
//! let mut run = RunRecord::builder("size4rep1", "data/size4rep1.data")
//!     .label(4)
//!     .build();
//! run.start();
//! run.complete(RunStatus::Trained);
//! store.add_run(run);
//!
//! store.add_metric(MetricRecord::new("size4rep1", Split::Test, "accuracy", 0, 0.5));
//! assert_eq!(store.mean_score("size4rep1", Split::Test, "accuracy"), Some(0.5));
//! ```

mod metric_record;
mod run_record;
mod store;

pub use metric_record::{MetricRecord, MetricRecordBuilder, Split};
pub use run_record::{RunRecord, RunRecordBuilder, RunStatus};
pub use store::ExperimentStore;
