//! # taskrecon: Task-Structure Recognition from Execution Traces
//!
//! **Version**: 0.1.0
//!
//! taskrecon turns per-timestep execution traces (which task was running at
//! each step) into model-ready datasets for two learning problems:
//!
//! - **Interval classification**: busy/rest run-lengths are windowed and
//!   labeled with the workload size encoded in the trace file name.
//! - **Task-transition regression**: for every task id, the signed distances
//!   from the start and to the end of each run are min-max scaled into
//!   `[0, 1]` and cut into lookahead examples.
//!
//! ## Example Usage
//!
//! ```rust
//! use taskrecon::interval::vectorize;
//! use taskrecon::trace::Trace;
//!
//! let trace = Trace::new(vec![0, 0, 3, 3, 3, 0]);
//! let intervals = vectorize(trace.as_slice());
//! assert_eq!(intervals.len(), 3);
//! assert_eq!(intervals[1].duration, 3);
//!
//! let scaled = taskrecon::segment::regression_trace(&trace.mask(3))?;
//! assert!(scaled.x.iter().chain(&scaled.y).all(|v| (0.0..=1.0).contains(v)));
//! # Ok::<(), taskrecon::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod experiment;
pub mod interval;
pub mod model;
pub mod pipeline;
pub mod regression;
pub mod report;
pub mod scaling;
pub mod segment;
pub mod tensor;
pub mod trace;
pub mod window;

pub use error::{Error, Result};
