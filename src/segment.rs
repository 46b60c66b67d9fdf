//! Run-length segmentation and the regression "distance-to-transition" encoding
//!
//! ## Regression encoding
//!
//! Within a run of value `v` (with `0` treated as `-1` for sign purposes),
//! position `j` of a run of length `n` gets:
//!
//! ```text
//! X[j] = -j * sign(v)
//! Y[j] = -sign(v) * (n - j)
//! ```
//!
//! so X counts time since the run started and Y counts time until it ends,
//! signed by the run's state. Both series are then min-max scaled over the
//! whole output, never per run.

use crate::scaling::MinMaxScaler;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Maximal block of identical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run<T> {
    /// Repeated value
    pub value: T,
    /// Number of consecutive positions holding `value` (always >= 1)
    pub len: usize,
}

/// Split `seq` into its ordered maximal constant runs.
///
/// The first run starts at index 0 with the first value and the trailing
/// run is always emitted. An empty input yields no runs.
#[must_use]
pub fn run_length_encode<T: Copy + PartialEq>(seq: &[T]) -> Vec<Run<T>> {
    let mut runs: Vec<Run<T>> = Vec::new();
    for &value in seq {
        match runs.last_mut() {
            Some(run) if run.value == value => run.len += 1,
            _ => runs.push(Run { value, len: 1 }),
        }
    }
    runs
}

/// Flatten runs back into the sequence they describe.
#[must_use]
pub fn expand_runs<T: Copy>(runs: &[Run<T>]) -> Vec<T> {
    let total = runs.iter().map(|r| r.len).sum();
    let mut out = Vec::with_capacity(total);
    for run in runs {
        out.extend(std::iter::repeat(run.value).take(run.len));
    }
    out
}

/// Unscaled regression series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegressionSeries {
    /// Signed distance from the start of the current run
    pub x: Vec<f64>,
    /// Signed distance to the end of the current run
    pub y: Vec<f64>,
}

/// Regression series scaled to `[0, 1]`, with the scalers that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRegression {
    /// Scaled X
    pub x: Vec<f64>,
    /// Scaled Y
    pub y: Vec<f64>,
    /// Scaler fit on the full raw X series
    pub x_scaler: MinMaxScaler,
    /// Scaler fit on the full raw Y series
    pub y_scaler: MinMaxScaler,
}

/// Encode a trace (usually a binary mask) as raw regression targets.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn regression_encode(trace: &[u32]) -> RegressionSeries {
    let runs = run_length_encode(trace);
    tracing::debug!(steps = trace.len(), runs = runs.len(), "segmented trace");

    let mut series = RegressionSeries {
        x: Vec::with_capacity(trace.len()),
        y: Vec::with_capacity(trace.len()),
    };
    for run in &runs {
        let sign = if run.value == 0 { -1.0 } else { 1.0 };
        for j in 0..run.len {
            series.x.push(-(j as f64) * sign);
            series.y.push(-sign * (run.len - j) as f64);
        }
    }
    series
}

/// Encode a trace and scale X and Y with independent global scalers.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if the trace is empty, since no
/// scaler can be fit.
pub fn regression_trace(trace: &[u32]) -> Result<ScaledRegression> {
    let raw = regression_encode(trace);
    let (x_scaler, x) = MinMaxScaler::fit_transform(&raw.x)?;
    let (y_scaler, y) = MinMaxScaler::fit_transform(&raw.y)?;
    Ok(ScaledRegression {
        x,
        y,
        x_scaler,
        y_scaler,
    })
}
