//! Interval-pipeline datasets
//!
//! ## Flow
//!
//! ```text
//! LabeledTraces ──partition──> Partition { train, test }
//!      │
//!      └─ per trace: vectorize ─> sliding_windows ─> (window, label)
//!                                                      │
//!                                   label_matrix <─────┘
//!                                        │
//!                       LabeledSamples { x: (n, len, 2), y: (n, 1) }
//! ```
//!
//! The label matrix is a "one-hot scaled by duration" encoding: each
//! interval puts its duration in the channel of its state and zero in the
//! other.

mod labeled;
mod partition;

pub use labeled::{Label, LabeledTrace, LabeledTraces};
pub use partition::{partition_train_test, train_len, Partition};

use crate::interval::{vectorize, Interval, STATE_COUNT};
use crate::tensor::{Matrix, Tensor3};
use crate::window::{sliding_windows, WindowSpec};
use crate::{Error, Result};

/// One window of intervals with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledWindow {
    /// Fixed-length interval slice
    pub window: Vec<Interval>,
    /// Target value
    pub label: Label,
}

/// Model-ready samples: features `(n, window_len, 2)` and labels `(n, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSamples {
    /// Duration-scaled one-hot features
    pub x: Tensor3,
    /// Labels
    pub y: Matrix,
}

impl LabeledSamples {
    /// Number of samples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.x.samples()
    }

    /// True if there are no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x.samples() == 0
    }
}

/// Tag every window with the same label.
#[must_use]
pub fn assign_label(windows: Vec<Vec<Interval>>, label: Label) -> Vec<LabeledWindow> {
    windows
        .into_iter()
        .map(|window| LabeledWindow { window, label })
        .collect()
}

/// Build the duration-scaled one-hot tensor and the label column.
///
/// The features always have shape `(samples.len(), window_len, 2)`, so an
/// empty batch still carries the window geometry.
///
/// # Errors
///
/// Returns [`Error::InconsistentWindowShape`] if a window's length differs
/// from `window_len`.
#[allow(clippy::cast_precision_loss)]
pub fn label_matrix(samples: &[LabeledWindow], window_len: usize) -> Result<LabeledSamples> {
    if let Some((index, bad)) = samples
        .iter()
        .enumerate()
        .find(|(_, s)| s.window.len() != window_len)
    {
        return Err(Error::InconsistentWindowShape {
            expected: window_len,
            found: bad.window.len(),
            index,
        });
    }

    let mut x = Tensor3::zeros(samples.len(), window_len, STATE_COUNT);
    let mut y = Matrix::zeros(samples.len(), 1);
    for (s, sample) in samples.iter().enumerate() {
        for (i, interval) in sample.window.iter().enumerate() {
            x.set(s, i, interval.state.channel(), interval.duration as f64);
        }
        y.set(s, 0, f64::from(sample.label));
    }
    Ok(LabeledSamples { x, y })
}

/// Window every labeled trace and assemble the samples.
///
/// Each trace is vectorized into intervals, cut into at most
/// `spec.max_count` windows, and every window inherits the trace's label.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a zero window length or stride.
pub fn data_prep(traces: &[LabeledTrace], spec: WindowSpec) -> Result<LabeledSamples> {
    let mut samples = Vec::new();
    for item in traces {
        let intervals = vectorize(item.trace.as_slice());
        let windows = sliding_windows(&intervals, spec)?;
        tracing::debug!(
            label = item.label,
            intervals = intervals.len(),
            windows = windows.len(),
            "windowed trace"
        );
        samples.extend(assign_label(windows, item.label));
    }
    label_matrix(&samples, spec.len)
}

/// Sequentially split labeled windows and build both label matrices.
///
/// The first `floor(n * ratio)` windows form the training side.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless `0 < ratio < 1`, or
/// [`Error::InconsistentWindowShape`] for a window not of `window_len`.
pub fn prep_train_test(
    samples: &[LabeledWindow],
    window_len: usize,
    ratio: f64,
) -> Result<(LabeledSamples, LabeledSamples)> {
    partition::check_ratio(ratio)?;
    let (train, test) = samples.split_at(train_len(samples.len(), ratio));
    Ok((label_matrix(train, window_len)?, label_matrix(test, window_len)?))
}
