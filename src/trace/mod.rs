//! Task-occupancy traces
//!
//! A trace holds one value per discrete time step: `0` is idle, any positive
//! value names the task occupying that slot (an identifier, not a magnitude).
//!
//! ## Stages
//!
//! - [`mask_trace`]: binary indicator of one task value
//! - [`uniform_sample_trace`]: fixed-phase decimation
//! - [`Trace::trim`]: slice-style windowing of the raw trace
//!
//! Loading from disk lives in [`loader`].

pub mod loader;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-timestep task occupancy record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trace {
    steps: Vec<u32>,
}

impl Trace {
    /// Wrap raw per-timestep values.
    #[must_use]
    pub const fn new(steps: Vec<u32>) -> Self {
        Self { steps }
    }

    /// Borrow the raw values.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.steps
    }

    /// Consume into the raw values.
    #[must_use]
    pub fn into_inner(self) -> Vec<u32> {
        self.steps
    }

    /// Number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the trace has no time steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Distinct values present, ascending.
    #[must_use]
    pub fn distinct_values(&self) -> BTreeSet<u32> {
        self.steps.iter().copied().collect()
    }

    /// Largest task value present (`0` for an empty or all-idle trace).
    #[must_use]
    pub fn max_task(&self) -> u32 {
        self.steps.iter().copied().max().unwrap_or(0)
    }

    /// Binary mask of `value` over this trace.
    #[must_use]
    pub fn mask(&self, value: u32) -> Vec<u32> {
        mask_trace(value, &self.steps)
    }

    /// Keep `steps[start..end]`, clamping both bounds to the trace length.
    ///
    /// Mirrors slice semantics where out-of-range bounds shrink rather than
    /// fail: `end` beyond the trace keeps everything from `start`, and
    /// `start >= end` leaves an empty trace.
    #[must_use]
    pub fn trim(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.steps.len());
        let start = start.min(end);
        Self::new(self.steps[start..end].to_vec())
    }
}

impl From<Vec<u32>> for Trace {
    fn from(steps: Vec<u32>) -> Self {
        Self::new(steps)
    }
}

impl AsRef<[u32]> for Trace {
    fn as_ref(&self) -> &[u32] {
        &self.steps
    }
}

/// Turn a trace into a binary vector: `1` where `trace[i] == value`, else `0`.
#[must_use]
pub fn mask_trace(value: u32, trace: &[u32]) -> Vec<u32> {
    trace.iter().map(|&v| u32::from(v == value)).collect()
}

/// Keep only elements whose index is congruent to 1 modulo `sample_gap`.
///
/// The phase offset is fixed at 1, so a gap of 1 keeps nothing.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `sample_gap` is zero.
pub fn uniform_sample_trace<T: Copy>(sample_gap: usize, trace: &[T]) -> Result<Vec<T>> {
    if sample_gap == 0 {
        return Err(Error::InvalidInput(
            "sample gap must be at least 1".to_string(),
        ));
    }
    if sample_gap == 1 {
        tracing::warn!("sample gap of 1 retains no elements (phase offset is 1)");
    }

    Ok(trace
        .iter()
        .enumerate()
        .filter(|(i, _)| i % sample_gap == 1)
        .map(|(_, &v)| v)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_trace_selects_value() {
        let trace = [0, 0, 1, 1, 1, 0];
        assert_eq!(mask_trace(1, &trace), vec![0, 0, 1, 1, 1, 0]);
        assert_eq!(mask_trace(0, &trace), vec![1, 1, 0, 0, 0, 1]);
        assert_eq!(mask_trace(7, &trace), vec![0; 6]);
    }

    #[test]
    fn test_masks_partition_every_index() {
        let trace = Trace::new(vec![0, 2, 2, 1, 0, 3, 1]);
        let masks: Vec<Vec<u32>> = trace
            .distinct_values()
            .into_iter()
            .map(|v| trace.mask(v))
            .collect();

        for i in 0..trace.len() {
            let sum: u32 = masks.iter().map(|m| m[i]).sum();
            assert_eq!(sum, 1, "index {i} not covered exactly once");
        }
    }

    #[test]
    fn test_uniform_sample_phase_offset() {
        let trace: Vec<u32> = (10..=20).collect();
        assert_eq!(uniform_sample_trace(5, &trace).unwrap(), vec![11, 16]);
    }

    #[test]
    fn test_uniform_sample_gap_two() {
        let trace = [0, 1, 2, 3, 4, 5];
        assert_eq!(uniform_sample_trace(2, &trace).unwrap(), vec![1, 3, 5]);
    }

    #[test]
    fn test_uniform_sample_gap_one_is_empty() {
        let trace = [4, 5, 6];
        assert!(uniform_sample_trace(1, &trace).unwrap().is_empty());
    }

    #[test]
    fn test_uniform_sample_gap_zero_rejected() {
        let result = uniform_sample_trace(0, &[1u32, 2]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_trim_clamps_bounds() {
        let trace = Trace::new(vec![1, 2, 3, 4, 5]);
        assert_eq!(trace.trim(1, 3).as_slice(), &[2, 3]);
        assert_eq!(trace.trim(2, 1_000_000).as_slice(), &[3, 4, 5]);
        assert!(trace.trim(10, 20).is_empty());
        assert!(trace.trim(4, 2).is_empty());
    }

    #[test]
    fn test_max_task() {
        assert_eq!(Trace::new(vec![0, 3, 1]).max_task(), 3);
        assert_eq!(Trace::default().max_task(), 0);
    }
}
