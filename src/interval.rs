//! Busy/rest interval encoding
//!
//! A trace collapses to an ordered list of `(state, duration)` intervals
//! where any positive task value counts as busy. Consecutive busy slots
//! owned by different tasks stay in one busy interval; the context switch
//! between them is visible only through [`classify_transition`].

use crate::segment::run_length_encode;
use serde::{Deserialize, Serialize};

/// Number of interval states a label matrix has channels for.
pub const STATE_COUNT: usize = 2;

/// Occupancy state of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalState {
    /// No task scheduled
    Rest,
    /// Some task scheduled
    Busy,
}

impl IntervalState {
    /// Channel index in a label matrix.
    #[must_use]
    pub const fn channel(self) -> usize {
        match self {
            Self::Rest => 0,
            Self::Busy => 1,
        }
    }
}

/// Consecutive slots sharing one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Rest or busy
    pub state: IntervalState,
    /// Number of slots (always >= 1)
    pub duration: usize,
}

impl Interval {
    /// Create an interval.
    #[must_use]
    pub const fn new(state: IntervalState, duration: usize) -> Self {
        Self { state, duration }
    }
}

/// How the occupancy changed between two consecutive slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same value in both slots
    Unchanged,
    /// Busy in both slots, but a different task
    ContextSwitch,
    /// Idle then busy
    RestToBusy,
    /// Busy then idle
    BusyToRest,
}

/// Classify the change from `prev` to `current`.
#[must_use]
pub const fn classify_transition(prev: u32, current: u32) -> Transition {
    if prev == current {
        Transition::Unchanged
    } else if prev > 0 && current > 0 {
        Transition::ContextSwitch
    } else if prev == 0 {
        Transition::RestToBusy
    } else {
        Transition::BusyToRest
    }
}

/// Convert a trace into its rest/busy intervals.
///
/// Durations always sum to the trace length. An empty trace has no intervals.
#[must_use]
pub fn vectorize(trace: &[u32]) -> Vec<Interval> {
    let busy: Vec<bool> = trace.iter().map(|&v| v > 0).collect();
    run_length_encode(&busy)
        .into_iter()
        .map(|run| {
            let state = if run.value {
                IntervalState::Busy
            } else {
                IntervalState::Rest
            };
            Interval::new(state, run.len)
        })
        .collect()
}
