//! Property-based tests for taskrecon
//!
//! - Test structural invariants of every transformation stage
//! - Run with ProptestConfig::with_cases(100)
//! - Must complete in <30 seconds for pre-commit hook

use proptest::prelude::*;
use taskrecon::dataset::{label_matrix, partition_train_test, train_len, LabeledTraces, LabeledWindow};
use taskrecon::interval::{vectorize, STATE_COUNT};
use taskrecon::scaling::MinMaxScaler;
use taskrecon::segment::{expand_runs, regression_encode, run_length_encode};
use taskrecon::trace::{mask_trace, uniform_sample_trace, Trace};
use taskrecon::window::{sliding_windows, WindowSpec};

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate a trace over a small task alphabet so runs are common
fn arb_trace(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..5, 0..max_len)
}

/// Generate a non-empty trace
fn arb_nonempty_trace(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..5, 1..max_len)
}

/// Generate labeled traces: up to 4 labels with 1..6 traces each
fn arb_labeled_traces() -> impl Strategy<Value = LabeledTraces> {
    proptest::collection::vec((0u32..4, arb_nonempty_trace(20)), 1..24)
        .prop_map(|items| items.into_iter().map(|(l, t)| (l, Trace::new(t))).collect())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Segmentation Properties
    // ========================================================================

    /// Property: expanding the runs reproduces the input
    #[test]
    fn prop_runs_expand_to_input(trace in arb_trace(200)) {
        let runs = run_length_encode(&trace);
        prop_assert_eq!(expand_runs(&runs), trace);
    }

    /// Property: runs are maximal (neighbours differ) and non-empty
    #[test]
    fn prop_runs_are_maximal(trace in arb_trace(200)) {
        let runs = run_length_encode(&trace);
        prop_assert!(runs.iter().all(|r| r.len >= 1));
        for pair in runs.windows(2) {
            prop_assert_ne!(pair[0].value, pair[1].value);
        }
    }

    /// Property: regression Y never reaches zero and X is zero exactly at run starts
    #[test]
    fn prop_regression_encode_shape(trace in arb_trace(200)) {
        let series = regression_encode(&trace);
        prop_assert_eq!(series.x.len(), trace.len());
        prop_assert_eq!(series.y.len(), trace.len());
        prop_assert!(series.y.iter().all(|&y| y != 0.0));

        let starts = trace.iter().enumerate().filter(|&(i, v)| i == 0 || trace[i - 1] != *v).count();
        prop_assert_eq!(series.x.iter().filter(|&&x| x == 0.0).count(), starts);
    }

    // ========================================================================
    // Masking and Sampling Properties
    // ========================================================================

    /// Property: masks over the distinct values cover every index exactly once
    #[test]
    fn prop_masks_partition_indices(trace in arb_trace(200)) {
        let t = Trace::new(trace.clone());
        let masks: Vec<Vec<u32>> = t.distinct_values().into_iter().map(|v| mask_trace(v, &trace)).collect();
        for i in 0..trace.len() {
            let hits: u32 = masks.iter().map(|m| m[i]).sum();
            prop_assert_eq!(hits, 1);
        }
    }

    /// Property: uniform sampling keeps every gap-th element starting at phase 1
    #[test]
    fn prop_uniform_sample_phase(trace in arb_trace(200), gap in 2usize..10) {
        let sampled = uniform_sample_trace(gap, &trace).unwrap();
        let expected: Vec<u32> = trace.iter().skip(1).step_by(gap).copied().collect();
        prop_assert_eq!(sampled, expected);
    }

    // ========================================================================
    // Windowing Properties
    // ========================================================================

    /// Property: window count matches the closed form and every window has length L
    #[test]
    fn prop_window_count_formula(
        n in 0usize..200,
        len in 1usize..20,
        stride in 1usize..20,
        max_count in 0usize..15
    ) {
        let seq: Vec<usize> = (0..n).collect();
        let spec = WindowSpec::new(len, max_count).stride(stride);
        let windows = sliding_windows(&seq, spec).unwrap();

        let expected = if n < len { 0 } else { ((n - len) / stride + 1).min(max_count) };
        prop_assert_eq!(windows.len(), expected);
        for (k, w) in windows.iter().enumerate() {
            prop_assert_eq!(w.len(), len);
            prop_assert_eq!(w[0], k * stride);
        }
    }

    // ========================================================================
    // Label Matrix Properties
    // ========================================================================

    /// Property: one channel per step holds the duration, the other is zero
    #[test]
    fn prop_label_matrix_one_hot_by_duration(trace in arb_nonempty_trace(300), len in 1usize..6) {
        let intervals = vectorize(&trace);
        let windows = sliding_windows(&intervals, WindowSpec::new(len, usize::MAX)).unwrap();
        let samples: Vec<LabeledWindow> = windows
            .into_iter()
            .map(|window| LabeledWindow { window, label: 7 })
            .collect();
        let data = label_matrix(&samples, len).unwrap();

        prop_assert_eq!(data.x.shape(), [samples.len(), len, STATE_COUNT]);
        for (s, sample) in samples.iter().enumerate() {
            for (i, interval) in sample.window.iter().enumerate() {
                let channels: Vec<f64> = (0..STATE_COUNT).map(|c| data.x.get(s, i, c)).collect();
                #[allow(clippy::cast_precision_loss)]
                let duration = interval.duration as f64;
                prop_assert_eq!(channels.iter().sum::<f64>(), duration);
                prop_assert_eq!(channels.iter().filter(|&&v| v != 0.0).count(), 1);
            }
            prop_assert_eq!(data.y.get(s, 0), 7.0);
        }
    }

    /// Property: interval durations sum to the trace length
    #[test]
    fn prop_vectorize_covers_trace(trace in arb_trace(300)) {
        let total: usize = vectorize(&trace).iter().map(|i| i.duration).sum();
        prop_assert_eq!(total, trace.len());
    }

    // ========================================================================
    // Partition Properties
    // ========================================================================

    /// Property: every trace lands in exactly one side, with floor(len * R) per label in train
    #[test]
    fn prop_partition_is_set_partition(
        data in arb_labeled_traces(),
        ratio in 0.05f64..0.95,
        seed in any::<u64>()
    ) {
        let partition = partition_train_test(&data, ratio, seed).unwrap();
        prop_assert_eq!(partition.train.len() + partition.test.len(), data.trace_count());

        for (label, traces) in data.iter() {
            let train = partition.train.iter().filter(|t| t.label == label).count();
            let test = partition.test.iter().filter(|t| t.label == label).count();
            prop_assert_eq!(train, train_len(traces.len(), ratio));
            prop_assert_eq!(train + test, traces.len());

            let mut expected: Vec<&[u32]> = traces.iter().map(Trace::as_slice).collect();
            let mut got: Vec<&[u32]> = partition.train.iter().chain(&partition.test)
                .filter(|t| t.label == label)
                .map(|t| t.trace.as_slice())
                .collect();
            expected.sort_unstable();
            got.sort_unstable();
            prop_assert_eq!(got, expected);
        }
    }

    // ========================================================================
    // Scaling Properties
    // ========================================================================

    /// Property: scaled values stay within [0, 1] and hit both ends for non-constant data
    #[test]
    fn prop_scaler_bounds(data in proptest::collection::vec(-1e6f64..1e6, 1..100)) {
        let (_, scaled) = MinMaxScaler::fit_transform(&data).unwrap();
        prop_assert!(scaled.iter().all(|&v| (-1e-9..=1.0 + 1e-9).contains(&v)));

        let distinct = data.iter().any(|&v| (v - data[0]).abs() > 0.0);
        if distinct {
            prop_assert!(scaled.iter().any(|&v| v.abs() < 1e-9));
            prop_assert!(scaled.iter().any(|&v| (v - 1.0).abs() < 1e-9));
        }
    }
}
