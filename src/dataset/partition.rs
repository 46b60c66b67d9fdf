//! Seeded train/test partitioning

use super::{LabeledTrace, LabeledTraces};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Disjoint train and test sides of a labeled dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Training traces, shuffled across labels
    pub train: Vec<LabeledTrace>,
    /// Test traces, shuffled across labels
    pub test: Vec<LabeledTrace>,
}

/// Number of leading items that go to the training side.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn train_len(len: usize, ratio: f64) -> usize {
    ((len as f64) * ratio).floor() as usize
}

pub(crate) fn check_ratio(ratio: f64) -> Result<()> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "train ratio must lie strictly between 0 and 1, got {ratio}"
        )))
    }
}

/// Split each label's traces by `ratio`, then shuffle the pooled sides.
///
/// Per label (in insertion order) the traces are shuffled and the first
/// `floor(len * ratio)` go to train. Stratification holds only at that
/// boundary; the pooled train and test sets are shuffled independently.
/// The same `seed` and input always give the same partition.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless `0 < ratio < 1`.
pub fn partition_train_test(data: &LabeledTraces, ratio: f64, seed: u64) -> Result<Partition> {
    check_ratio(ratio)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut partition = Partition::default();

    for (label, traces) in data.iter() {
        let mut order: Vec<usize> = (0..traces.len()).collect();
        order.shuffle(&mut rng);
        let cut = train_len(traces.len(), ratio);

        for (pos, &i) in order.iter().enumerate() {
            let item = LabeledTrace {
                label,
                trace: traces[i].clone(),
            };
            if pos < cut {
                partition.train.push(item);
            } else {
                partition.test.push(item);
            }
        }
        tracing::debug!(label, train = cut, test = traces.len() - cut, "split label");
    }

    partition.train.shuffle(&mut rng);
    partition.test.shuffle(&mut rng);

    tracing::info!(
        train = partition.train.len(),
        test = partition.test.len(),
        seed,
        "partitioned traces"
    );
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Trace;

    fn sample_data() -> LabeledTraces {
        let mut data = LabeledTraces::new();
        for i in 0..8 {
            data.insert(1, Trace::new(vec![1, i]));
        }
        for i in 0..3 {
            data.insert(2, Trace::new(vec![2, i]));
        }
        data
    }

    #[test]
    fn test_split_sizes_per_label() {
        let partition = partition_train_test(&sample_data(), 0.75, 7).unwrap();
        let count = |side: &[LabeledTrace], label| side.iter().filter(|t| t.label == label).count();

        assert_eq!(count(&partition.train, 1), 6);
        assert_eq!(count(&partition.test, 1), 2);
        assert_eq!(count(&partition.train, 2), 2);
        assert_eq!(count(&partition.test, 2), 1);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = partition_train_test(&sample_data(), 0.5, 99).unwrap();
        let b = partition_train_test(&sample_data(), 0.5, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ratio_bounds() {
        for ratio in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                partition_train_test(&sample_data(), ratio, 0),
                Err(Error::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_pooled_sides_are_not_label_grouped() {
        let mut data = LabeledTraces::new();
        for label in [1, 2, 3] {
            for i in 0..12 {
                data.insert(label, Trace::new(vec![label, i]));
            }
        }
        let partition = partition_train_test(&data, 0.5, 42).unwrap();

        for side in [&partition.train, &partition.test] {
            let labels: Vec<u32> = side.iter().map(|t| t.label).collect();
            let mut grouped = labels.clone();
            grouped.sort_unstable();
            assert_ne!(labels, grouped, "side kept per-label order");

            let label_changes = labels.windows(2).filter(|w| w[0] != w[1]).count();
            assert!(label_changes > 2, "only {label_changes} label changes");
        }
    }

    #[test]
    fn test_train_len_floors() {
        assert_eq!(train_len(3, 0.75), 2);
        assert_eq!(train_len(4, 0.75), 3);
        assert_eq!(train_len(1, 0.5), 0);
    }
}
