//! Classification reports
//!
//! Predictions are rounded to the nearest class and clamped into range
//! before counting. The written JSON has sorted keys and four-space
//! indentation:
//!
//! ```text
//! {
//!     "accuracy": 0.5,
//!     "matrix": { "0": [1.0, 1.0], "1": [0.0, 2.0] },
//!     "normalized_matrix": { "0": [0.5, 0.5], "1": [0.0, 1.0] }
//! }
//! ```

use crate::dataset::Label;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Render `value` as JSON indented by four spaces.
///
/// Map keys come out in the order the value serializes them, so types that
/// need sorted keys hold a `BTreeMap`.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::Other(e.to_string()))
}

/// Write [`to_json_pretty`] output to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an IO or JSON error if the file cannot be written.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json_pretty(value)?)?;
    Ok(())
}

/// Nearest class for a real-valued prediction, clamped to `0..class_count`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn classify(prediction: f64, class_count: usize) -> Label {
    let top = class_count.saturating_sub(1) as f64;
    let class = if prediction.is_nan() {
        0.0
    } else {
        prediction.round().clamp(0.0, top)
    };
    class as Label
}

/// Counts of (true class, predicted class) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Count paired true and predicted classes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the slices differ in length or a
    /// class falls outside `0..class_count`.
    pub fn from_labels(truth: &[Label], predicted: &[Label], class_count: usize) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(Error::InvalidInput(format!(
                "{} true labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }

        let mut counts = vec![vec![0; class_count]; class_count];
        for (&t, &p) in truth.iter().zip(predicted) {
            let (t, p) = (t as usize, p as usize);
            if t >= class_count || p >= class_count {
                return Err(Error::InvalidInput(format!(
                    "class pair ({t}, {p}) outside 0..{class_count}"
                )));
            }
            counts[t][p] += 1;
        }
        Ok(Self { counts })
    }

    /// Number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.counts.len()
    }

    /// Count of samples of class `truth` predicted as `predicted`.
    #[must_use]
    pub fn count(&self, truth: usize, predicted: usize) -> u64 {
        self.counts[truth][predicted]
    }

    /// Fraction of samples on the diagonal (`0.0` when empty).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        let total: u64 = self.counts.iter().flatten().sum();
        if total == 0 {
            return 0.0;
        }
        let hits: u64 = (0..self.class_count()).map(|i| self.counts[i][i]).sum();
        hits as f64 / total as f64
    }

    /// Counts as floats, keyed by true class.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn matrix(&self) -> BTreeMap<Label, Vec<f64>> {
        self.rows()
            .map(|(label, row)| (label, row.iter().map(|&c| c as f64).collect()))
            .collect()
    }

    /// Rows scaled to sum to 1; rows with no samples stay zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalized_matrix(&self) -> BTreeMap<Label, Vec<f64>> {
        self.rows()
            .map(|(label, row)| {
                let total: u64 = row.iter().sum();
                let normalized = row
                    .iter()
                    .map(|&c| if total == 0 { 0.0 } else { c as f64 / total as f64 })
                    .collect();
                (label, normalized)
            })
            .collect()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn rows(&self) -> impl Iterator<Item = (Label, &Vec<u64>)> {
        self.counts.iter().enumerate().map(|(i, row)| (i as Label, row))
    }
}

/// Result document written after evaluating a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Overall accuracy
    pub accuracy: f64,
    /// Raw confusion counts per true class
    pub matrix: BTreeMap<Label, Vec<f64>>,
    /// Row-normalized confusion per true class
    pub normalized_matrix: BTreeMap<Label, Vec<f64>>,
}

impl From<&ConfusionMatrix> for EvaluationReport {
    fn from(confusion: &ConfusionMatrix) -> Self {
        Self {
            accuracy: confusion.accuracy(),
            matrix: confusion.matrix(),
            normalized_matrix: confusion.normalized_matrix(),
        }
    }
}

impl EvaluationReport {
    /// Render as four-space-indented JSON with sorted keys.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        to_json_pretty(self)
    }

    /// Write the report to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an IO or JSON error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_pretty(path, self)?;
        tracing::info!(path = %path.display(), accuracy = self.accuracy, "wrote evaluation report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rounds_and_clamps() {
        assert_eq!(classify(1.4, 4), 1);
        assert_eq!(classify(1.6, 4), 2);
        assert_eq!(classify(-3.0, 4), 0);
        assert_eq!(classify(9.0, 4), 3);
        assert_eq!(classify(f64::NAN, 4), 0);
    }

    #[test]
    fn test_confusion_counts_and_accuracy() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 1, 1, 1], 2).unwrap();
        assert_eq!(cm.count(0, 1), 1);
        assert_eq!(cm.count(1, 1), 2);
        assert!((cm.accuracy() - 0.75).abs() < 1e-12);
        assert_eq!(cm.normalized_matrix()[&0], vec![0.5, 0.5]);
    }

    #[test]
    fn test_empty_row_normalizes_to_zero() {
        let cm = ConfusionMatrix::from_labels(&[0], &[0], 3).unwrap();
        assert_eq!(cm.normalized_matrix()[&2], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_confusion_rejects_out_of_range() {
        assert!(ConfusionMatrix::from_labels(&[5], &[0], 2).is_err());
        assert!(ConfusionMatrix::from_labels(&[0, 1], &[0], 2).is_err());
    }

    #[test]
    fn test_report_json_layout() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 0], 2).unwrap();
        let json = EvaluationReport::from(&cm).to_json_pretty().unwrap();

        assert!(json.starts_with("{\n    \"accuracy\": 0.5,\n    \"matrix\": {\n        \"0\": ["));
        let accuracy = json.find("\"accuracy\"").unwrap();
        let matrix = json.find("\"matrix\"").unwrap();
        let normalized = json.find("\"normalized_matrix\"").unwrap();
        assert!(accuracy < matrix && matrix < normalized);

        let back: EvaluationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.matrix[&1], vec![1.0, 0.0]);
    }

    #[test]
    fn test_to_json_pretty_four_space_indent() {
        let value: BTreeMap<&str, Vec<u32>> = [("b", vec![1]), ("a", vec![])].into_iter().collect();
        let json = to_json_pretty(&value).unwrap();
        assert_eq!(json, "{\n    \"a\": [],\n    \"b\": [\n        1\n    ]\n}");
    }
}
