//! Model seam
//!
//! Network construction and training are delegated: the pipelines hand a
//! [`Trainer`] a feature tensor, a target matrix and [`Hyperparameters`],
//! and get back a [`Predictor`] that can be evaluated and persisted.
//!
//! [`MeanBaseline`] is the in-tree trainer. It predicts the per-output
//! training mean and exists to exercise the seam end to end.

mod artifact;
mod baseline;

pub use artifact::{load_model, save_model, train_or_load, ArtifactPaths, TrainOutcome};
pub use baseline::{MeanBaseline, MeanBaselineTrainer};

use crate::tensor::{Matrix, Tensor3};
use crate::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Loss function identifier passed to trainers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFunction {
    /// Mean of squared errors
    #[default]
    MeanSquaredError,
    /// Mean of absolute errors
    MeanAbsoluteError,
}

impl LossFunction {
    /// Loss between `predicted` and `target`, averaged over all elements.
    ///
    /// Returns `0.0` for empty inputs.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(self, predicted: &[f64], target: &[f64]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        let total: f64 = predicted
            .iter()
            .zip(target)
            .map(|(p, t)| match self {
                Self::MeanSquaredError => (p - t).powi(2),
                Self::MeanAbsoluteError => (p - t).abs(),
            })
            .sum();
        total / predicted.len() as f64
    }
}

/// Named training knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Hyperparameters {
    /// Recurrent cell width
    pub cell_size: usize,
    /// Stacked layer count
    pub layers: usize,
    /// Training epochs
    pub epochs: usize,
    /// Samples per batch
    pub batch_size: usize,
    /// Loss function
    pub loss: LossFunction,
    /// Task value the regression model is specialised on
    pub target_task: u32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            cell_size: 64,
            layers: 4,
            epochs: 48,
            batch_size: 100,
            loss: LossFunction::MeanSquaredError,
            target_task: 3,
        }
    }
}

impl Hyperparameters {
    /// Reject values no trainer can honour.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any count is zero.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("cell_size", self.cell_size),
            ("layers", self.layers),
            ("epochs", self.epochs),
            ("batch_size", self.batch_size),
        ] {
            if value == 0 {
                return Err(Error::InvalidInput(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

/// Scalar scores of a predictor on one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Loss under the configured loss function
    pub loss: f64,
    /// Fraction of outputs whose rounded prediction equals the rounded target
    pub accuracy: f64,
}

/// A trained model.
pub trait Predictor {
    /// Predict one row of outputs per sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelError`] if `x` does not match what the model
    /// was trained on.
    fn predict(&self, x: &Tensor3) -> Result<Matrix>;

    /// Score predictions on `x` against `y`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelError`] if prediction fails or the shapes of
    /// the predictions and `y` differ.
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, x: &Tensor3, y: &Matrix, loss: LossFunction) -> Result<Evaluation> {
        let predicted = self.predict(x)?;
        if predicted.shape() != y.shape() {
            return Err(Error::ModelError(format!(
                "prediction shape {:?} does not match target shape {:?}",
                predicted.shape(),
                y.shape()
            )));
        }

        let (p, t) = (predicted.as_slice(), y.as_slice());
        let hits = p
            .iter()
            .zip(t)
            .filter(|(a, b)| (a.round() - b.round()).abs() < f64::EPSILON)
            .count();
        let accuracy = if p.is_empty() {
            0.0
        } else {
            hits as f64 / p.len() as f64
        };

        Ok(Evaluation {
            loss: loss.compute(p, t),
            accuracy,
        })
    }
}

/// Produces predictors from training data.
pub trait Trainer {
    /// Model type produced; persisted as JSON.
    type Model: Predictor + Serialize + DeserializeOwned;

    /// Fit a model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelError`] if the data cannot be trained on, or
    /// [`Error::InvalidInput`] for unusable hyperparameters.
    fn fit(&self, x: &Tensor3, y: &Matrix, hp: &Hyperparameters) -> Result<Self::Model>;
}
