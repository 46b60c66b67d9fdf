//! Mean-of-targets baseline

use super::{Hyperparameters, Predictor, Trainer};
use crate::tensor::{Matrix, Tensor3};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Predicts the training mean of every output column, whatever the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanBaseline {
    steps: usize,
    channels: usize,
    means: Vec<f64>,
}

impl MeanBaseline {
    /// Per-output training means.
    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }
}

impl Predictor for MeanBaseline {
    fn predict(&self, x: &Tensor3) -> Result<Matrix> {
        let [samples, steps, channels] = x.shape();
        if (steps, channels) != (self.steps, self.channels) && samples > 0 {
            return Err(Error::ModelError(format!(
                "model expects samples of ({}, {}), got ({steps}, {channels})",
                self.steps, self.channels
            )));
        }

        let data = (0..samples).flat_map(|_| self.means.iter().copied()).collect();
        Matrix::from_vec(samples, self.means.len(), data)
    }
}

/// Trainer for [`MeanBaseline`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanBaselineTrainer;

impl Trainer for MeanBaselineTrainer {
    type Model = MeanBaseline;

    #[allow(clippy::cast_precision_loss)]
    fn fit(&self, x: &Tensor3, y: &Matrix, hp: &Hyperparameters) -> Result<MeanBaseline> {
        hp.validate()?;
        let (rows, cols) = y.shape();
        if rows == 0 {
            return Err(Error::ModelError("no training samples".to_string()));
        }
        if x.samples() != rows {
            return Err(Error::ModelError(format!(
                "{} feature samples but {rows} target rows",
                x.samples()
            )));
        }

        let mut means = vec![0.0; cols];
        for r in 0..rows {
            for (c, mean) in means.iter_mut().enumerate() {
                *mean += y.get(r, c);
            }
        }
        for mean in &mut means {
            *mean /= rows as f64;
        }

        let [_, steps, channels] = x.shape();
        tracing::info!(samples = rows, outputs = cols, "fitted mean baseline");
        Ok(MeanBaseline {
            steps,
            channels,
            means,
        })
    }
}
