//! Model artifact paths and persistence
//!
//! A run's outputs live under `<results>/<label>_<rep>/`. The model file name
//! encodes the hyperparameters, so an existing file means "already trained
//! with these settings": the driver loads it instead of training again.

use super::{Hyperparameters, Trainer};
use crate::config::RegressionConfig;
use crate::tensor::{Matrix, Tensor3};
use crate::trace::loader::LabelFilename;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `<results>/<label>_<rep>/`
    pub result_dir: PathBuf,
    /// `<cell>_<layers>_<epochs>_<batch>_t<timesteps>_<offset>_<target>.model`
    pub model: PathBuf,
    /// `<cell>_<layers>_<epochs>_<batch>_<pred_len>_<offset>_<target>.json`
    pub stats: PathBuf,
}

impl ArtifactPaths {
    /// Derive the artifact paths of a run.
    #[must_use]
    pub fn new(
        results_root: &Path,
        labels: LabelFilename,
        hp: &Hyperparameters,
        regression: &RegressionConfig,
    ) -> Self {
        let result_dir = results_root.join(format!("{}_{}", labels.size, labels.rep));
        let prefix = format!(
            "{}_{}_{}_{}",
            hp.cell_size, hp.layers, hp.epochs, hp.batch_size
        );
        let model = result_dir.join(format!(
            "{prefix}_t{}_{}_{}.model",
            regression.timesteps, regression.offset, hp.target_task
        ));
        let stats = result_dir.join(format!(
            "{prefix}_{}_{}_{}.json",
            regression.prediction_len, regression.offset, hp.target_task
        ));
        Self {
            result_dir,
            model,
            stats,
        }
    }
}

/// Whether [`train_or_load`] trained a fresh model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainOutcome {
    /// Model was fitted and saved
    Trained,
    /// Existing artifact was loaded
    Loaded,
}

/// Write a model as JSON, creating parent directories.
///
/// # Errors
///
/// Returns an IO or JSON error if the file cannot be written.
pub fn save_model<M: Serialize>(model: &M, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(model)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "saved model");
    Ok(())
}

/// Read a model written by [`save_model`].
///
/// # Errors
///
/// Returns an IO or JSON error if the file cannot be read or decoded.
pub fn load_model<M: DeserializeOwned>(path: &Path) -> Result<M> {
    let json = fs::read_to_string(path)?;
    let model = serde_json::from_str(&json)?;
    tracing::debug!(path = %path.display(), "loaded model");
    Ok(model)
}

/// Load the model at `path` if it exists, otherwise fit and save one.
///
/// # Errors
///
/// Propagates trainer, IO and JSON errors.
pub fn train_or_load<T: Trainer>(
    trainer: &T,
    path: &Path,
    x: &Tensor3,
    y: &Matrix,
    hp: &Hyperparameters,
) -> Result<(T::Model, TrainOutcome)> {
    if path.is_file() {
        tracing::info!(path = %path.display(), "model artifact exists, skipping training");
        return Ok((load_model(path)?, TrainOutcome::Loaded));
    }

    let model = trainer.fit(x, y, hp)?;
    save_model(&model, path)?;
    tracing::info!(path = %path.display(), "trained and saved model");
    Ok((model, TrainOutcome::Trained))
}
