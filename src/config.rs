//! Pipeline configuration
//!
//! Every field has a default, so a JSON config file only needs the values
//! it changes:
//!
//! ```rust
//! use taskrecon::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_json_str(r#"{ "interval": { "window_len": 64 } }"#)?;
//! assert_eq!(config.interval.window_len, 64);
//! assert_eq!(config.interval.conv_count, 2);
//! # Ok::<(), taskrecon::Error>(())
//! ```

use crate::model::Hyperparameters;
use crate::window::WindowSpec;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Interval-pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntervalConfig {
    /// Intervals per window
    pub window_len: usize,
    /// Windows taken per trace
    pub conv_count: usize,
    /// Window stride (`None` = window length)
    pub slide: Option<usize>,
    /// Share of each label's traces used for training
    pub train_ratio: f64,
    /// Shuffle seed
    pub seed: u64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            window_len: 5000,
            conv_count: 2,
            slide: None,
            train_ratio: 0.75,
            seed: 42,
        }
    }
}

impl IntervalConfig {
    /// Window geometry for [`crate::dataset::data_prep`].
    #[must_use]
    pub fn window_spec(&self) -> WindowSpec {
        let spec = WindowSpec::new(self.window_len, self.conv_count);
        match self.slide {
            Some(stride) => spec.stride(stride),
            None => spec,
        }
    }
}

/// Regression-pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegressionConfig {
    /// Decimation gap for `uniform_sample_trace`
    pub sample_gap: usize,
    /// First sampled step kept
    pub trim_start: usize,
    /// One past the last sampled step kept
    pub trim_end: usize,
    /// Steps per input window
    pub timesteps: usize,
    /// Extra lead between a window's start and its target, on top of `timesteps`
    pub offset: usize,
    /// Target steps per example
    pub prediction_len: usize,
    /// Leading share of examples used for training
    pub train_ratio: f64,
    /// Hold out a validation share of the training set
    pub validation: bool,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            sample_gap: 5,
            trim_start: 100,
            trim_end: 1_000_000,
            timesteps: 150,
            offset: 10_000,
            prediction_len: 1,
            train_ratio: 0.8,
            validation: true,
        }
    }
}

impl RegressionConfig {
    /// Distance from a window's first step to its first target step.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.offset + self.timesteps
    }
}

/// Complete driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Interval pipeline
    pub interval: IntervalConfig,
    /// Regression pipeline
    pub regression: RegressionConfig,
    /// Model hyperparameters
    pub model: Hyperparameters,
    /// Root directory for per-run artifacts
    pub results_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            interval: IntervalConfig::default(),
            regression: RegressionConfig::default(),
            model: Hyperparameters::default(),
            results_dir: PathBuf::from("./result"),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns a JSON error for malformed input or unknown fields, or
    /// [`Error::InvalidInput`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, otherwise as
    /// [`PipelineConfig::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded pipeline config");
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidInput(msg.to_string()));

        if self.interval.window_len == 0 {
            return invalid("interval.window_len must be at least 1");
        }
        if self.interval.slide == Some(0) {
            return invalid("interval.slide must be at least 1");
        }
        if !(self.interval.train_ratio > 0.0 && self.interval.train_ratio < 1.0) {
            return invalid("interval.train_ratio must lie strictly between 0 and 1");
        }
        if self.regression.sample_gap == 0 {
            return invalid("regression.sample_gap must be at least 1");
        }
        if self.regression.timesteps == 0 || self.regression.prediction_len == 0 {
            return invalid("regression.timesteps and prediction_len must be at least 1");
        }
        if self.regression.trim_start >= self.regression.trim_end {
            return invalid("regression.trim_start must be below trim_end");
        }
        if !(self.regression.train_ratio > 0.0 && self.regression.train_ratio < 1.0) {
            return invalid("regression.train_ratio must lie strictly between 0 and 1");
        }
        self.model.validate()
    }
}

/// Builder for [`PipelineConfig`]
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set interval-pipeline settings
    #[must_use]
    pub fn interval(mut self, interval: IntervalConfig) -> Self {
        self.config.interval = interval;
        self
    }

    /// Set regression-pipeline settings
    #[must_use]
    pub fn regression(mut self, regression: RegressionConfig) -> Self {
        self.config.regression = regression;
        self
    }

    /// Set model hyperparameters
    #[must_use]
    pub fn model(mut self, model: Hyperparameters) -> Self {
        self.config.model = model;
        self
    }

    /// Set the artifact root directory
    #[must_use]
    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.results_dir = dir.into();
        self
    }

    /// Set the partitioning seed
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.interval.seed = seed;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if validation fails
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = PipelineConfig::builder()
            .seed(7)
            .results_dir("/tmp/out")
            .build()
            .unwrap();
        assert_eq!(config.interval.seed, 7);
        assert_eq!(config.results_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_builder_rejects_bad_ratio() {
        let result = PipelineConfig::builder()
            .interval(IntervalConfig {
                train_ratio: 1.0,
                ..IntervalConfig::default()
            })
            .build();
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_json_partial_override() {
        let config = PipelineConfig::from_json_str(
            r#"{ "regression": { "timesteps": 10 }, "model": { "loss": "mean_absolute_error" } }"#,
        )
        .unwrap();
        assert_eq!(config.regression.timesteps, 10);
        assert_eq!(config.regression.sample_gap, 5);
        assert_eq!(config.regression.horizon(), 10_010);
    }

    #[test]
    fn test_json_unknown_field_rejected() {
        let result = PipelineConfig::from_json_str(r#"{ "intervall": {} }"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_window_spec_slide() {
        let interval = IntervalConfig {
            window_len: 4,
            slide: Some(2),
            ..IntervalConfig::default()
        };
        assert_eq!(interval.window_spec(), WindowSpec::new(4, 2).stride(2));
        assert_eq!(IntervalConfig::default().window_spec().stride, 5000);
    }
}
