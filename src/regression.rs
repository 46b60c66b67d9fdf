//! Regression-pipeline dataset assembly
//!
//! For a trace labeled with task size `N`, one branch runs per task value
//! `0..=N`:
//!
//! ```text
//! mask_trace(t) ─> uniform_sample_trace ─> trim ─> regression_trace
//!      ─> regression_examples ─> split_examples
//! ```
//!
//! Branches are independent (run on rayon when the `rayon` feature is on)
//! and are merged in task order: branch `t` becomes channel `t` of the
//! stacked `(samples, timesteps, N + 1)` features.

use crate::config::RegressionConfig;
use crate::dataset::train_len;
use crate::scaling::MinMaxScaler;
use crate::segment::regression_trace;
use crate::tensor::Tensor3;
use crate::trace::{uniform_sample_trace, Trace};
use crate::{Error, Result};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Windowed regression examples for one series.
///
/// Example `i` pairs `x[i..i + timesteps]` with
/// `y[i + horizon..i + horizon + pred_len]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegressionExamples {
    timesteps: usize,
    pred_len: usize,
    inputs: Vec<f64>,
    targets: Vec<f64>,
}

impl RegressionExamples {
    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.timesteps == 0 {
            0
        } else {
            self.inputs.len() / self.timesteps
        }
    }

    /// True if there are no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Input window of example `i`.
    #[must_use]
    pub fn input(&self, i: usize) -> &[f64] {
        &self.inputs[i * self.timesteps..(i + 1) * self.timesteps]
    }

    /// Target steps of example `i`.
    #[must_use]
    pub fn target(&self, i: usize) -> &[f64] {
        &self.targets[i * self.pred_len..(i + 1) * self.pred_len]
    }

    fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            timesteps: self.timesteps,
            pred_len: self.pred_len,
            inputs: self.inputs[range.start * self.timesteps..range.end * self.timesteps].to_vec(),
            targets: self.targets[range.start * self.pred_len..range.end * self.pred_len].to_vec(),
        }
    }
}

/// Slide a stride-1 window over `x` and pair each with future `y` steps.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `x` and `y` differ in length or
/// `timesteps` / `pred_len` is zero.
pub fn regression_examples(
    x: &[f64],
    y: &[f64],
    timesteps: usize,
    horizon: usize,
    pred_len: usize,
) -> Result<RegressionExamples> {
    if x.len() != y.len() {
        return Err(Error::InvalidInput(format!(
            "X has {} steps but Y has {}",
            x.len(),
            y.len()
        )));
    }
    if timesteps == 0 || pred_len == 0 {
        return Err(Error::InvalidInput(
            "timesteps and prediction length must be at least 1".to_string(),
        ));
    }

    let reach = timesteps.max(horizon + pred_len);
    let count = if x.len() >= reach { x.len() - reach + 1 } else { 0 };

    let mut examples = RegressionExamples {
        timesteps,
        pred_len,
        inputs: Vec::with_capacity(count * timesteps),
        targets: Vec::with_capacity(count * pred_len),
    };
    for i in 0..count {
        examples.inputs.extend_from_slice(&x[i..i + timesteps]);
        examples
            .targets
            .extend_from_slice(&y[i + horizon..i + horizon + pred_len]);
    }
    Ok(examples)
}

/// Split examples in time order: the first `floor(n * ratio)` train.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless `0 < ratio < 1`.
pub fn split_examples(
    examples: &RegressionExamples,
    ratio: f64,
) -> Result<(RegressionExamples, RegressionExamples)> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(Error::InvalidInput(format!(
            "train ratio must lie strictly between 0 and 1, got {ratio}"
        )));
    }
    let n = examples.len();
    let cut = crate::dataset::train_len(n, ratio);
    Ok((examples.slice(0..cut), examples.slice(cut..n)))
}

/// Output of one task-value branch.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBranch {
    /// Task value this branch masks
    pub task: u32,
    /// Training examples
    pub train: RegressionExamples,
    /// Test examples
    pub test: RegressionExamples,
    /// Scaler fit on the branch's full X series
    pub x_scaler: MinMaxScaler,
    /// Scaler fit on the branch's full Y series
    pub y_scaler: MinMaxScaler,
}

/// Run the regression chain for one task value.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if sampling and trimming leave nothing to
/// encode, or for invalid settings.
pub fn mask_branch(trace: &Trace, task: u32, cfg: &RegressionConfig) -> Result<MaskBranch> {
    let mask = trace.mask(task);
    let sampled = Trace::new(uniform_sample_trace(cfg.sample_gap, &mask)?);
    let trimmed = sampled.trim(cfg.trim_start, cfg.trim_end);
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!(
            "task {task}: {} sampled steps leave nothing after trimming to [{}, {})",
            sampled.len(),
            cfg.trim_start,
            cfg.trim_end
        )));
    }

    let scaled = regression_trace(trimmed.as_slice())?;
    let examples = regression_examples(
        &scaled.x,
        &scaled.y,
        cfg.timesteps,
        cfg.horizon(),
        cfg.prediction_len,
    )?;
    let (train, test) = split_examples(&examples, cfg.train_ratio)?;
    tracing::debug!(
        task,
        steps = trimmed.len(),
        train = train.len(),
        test = test.len(),
        "built mask branch"
    );

    Ok(MaskBranch {
        task,
        train,
        test,
        x_scaler: scaled.x_scaler,
        y_scaler: scaled.y_scaler,
    })
}

/// Stacked multi-task regression dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionDataset {
    /// `(n, timesteps, tasks)` training inputs
    pub train_x: Tensor3,
    /// `(n, pred_len, tasks)` training targets
    pub train_y: Tensor3,
    /// `(m, timesteps, tasks)` test inputs
    pub test_x: Tensor3,
    /// `(m, pred_len, tasks)` test targets
    pub test_y: Tensor3,
    /// Share of training samples to hold out for validation, if enabled
    pub validation_ratio: Option<f64>,
    /// `(x, y)` scalers per task value, in task order
    pub scalers: Vec<(MinMaxScaler, MinMaxScaler)>,
}

impl RegressionDataset {
    /// Number of stacked task channels.
    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.train_x.shape()[2]
    }

    /// Trailing `validation_ratio` share of the training samples as `(x, y)`.
    ///
    /// `None` when validation is disabled or the share holds no samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the stacked tensors are inconsistent.
    pub fn validation_split(&self) -> Result<Option<(Tensor3, Tensor3)>> {
        let Some(ratio) = self.validation_ratio else {
            return Ok(None);
        };
        let total = self.train_x.samples();
        let count = train_len(total, ratio);
        if count == 0 {
            return Ok(None);
        }

        let tail = |t: &Tensor3| {
            let [_, steps, channels] = t.shape();
            let data = (total - count..total).flat_map(|s| t.sample(s).iter().copied()).collect();
            Tensor3::from_vec([count, steps, channels], data)
        };
        Ok(Some((tail(&self.train_x)?, tail(&self.train_y)?)))
    }
}

/// Validation share aligned to whole `batch_size * timesteps` blocks.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn validation_ratio(total: usize, batch_size: usize, timesteps: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let validation_len = total * 0.1;
    let block = (batch_size * timesteps) as f64;
    (validation_len - validation_len % block) / total
}

fn stack(side: &[&RegressionExamples], batch_size: usize) -> Result<(Tensor3, Tensor3)> {
    let first = side[0];
    for (index, branch) in side.iter().enumerate() {
        if branch.len() != first.len() {
            return Err(Error::InconsistentWindowShape {
                expected: first.len(),
                found: branch.len(),
                index,
            });
        }
    }

    let tasks = side.len();
    let n = first.len() - first.len() % batch_size;
    let mut x = Tensor3::zeros(n, first.timesteps, tasks);
    let mut y = Tensor3::zeros(n, first.pred_len, tasks);
    for (k, branch) in side.iter().enumerate() {
        for s in 0..n {
            for (t, &v) in branch.input(s).iter().enumerate() {
                x.set(s, t, k, v);
            }
            for (t, &v) in branch.target(s).iter().enumerate() {
                y.set(s, t, k, v);
            }
        }
    }
    Ok((x, y))
}

/// Build the stacked dataset for a trace labeled with task size `label`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a zero batch size, a `label` above
/// the largest task value in the trace, or an empty branch, and
/// [`Error::InconsistentWindowShape`] if branches disagree on example counts.
pub fn build_regression_dataset(
    trace: &Trace,
    label: u32,
    cfg: &RegressionConfig,
    batch_size: usize,
) -> Result<RegressionDataset> {
    if batch_size == 0 {
        return Err(Error::InvalidInput("batch size must be at least 1".to_string()));
    }
    let max_task = trace.max_task();
    if label > max_task {
        return Err(Error::InvalidInput(format!(
            "label {label} exceeds the largest task value {max_task} in the trace"
        )));
    }

    let tasks: Vec<u32> = (0..=label).collect();
    #[cfg(feature = "rayon")]
    let branches: Vec<MaskBranch> = tasks
        .par_iter()
        .map(|&t| mask_branch(trace, t, cfg))
        .collect::<Result<_>>()?;
    #[cfg(not(feature = "rayon"))]
    let branches: Vec<MaskBranch> = tasks
        .iter()
        .map(|&t| mask_branch(trace, t, cfg))
        .collect::<Result<_>>()?;

    let train: Vec<&RegressionExamples> = branches.iter().map(|b| &b.train).collect();
    let test: Vec<&RegressionExamples> = branches.iter().map(|b| &b.test).collect();
    let (train_x, train_y) = stack(&train, batch_size)?;
    let (test_x, test_y) = stack(&test, batch_size)?;

    let validation_ratio = cfg
        .validation
        .then(|| validation_ratio(train_x.samples(), batch_size, cfg.timesteps));

    tracing::info!(
        label,
        tasks = branches.len(),
        train = train_x.samples(),
        test = test_x.samples(),
        "assembled regression dataset"
    );

    Ok(RegressionDataset {
        train_x,
        train_y,
        test_x,
        test_y,
        validation_ratio,
        scalers: branches
            .into_iter()
            .map(|b| (b.x_scaler, b.y_scaler))
            .collect(),
    })
}
