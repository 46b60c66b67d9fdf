//! End-to-end pipeline drivers
//!
//! The binary is a thin shell over these two functions, so the full flows
//! (including per-file failure handling) are testable from `tests/`.

use crate::config::PipelineConfig;
use crate::dataset::{data_prep, partition_train_test, Label};
use crate::experiment::{ExperimentStore, MetricRecord, RunRecord, RunStatus, Split};
use crate::model::{train_or_load, ArtifactPaths, Evaluation, Predictor, TrainOutcome, Trainer};
use crate::regression::build_regression_dataset;
use crate::report::{classify, write_json_pretty, ConfusionMatrix, EvaluationReport};
use crate::trace::loader::{list_trace_files, load_labeled_dir, read_regression_trace, LabelFilename};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Outcome of [`run_interval`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSummary {
    /// Training windows
    pub train_windows: usize,
    /// Test windows
    pub test_windows: usize,
    /// Confusion-matrix report over the test windows
    pub report: EvaluationReport,
}

/// Per-run scores written to the stats path next to the model artifact.
#[derive(Debug, Serialize)]
struct RunStats<'a> {
    run_id: &'a str,
    label: Label,
    outcome: TrainOutcome,
    validation_ratio: Option<f64>,
    train: Evaluation,
    validation: Option<Evaluation>,
    test: Evaluation,
}

/// Partition, window, fit and score the labeled traces in `data_dir`.
///
/// # Errors
///
/// Returns IO/parse errors from loading, [`Error::InvalidInput`] for an
/// empty directory or no training windows, and trainer errors.
pub fn run_interval<T: Trainer>(
    trainer: &T,
    config: &PipelineConfig,
    data_dir: &Path,
) -> Result<IntervalSummary> {
    let cfg = &config.interval;
    let data = load_labeled_dir(data_dir)?;
    if data.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no traces in {}",
            data_dir.display()
        )));
    }

    let partition = partition_train_test(&data, cfg.train_ratio, cfg.seed)?;
    let spec = cfg.window_spec();
    let train = data_prep(&partition.train, spec)?;
    let test = data_prep(&partition.test, spec)?;
    if train.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no training windows of length {}",
            spec.len
        )));
    }

    let model = trainer.fit(&train.x, &train.y, &config.model)?;
    let predicted = model.predict(&test.x)?;

    let class_count = data.labels().max().map_or(0, |max| max as usize + 1);
    let truth: Vec<Label> = (0..test.len())
        .map(|r| classify(test.y.get(r, 0), class_count))
        .collect();
    let guesses: Vec<Label> = (0..test.len())
        .map(|r| classify(predicted.get(r, 0), class_count))
        .collect();
    let confusion = ConfusionMatrix::from_labels(&truth, &guesses, class_count)?;

    tracing::info!(
        train = train.len(),
        test = test.len(),
        accuracy = confusion.accuracy(),
        "interval pipeline finished"
    );
    Ok(IntervalSummary {
        train_windows: train.len(),
        test_windows: test.len(),
        report: EvaluationReport::from(&confusion),
    })
}

/// Run the regression pipeline on every `*.data` file in `data_dir`.
///
/// Each file becomes one run in the returned ledger. A file that fails
/// (bad name, unreadable content, unusable geometry) is recorded as
/// [`RunStatus::Failed`] with its error and the remaining files still run.
///
/// # Errors
///
/// Returns an IO error only if `data_dir` cannot be listed.
pub fn run_regression<T: Trainer>(
    trainer: &T,
    config: &PipelineConfig,
    data_dir: &Path,
) -> Result<ExperimentStore> {
    let files = list_trace_files(data_dir, Some("data"))?;
    if files.is_empty() {
        tracing::warn!(dir = %data_dir.display(), "no *.data files");
    }

    let mut store = ExperimentStore::new();
    for path in &files {
        let run_id = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        let labels = LabelFilename::parse(path);
        let mut builder = RunRecord::builder(&run_id, path);
        if let Ok(labels) = &labels {
            builder = builder.label(labels.size).rep(labels.rep);
        }
        let mut run = builder.build();
        run.start();

        let result = labels
            .and_then(|labels| regression_run(trainer, config, path, labels, &run_id, &mut store));
        match result {
            Ok(TrainOutcome::Trained) => run.complete(RunStatus::Trained),
            Ok(TrainOutcome::Loaded) => run.complete(RunStatus::Loaded),
            Err(err) => {
                tracing::error!(run = %run_id, error = %err, "run failed");
                run.fail(err.to_string());
            }
        }
        store.add_run(run);
    }

    tracing::info!(
        runs = store.run_count(),
        failed = store.count_with_status(RunStatus::Failed),
        "regression pipeline finished"
    );
    Ok(store)
}

fn regression_run<T: Trainer>(
    trainer: &T,
    config: &PipelineConfig,
    path: &Path,
    labels: LabelFilename,
    run_id: &str,
    store: &mut ExperimentStore,
) -> Result<TrainOutcome> {
    let trace = read_regression_trace(path)?;
    let hp = &config.model;
    let dataset = build_regression_dataset(&trace, labels.size, &config.regression, hp.batch_size)?;

    let paths = ArtifactPaths::new(&config.results_dir, labels, hp, &config.regression);
    let train_y = dataset.train_y.to_rows();
    let (model, outcome) = train_or_load(trainer, &paths.model, &dataset.train_x, &train_y, hp)?;

    let train = model.evaluate(&dataset.train_x, &train_y, hp.loss)?;
    let test = model.evaluate(&dataset.test_x, &dataset.test_y.to_rows(), hp.loss)?;
    let validation = match dataset.validation_split()? {
        Some((x, y)) => Some(model.evaluate(&x, &y.to_rows(), hp.loss)?),
        None => None,
    };

    let scores = [
        (Split::Train, Some(train)),
        (Split::Validation, validation),
        (Split::Test, Some(test)),
    ];
    for (split, eval) in scores {
        if let Some(eval) = eval {
            store.add_metric(MetricRecord::new(run_id, split, "loss", 0, eval.loss));
            store.add_metric(MetricRecord::new(run_id, split, "accuracy", 0, eval.accuracy));
        }
    }

    write_json_pretty(
        &paths.stats,
        &RunStats {
            run_id,
            label: labels.size,
            outcome,
            validation_ratio: dataset.validation_ratio,
            train,
            validation,
            test,
        },
    )?;
    Ok(outcome)
}
