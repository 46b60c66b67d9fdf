//! taskrecon driver
//!
//! `interval` trains and scores a classifier over a directory of labeled
//! interval traces. `regression` builds the multi-task regression dataset for
//! every `*.data` file, then trains or reuses a model per file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use taskrecon::config::PipelineConfig;
use taskrecon::experiment::{RunStatus, Split};
use taskrecon::model::MeanBaselineTrainer;
use taskrecon::pipeline;
use tracing_subscriber::EnvFilter;

/// Task-structure recognition from execution traces.
#[derive(Parser)]
#[command(name = "taskrecon", version, about = "Task-structure recognition from execution traces")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify workload size from busy/rest interval windows.
    Interval(IntervalArgs),
    /// Build per-task transition regression datasets and train on them.
    Regression(RegressionArgs),
}

#[derive(Args)]
struct IntervalArgs {
    /// Directory of `size<N>rep<M>.<ext>` interval traces.
    #[arg(long)]
    data_dir: PathBuf,

    /// JSON pipeline configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Partitioning seed (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Path to write the evaluation report JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct RegressionArgs {
    /// Directory of `size<N>rep<M>.data` traces.
    #[arg(long)]
    data_dir: PathBuf,

    /// JSON pipeline configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory for model artifacts (overrides the config file).
    #[arg(long)]
    results_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Interval(args) => run_interval(&args),
        Command::Regression(args) => run_regression(&args),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn run_interval(args: &IntervalArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.interval.seed = seed;
    }

    let summary = pipeline::run_interval(&MeanBaselineTrainer, &config, &args.data_dir)
        .with_context(|| format!("interval pipeline failed on {}", args.data_dir.display()))?;

    println!(
        "interval: {} train / {} test windows, accuracy {:.4}",
        summary.train_windows, summary.test_windows, summary.report.accuracy
    );
    if let Some(path) = &args.report {
        summary
            .report
            .save(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }
    Ok(())
}

fn run_regression(args: &RegressionArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = &args.results_dir {
        config.results_dir.clone_from(dir);
    }

    let store = pipeline::run_regression(&MeanBaselineTrainer, &config, &args.data_dir)
        .with_context(|| format!("failed to list {}", args.data_dir.display()))?;
    anyhow::ensure!(store.run_count() > 0, "no *.data files in {}", args.data_dir.display());

    for run in store.runs() {
        let accuracy = store.mean_score(run.run_id(), Split::Test, "accuracy");
        println!(
            "{:<24} {:?}{}",
            run.run_id(),
            run.status(),
            accuracy.map_or_else(String::new, |a| format!("  test accuracy {a:.4}"))
        );
    }
    if let Some(mean) = store.overall_mean(Split::Test, "accuracy") {
        println!("mean test accuracy over {} runs: {mean:.4}", store.run_count());
    }

    let ledger = config.results_dir.join("ledger.json");
    store
        .save(&ledger)
        .with_context(|| format!("failed to write ledger {}", ledger.display()))?;

    let failed = store.count_with_status(RunStatus::Failed);
    anyhow::ensure!(failed == 0, "{failed} of {} runs failed", store.run_count());
    Ok(())
}
