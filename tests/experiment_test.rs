//! Run ledger tests

use taskrecon::experiment::{ExperimentStore, MetricRecord, RunRecord, RunStatus, Split};

fn finished_run(id: &str, label: u32, status: RunStatus) -> RunRecord {
    let mut run = RunRecord::builder(id, format!("data/{id}.data"))
        .label(label)
        .rep(0)
        .build();
    run.start();
    run.complete(status);
    run
}

#[test]
fn test_ledger_summary_over_runs() {
    let mut store = ExperimentStore::new();
    store.add_run(finished_run("size2rep0", 2, RunStatus::Trained));
    store.add_run(finished_run("size4rep0", 4, RunStatus::Loaded));

    let mut failed = RunRecord::new("size8rep0", "data/size8rep0.data");
    failed.start();
    failed.fail("trace is empty after trimming");
    store.add_run(failed);

    for (step, value) in [0.25, 0.75].into_iter().enumerate() {
        store.add_metric(MetricRecord::new("size2rep0", Split::Test, "accuracy", step as u64, value));
    }
    store.add_metric(MetricRecord::new("size4rep0", Split::Test, "accuracy", 0, 1.0));
    store.add_metric(MetricRecord::new("size4rep0", Split::Train, "accuracy", 0, 0.0));

    assert_eq!(store.run_count(), 3);
    assert_eq!(store.metric_count(), 4);
    assert_eq!(store.count_with_status(RunStatus::Failed), 1);
    assert!(store.runs().iter().all(|r| r.status().is_finished()));

    assert_eq!(store.mean_score("size2rep0", Split::Test, "accuracy"), Some(0.5));
    assert_eq!(store.overall_mean(Split::Test, "accuracy"), Some(0.75));
    assert_eq!(store.overall_mean(Split::Validation, "accuracy"), None);
}

#[test]
fn test_status_update_through_store() {
    let mut store = ExperimentStore::new();
    store.add_run(RunRecord::new("r", "r.data"));

    let run = store.get_run_mut("r").unwrap();
    run.start();
    run.complete(RunStatus::Trained);

    let run = store.get_run("r").unwrap();
    assert_eq!(run.status(), RunStatus::Trained);
    assert!(run.started_at().unwrap() <= run.ended_at().unwrap());
    assert!(store.get_run("missing").is_none());
}

#[test]
fn test_ledger_saves_as_json() {
    let dir = std::env::temp_dir().join("taskrecon_ledger_test");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("ledger.json");

    let mut store = ExperimentStore::new();
    store.add_run(finished_run("size3rep1", 3, RunStatus::Trained));
    store.add_metric(MetricRecord::new("size3rep1", Split::Test, "loss", 0, 0.125));
    store.save(&path).unwrap();

    let back: ExperimentStore = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, store);
    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"status\": \"Trained\""));
    assert!(json.contains("\"split\": \"test\""));

    std::fs::remove_dir_all(&dir).unwrap();
}
