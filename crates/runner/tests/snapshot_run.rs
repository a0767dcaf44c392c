use std::io::Write;

use chrono::{TimeZone, Utc};
use serde_json::json;

use cyclecount_rules::EvaluatorConfig;
use cyclecount_runner::{RunnerConfig, run};

const WH: &str = "00000000-0000-0000-0000-000000000101";
const BIN_A: &str = "00000000-0000-0000-0000-000000000201";
const BIN_B: &str = "00000000-0000-0000-0000-000000000202";

fn write_snapshot(value: serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    file
}

fn config(file: &tempfile::NamedTempFile) -> RunnerConfig {
    RunnerConfig {
        snapshot_path: file.path().to_path_buf(),
        now: Some(Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap()),
        evaluator: EvaluatorConfig::default(),
    }
}

#[test]
fn evaluates_active_rules_and_skips_zero_rules() {
    let file = write_snapshot(json!({
        "locations": [
            { "id": BIN_A, "warehouse": WH, "accuracy": "80" },
            { "id": BIN_B, "warehouse": WH, "accuracy": "99" }
        ],
        "inventories": [
            { "id": "00000000-0000-0000-0000-000000000301", "date": "2024-06-10T08:00:00Z",
              "locations": [BIN_A, BIN_B], "state": "done" }
        ],
        "rules": [
            { "name": "Accuracy", "rule_type": "accuracy", "accuracy_threshold": "90",
              "warehouses": [WH] },
            { "name": "Paused", "rule_type": "periodic", "active": false, "warehouses": [WH] },
            { "name": "Empty bins", "rule_type": "zero", "warehouses": [WH] }
        ]
    }));

    let proposals = run(&config(&file)).unwrap();

    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].location.to_string(), BIN_A);
}

#[test]
fn invalid_rule_aborts_the_run() {
    let file = write_snapshot(json!({
        "locations": [],
        "rules": [
            { "name": "Broken", "rule_type": "periodic", "counts_per_period": 0 }
        ]
    }));

    let err = run(&config(&file)).unwrap_err();
    assert!(format!("{err:#}").contains("Broken"));
}

#[test]
fn missing_snapshot_file_is_reported() {
    let config = RunnerConfig {
        snapshot_path: "/nonexistent/cycle-count-snapshot.json".into(),
        now: None,
        evaluator: EvaluatorConfig::default(),
    };
    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("reading snapshot"));
}
