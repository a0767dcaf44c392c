//! `cyclecount-runner` — evaluate every active rule in a JSON snapshot.
//!
//! Stands in for the external scheduler during development: it loads data,
//! validates rules through the registry and prints proposals. Nothing is
//! persisted.

pub mod config;
pub mod snapshot;

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use cyclecount_rules::{
    CycleCountError, EvaluatorConfig, FixedClock, InMemoryRuleRepository, InMemorySnapshot,
    LocationRepository, Location, Proposal, RuleEvaluator, RuleRegistry, RuleRepository,
};

pub use config::RunnerConfig;
pub use snapshot::SnapshotFile;

/// Load the configured snapshot and evaluate it.
pub fn run(config: &RunnerConfig) -> anyhow::Result<Vec<Proposal>> {
    let file = SnapshotFile::load(&config.snapshot_path)?;
    let now = config.now.unwrap_or_else(Utc::now);
    evaluate_snapshot(file, now, config.evaluator.clone())
}

/// Register the snapshot's rules, then evaluate each active one over the
/// locations in its scope.
///
/// Zero-confirmation rules are skipped; any other failure aborts the run.
pub fn evaluate_snapshot(
    file: SnapshotFile,
    now: DateTime<Utc>,
    evaluator_config: EvaluatorConfig,
) -> anyhow::Result<Vec<Proposal>> {
    let data: Arc<InMemorySnapshot> = Arc::new(file.data);
    let registry = RuleRegistry::new(InMemoryRuleRepository::new(), data.clone());

    for draft in file.rules {
        let name = draft.name.clone();
        registry
            .create(draft)
            .with_context(|| format!("rule {name:?} rejected"))?;
    }

    let evaluator = RuleEvaluator::new(data.clone(), data.clone())
        .with_clock(FixedClock(now))
        .with_config(evaluator_config);
    let locations = LocationRepository::list(&*data)?;

    let mut proposals = Vec::new();
    for rule in RuleRepository::list(registry.rules())? {
        if !rule.is_active() {
            debug!(rule = %rule.id_typed(), "inactive rule skipped");
            continue;
        }

        let targets: Vec<Location> = locations
            .iter()
            .filter(|l| rule.applies_to(l))
            .cloned()
            .collect();

        match evaluator.evaluate(&rule, &targets) {
            Ok(found) => proposals.extend(found),
            Err(CycleCountError::Unsupported { rule: id, rule_type }) => {
                info!(rule = %id, %rule_type, "no automated evaluation for rule type; skipped");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("evaluating rule {:?}", rule.name()));
            }
        }
    }

    info!(proposals = proposals.len(), evaluated_at = %now, "snapshot evaluated");
    Ok(proposals)
}
