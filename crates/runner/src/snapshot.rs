//! On-disk snapshot format.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use cyclecount_rules::{InMemorySnapshot, RuleDraft};

/// Snapshot file: locations, count history and movements, plus the rule
/// drafts to validate and evaluate.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotFile {
    #[serde(flatten)]
    pub data: InMemorySnapshot,
    #[serde(default)]
    pub rules: Vec<RuleDraft>,
}

impl SnapshotFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }
}
