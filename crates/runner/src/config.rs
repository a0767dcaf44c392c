//! Runner configuration, read from the environment.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use tracing::warn;

use cyclecount_rules::EvaluatorConfig;

pub const SNAPSHOT_ENV: &str = "CYCLE_COUNT_SNAPSHOT";
pub const NOW_ENV: &str = "CYCLE_COUNT_NOW";
pub const STATES_ENV: &str = "CYCLE_COUNT_STATES";

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// JSON snapshot to evaluate.
    pub snapshot_path: PathBuf,
    /// Evaluation time override; wall clock when unset.
    pub now: Option<DateTime<Utc>>,
    pub evaluator: EvaluatorConfig,
}

impl RunnerConfig {
    /// Build from the process arguments and environment.
    ///
    /// The first CLI argument wins over `CYCLE_COUNT_SNAPSHOT`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let Some(snapshot_path) = arg.or_else(|| lookup(SNAPSHOT_ENV)) else {
            bail!("no snapshot given; pass a path or set {SNAPSHOT_ENV}");
        };

        let now = match lookup(NOW_ENV) {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw.trim())
                    .with_context(|| format!("{NOW_ENV} is not an RFC 3339 timestamp: {raw:?}"))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        let evaluator = match lookup(STATES_ENV) {
            Some(raw) => EvaluatorConfig::default()
                .with_states_list(&raw)
                .with_context(|| format!("invalid {STATES_ENV}"))?,
            None => {
                warn!("{STATES_ENV} not set; counting draft, confirm and done inventories");
                EvaluatorConfig::default()
            }
        };

        Ok(Self {
            snapshot_path: PathBuf::from(snapshot_path),
            now,
            evaluator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use cyclecount_rules::InventoryState;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn argument_takes_precedence_over_environment() {
        let config = RunnerConfig::from_lookup(
            Some("cli.json".to_string()),
            env(&[(SNAPSHOT_ENV, "env.json")]),
        )
        .unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("cli.json"));
        assert_eq!(config.now, None);
        assert_eq!(config.evaluator, EvaluatorConfig::default());
    }

    #[test]
    fn reads_overrides_from_environment() {
        let config = RunnerConfig::from_lookup(
            None,
            env(&[
                (SNAPSHOT_ENV, "env.json"),
                (NOW_ENV, "2024-06-15T08:00:00+02:00"),
                (STATES_ENV, "done"),
            ]),
        )
        .unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("env.json"));
        assert_eq!(config.now.unwrap().to_rfc3339(), "2024-06-15T06:00:00+00:00");
        assert_eq!(config.evaluator.counted_states, vec![InventoryState::Done]);
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        assert!(RunnerConfig::from_lookup(None, env(&[])).is_err());
    }

    #[test]
    fn malformed_overrides_are_errors() {
        let bad_now = RunnerConfig::from_lookup(
            None,
            env(&[(SNAPSHOT_ENV, "s.json"), (NOW_ENV, "yesterday")]),
        );
        assert!(bad_now.is_err());

        let bad_states =
            RunnerConfig::from_lookup(None, env(&[(SNAPSHOT_ENV, "s.json"), (STATES_ENV, "lost")]));
        assert!(bad_states.is_err());
    }
}
