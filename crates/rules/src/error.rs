use thiserror::Error;

use cyclecount_core::DomainError;

use crate::ids::{LocationId, RuleId};
use crate::rule::RuleType;

/// Result type used by the rule engine.
pub type CycleCountResult<T> = Result<T, CycleCountError>;

/// Rule engine error.
///
/// Every variant carries the identity of the rule (and location, where one is
/// involved) so callers can diagnose the failure without re-running it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CycleCountError {
    /// Rejected on create/update. Not recoverable by the engine.
    #[error("invalid configuration for rule {rule}: {reason}")]
    InvalidRuleConfiguration { rule: RuleId, reason: String },

    /// A strategy was called in a way its contract forbids.
    #[error("precondition violated (rules: {}): {reason}", join_ids(.rules))]
    PreconditionViolation { rules: Vec<RuleId>, reason: String },

    /// The rule could not be applied to a location.
    #[error("computation failed for rule {rule} at location {location}: {reason}")]
    Computation {
        rule: RuleId,
        location: LocationId,
        reason: String,
    },

    /// The rule type has no automated evaluation path.
    #[error("rule {rule} of type {rule_type} is unsupported for automated evaluation")]
    Unsupported { rule: RuleId, rule_type: RuleType },

    /// A repository failed to answer a query.
    #[error("repository error: {0}")]
    Repository(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CycleCountError {
    pub fn invalid_rule(rule: RuleId, reason: impl Into<String>) -> Self {
        Self::InvalidRuleConfiguration {
            rule,
            reason: reason.into(),
        }
    }

    pub fn computation(rule: RuleId, location: LocationId, reason: impl Into<String>) -> Self {
        Self::Computation {
            rule,
            location,
            reason: reason.into(),
        }
    }

    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

fn join_ids(ids: &[RuleId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
