use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cyclecount_core::ValueObject;

use crate::ids::{LocationId, RuleId};
use crate::location::Location;
use crate::rule::Rule;

/// A recommended, not-yet-scheduled physical count.
///
/// Proposals are returned to the caller, which owns persistence and
/// deduplication against counts that are already scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposal {
    pub date: DateTime<Utc>,
    pub location: LocationId,
    pub rule: RuleId,
}

impl ValueObject for Proposal {}

/// Assemble the proposal every strategy emits.
pub fn propose(date: DateTime<Utc>, location: &Location, rule: &Rule) -> Proposal {
    Proposal {
        date,
        location: location.id,
        rule: rule.id_typed(),
    }
}
