use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{CycleCountError, CycleCountResult};
use crate::location::Location;
use crate::proposal::{Proposal, propose};
use crate::rule::Rule;

use super::{CountStrategy, EvaluationContext};

const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Fixed cadence: `counts_per_period` counts every `period_days` days.
///
/// History is looked up one location at a time.
#[derive(Debug, Copy, Clone, Default)]
pub struct PeriodicStrategy;

/// Spacing between two counts, at microsecond resolution.
///
/// `None` when `counts_per_period` is zero or the period overflows.
pub fn count_interval(period_days: i32, counts_per_period: i32) -> Option<Duration> {
    let period = i64::from(period_days).checked_mul(MICROS_PER_DAY)?;
    let micros = period.checked_div(i64::from(counts_per_period))?;
    Some(Duration::microseconds(micros))
}

impl CountStrategy for PeriodicStrategy {
    fn name(&self) -> &'static str {
        "periodic"
    }

    fn propose(
        &self,
        rule: &Rule,
        locations: &[Location],
        ctx: &EvaluationContext<'_>,
    ) -> CycleCountResult<Vec<Proposal>> {
        let mut proposals = Vec::with_capacity(locations.len());

        for location in locations {
            let latest = ctx
                .history
                .find_latest_by_location(std::slice::from_ref(&location.id), ctx.counted_states)?;

            let next_date = match latest {
                Some(record) => next_due(rule, location, record.date, ctx.now)?,
                None => ctx.now,
            };

            debug!(location = %location.id, next = %next_date, "periodic count due");
            proposals.push(propose(next_date, location, rule));
        }

        Ok(proposals)
    }
}

fn next_due(
    rule: &Rule,
    location: &Location,
    last_count: DateTime<Utc>,
    now: DateTime<Utc>,
) -> CycleCountResult<DateTime<Utc>> {
    let params = rule.params();
    let interval = count_interval(params.period_days, params.counts_per_period).ok_or_else(|| {
        CycleCountError::computation(
            rule.id_typed(),
            location.id,
            format!(
                "cannot derive count frequency from period_days={} and counts_per_period={}",
                params.period_days, params.counts_per_period
            ),
        )
    })?;

    let candidate = last_count.checked_add_signed(interval).ok_or_else(|| {
        CycleCountError::computation(
            rule.id_typed(),
            location.id,
            "next count date is out of range",
        )
    })?;

    Ok(candidate.max(now))
}
