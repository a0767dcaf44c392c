use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CycleCountError, CycleCountResult};
use crate::history::MovementRecord;
use crate::ids::LocationId;
use crate::location::Location;
use crate::proposal::{Proposal, propose};
use crate::rule::Rule;

use super::{CountStrategy, EvaluationContext};

/// Count a location once the value moved in or out of it since its last count
/// exceeds the rule's turnover threshold.
///
/// Count history for the whole location set is fetched in one query.
#[derive(Debug, Copy, Clone, Default)]
pub struct TurnoverStrategy;

/// Σ `quantity × unit_price`. `None` on decimal overflow.
pub fn total_turnover(movements: &[MovementRecord]) -> Option<Decimal> {
    movements
        .iter()
        .try_fold(Decimal::ZERO, |acc, m| acc.checked_add(m.value()?))
}

impl CountStrategy for TurnoverStrategy {
    fn name(&self) -> &'static str {
        "turnover"
    }

    fn propose(
        &self,
        rule: &Rule,
        locations: &[Location],
        ctx: &EvaluationContext<'_>,
    ) -> CycleCountResult<Vec<Proposal>> {
        let ids: Vec<LocationId> = locations.iter().map(|l| l.id).collect();
        let records = ctx.history.find_by_locations(&ids, ctx.counted_states)?;

        let mut dates_by_location: HashMap<LocationId, Vec<DateTime<Utc>>> =
            ids.iter().map(|id| (*id, Vec::new())).collect();
        for record in &records {
            for covered in &record.locations {
                if let Some(dates) = dates_by_location.get_mut(covered) {
                    dates.push(record.date);
                }
            }
        }

        let mut proposals = Vec::new();
        for location in locations {
            let last_count = dates_by_location
                .get(&location.id)
                .and_then(|dates| dates.iter().max().copied());

            // Never counted: no turnover check at all.
            let Some(since) = last_count else {
                debug!(location = %location.id, "never counted; proposing count");
                proposals.push(propose(ctx.now, location, rule));
                continue;
            };

            let movements = ctx.movements.find_done_after(location.id, since)?;
            if movements.is_empty() {
                debug!(location = %location.id, since = %since, "no movements since last count");
                continue;
            }

            let turnover = total_turnover(&movements).ok_or_else(|| {
                CycleCountError::computation(rule.id_typed(), location.id, "turnover overflowed")
            })?;
            let threshold = rule.params().turnover_threshold.ok_or_else(|| {
                CycleCountError::computation(
                    rule.id_typed(),
                    location.id,
                    "turnover threshold is not set",
                )
            })?;

            debug!(
                location = %location.id,
                %turnover,
                %threshold,
                movements = movements.len(),
                "turnover since last count"
            );
            if turnover > threshold {
                proposals.push(propose(ctx.now, location, rule));
            }
        }

        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InventoryState;
    use crate::repository::InMemorySnapshot;
    use crate::rule::{RuleDraft, RuleType};
    use crate::test_support::*;

    fn turnover_rule(threshold: Option<Decimal>) -> Rule {
        let mut draft = RuleDraft::new("value flow", RuleType::Turnover);
        draft.turnover_threshold = threshold;
        rule(7, draft)
    }

    fn counted_at(l: &Location, d: u32) -> InMemorySnapshot {
        InMemorySnapshot::new().with_inventory(count(day(d), &[l.id], InventoryState::Done))
    }

    #[test]
    fn never_counted_location_is_always_proposed() {
        let l = location(1, Decimal::ZERO);
        let other = location(9, Decimal::ZERO);
        let snapshot = InMemorySnapshot::new()
            .with_movement(done_move(day(2), l.id, other.id, 1, Decimal::ONE));

        // Unset threshold must not matter here.
        let proposals = TurnoverStrategy
            .propose(&turnover_rule(None), &[l.clone()], &ctx(&snapshot, day(5)))
            .unwrap();

        assert_eq!(proposals, vec![Proposal { date: day(5), location: l.id, rule: rule_id(7) }]);
    }

    #[test]
    fn turnover_above_threshold_triggers() {
        let l = location(1, Decimal::ZERO);
        let other = location(9, Decimal::ZERO);
        let snapshot = counted_at(&l, 1)
            .with_movement(done_move(day(2), l.id, other.id, 3, Decimal::new(40, 0)))
            .with_movement(done_move(day(3), other.id, l.id, 1, Decimal::new(1, 2)));

        let proposals = TurnoverStrategy
            .propose(&turnover_rule(Some(Decimal::new(120, 0))), &[l], &ctx(&snapshot, day(5)))
            .unwrap();

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].date, day(5));
    }

    #[test]
    fn turnover_equal_to_threshold_does_not_trigger() {
        let l = location(1, Decimal::ZERO);
        let other = location(9, Decimal::ZERO);
        let snapshot = counted_at(&l, 1)
            .with_movement(done_move(day(2), l.id, other.id, 3, Decimal::new(40, 0)))
            .with_movement(done_move(day(3), other.id, l.id, 2, Decimal::new(30, 0)));

        let proposals = TurnoverStrategy
            .propose(&turnover_rule(Some(Decimal::new(180, 0))), &[l], &ctx(&snapshot, day(5)))
            .unwrap();

        assert!(proposals.is_empty());
    }

    #[test]
    fn movements_before_last_count_are_ignored() {
        let l = location(1, Decimal::ZERO);
        let other = location(9, Decimal::ZERO);
        let snapshot = counted_at(&l, 4)
            .with_movement(done_move(day(2), l.id, other.id, 100, Decimal::ONE))
            .with_movement(done_move(day(4), l.id, other.id, 100, Decimal::ONE));

        let proposals = TurnoverStrategy
            .propose(&turnover_rule(Some(Decimal::ONE)), &[l], &ctx(&snapshot, day(5)))
            .unwrap();

        assert!(proposals.is_empty());
    }

    #[test]
    fn batched_history_groups_dates_per_location() {
        let a = location(1, Decimal::ZERO);
        let b = location(2, Decimal::ZERO);
        let c = location(3, Decimal::ZERO);
        let other = location(9, Decimal::ZERO);
        let snapshot = InMemorySnapshot::new()
            .with_inventory(count(day(1), &[a.id, b.id], InventoryState::Done))
            .with_inventory(count(day(3), &[b.id], InventoryState::Confirm))
            .with_movement(done_move(day(2), a.id, other.id, 10, Decimal::ONE))
            .with_movement(done_move(day(2), b.id, other.id, 10, Decimal::ONE));

        let proposals = TurnoverStrategy
            .propose(
                &turnover_rule(Some(Decimal::new(5, 0))),
                &[a.clone(), b, c.clone()],
                &ctx(&snapshot, day(5)),
            )
            .unwrap();

        // a: moved 10 since day 1; b: counted again on day 3, nothing since; c: never counted.
        let located: Vec<_> = proposals.iter().map(|p| p.location).collect();
        assert_eq!(located, vec![a.id, c.id]);
    }

    #[test]
    fn unset_threshold_fails_when_compared() {
        let l = location(1, Decimal::ZERO);
        let other = location(9, Decimal::ZERO);
        let snapshot = counted_at(&l, 1)
            .with_movement(done_move(day(2), l.id, other.id, 1, Decimal::ONE));

        let err = TurnoverStrategy
            .propose(&turnover_rule(None), &[l.clone()], &ctx(&snapshot, day(5)))
            .unwrap_err();

        match err {
            CycleCountError::Computation { rule, location, reason } => {
                assert_eq!(rule, rule_id(7));
                assert_eq!(location, l.id);
                assert!(reason.contains("threshold"));
            }
            other => panic!("Expected Computation error, got {other:?}"),
        }
    }

    #[test]
    fn total_turnover_sums_value() {
        let a = loc_id(1);
        let b = loc_id(2);
        let moves = vec![
            done_move(day(1), a, b, 2, Decimal::new(125, 2)),
            done_move(day(2), b, a, 4, Decimal::new(50, 2)),
        ];
        assert_eq!(total_turnover(&moves), Some(Decimal::new(450, 2)));
        assert_eq!(total_turnover(&[]), Some(Decimal::ZERO));
    }
}
