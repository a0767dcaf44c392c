use tracing::debug;

use crate::error::{CycleCountError, CycleCountResult};
use crate::location::Location;
use crate::proposal::{Proposal, propose};
use crate::rule::Rule;

use super::{CountStrategy, EvaluationContext};

/// Count a location as soon as its accuracy drops below the rule's threshold.
#[derive(Debug, Copy, Clone, Default)]
pub struct AccuracyStrategy;

impl AccuracyStrategy {
    /// Evaluate a batch of rules. The batch must contain exactly one rule.
    pub fn propose_for_rules(
        &self,
        rules: &[&Rule],
        locations: &[Location],
        ctx: &EvaluationContext<'_>,
    ) -> CycleCountResult<Vec<Proposal>> {
        let [rule] = rules else {
            return Err(CycleCountError::PreconditionViolation {
                rules: rules.iter().map(|r| r.id_typed()).collect(),
                reason: format!(
                    "accuracy evaluation takes exactly one rule, got {}",
                    rules.len()
                ),
            });
        };

        let mut proposals = Vec::new();
        for location in locations {
            let threshold = rule.params().accuracy_threshold.ok_or_else(|| {
                CycleCountError::computation(
                    rule.id_typed(),
                    location.id,
                    "accuracy threshold is not set",
                )
            })?;

            if location.accuracy < threshold {
                debug!(
                    location = %location.id,
                    accuracy = %location.accuracy,
                    %threshold,
                    "accuracy below threshold"
                );
                proposals.push(propose(ctx.now, location, rule));
            }
        }
        Ok(proposals)
    }
}

impl CountStrategy for AccuracyStrategy {
    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn propose(
        &self,
        rule: &Rule,
        locations: &[Location],
        ctx: &EvaluationContext<'_>,
    ) -> CycleCountResult<Vec<Proposal>> {
        self.propose_for_rules(&[rule], locations, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySnapshot;
    use crate::rule::{RuleDraft, RuleType};
    use crate::test_support::*;
    use rust_decimal::Decimal;

    fn accuracy_rule(n: u128, threshold: Option<Decimal>) -> Rule {
        let mut draft = RuleDraft::new("accuracy", RuleType::Accuracy);
        draft.accuracy_threshold = threshold;
        rule(n, draft)
    }

    #[test]
    fn proposes_only_below_threshold() {
        let low = location(1, Decimal::new(8999, 2));
        let exact = location(2, Decimal::new(90, 0));
        let high = location(3, Decimal::new(100, 0));
        let snapshot = InMemorySnapshot::new();

        let proposals = AccuracyStrategy
            .propose(
                &accuracy_rule(1, Some(Decimal::new(90, 0))),
                &[low.clone(), exact, high],
                &ctx(&snapshot, day(10)),
            )
            .unwrap();

        assert_eq!(proposals, vec![Proposal { date: day(10), location: low.id, rule: rule_id(1) }]);
    }

    #[test]
    fn two_rules_violate_precondition() {
        let first = accuracy_rule(1, Some(Decimal::new(90, 0)));
        let second = accuracy_rule(2, Some(Decimal::new(50, 0)));
        let snapshot = InMemorySnapshot::new();

        let err = AccuracyStrategy
            .propose_for_rules(
                &[&first, &second],
                &[location(1, Decimal::ZERO)],
                &ctx(&snapshot, day(10)),
            )
            .unwrap_err();

        match err {
            CycleCountError::PreconditionViolation { rules, .. } => {
                assert_eq!(rules, vec![rule_id(1), rule_id(2)]);
            }
            other => panic!("Expected PreconditionViolation, got {other:?}"),
        }
    }

    #[test]
    fn empty_rule_batch_violates_precondition() {
        let snapshot = InMemorySnapshot::new();
        let err = AccuracyStrategy
            .propose_for_rules(&[], &[location(1, Decimal::ZERO)], &ctx(&snapshot, day(10)))
            .unwrap_err();
        assert!(matches!(err, CycleCountError::PreconditionViolation { .. }));
    }

    #[test]
    fn unset_threshold_is_a_computation_error() {
        let snapshot = InMemorySnapshot::new();
        let err = AccuracyStrategy
            .propose(
                &accuracy_rule(1, None),
                &[location(1, Decimal::ZERO)],
                &ctx(&snapshot, day(10)),
            )
            .unwrap_err();
        assert!(matches!(err, CycleCountError::Computation { .. }));
    }
}
