use tracing::{info, instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::EvaluatorConfig;
use crate::error::{CycleCountError, CycleCountResult};
use crate::location::Location;
use crate::proposal::Proposal;
use crate::repository::{HistoryRepository, MovementRepository};
use crate::rule::{Rule, RuleType};
use crate::strategy::{
    AccuracyStrategy, CountStrategy, EvaluationContext, PeriodicStrategy, TurnoverStrategy,
};

/// Dispatches a rule and a location set to the strategy for the rule's type.
///
/// Stateless between calls: every evaluation reads the repositories and the
/// clock afresh and returns proposals to the caller.
#[derive(Debug, Clone)]
pub struct RuleEvaluator<H, M, C = SystemClock> {
    history: H,
    movements: M,
    clock: C,
    config: EvaluatorConfig,
}

impl<H, M> RuleEvaluator<H, M, SystemClock>
where
    H: HistoryRepository,
    M: MovementRepository,
{
    pub fn new(history: H, movements: M) -> Self {
        Self {
            history,
            movements,
            clock: SystemClock,
            config: EvaluatorConfig::default(),
        }
    }
}

impl<H, M, C> RuleEvaluator<H, M, C>
where
    H: HistoryRepository,
    M: MovementRepository,
    C: Clock,
{
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RuleEvaluator<H, M, C2> {
        RuleEvaluator {
            history: self.history,
            movements: self.movements,
            clock,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Propose counts for `locations` according to `rule`.
    ///
    /// Zero-confirmation rules have no automated path and fail with
    /// [`CycleCountError::Unsupported`].
    #[instrument(
        skip_all,
        fields(rule = %rule.id_typed(), rule_type = %rule.rule_type(), locations = locations.len())
    )]
    pub fn evaluate(&self, rule: &Rule, locations: &[Location]) -> CycleCountResult<Vec<Proposal>> {
        let ctx = EvaluationContext {
            history: &self.history,
            movements: &self.movements,
            counted_states: &self.config.counted_states,
            now: self.clock.now(),
        };

        let strategy: &dyn CountStrategy = match rule.rule_type() {
            RuleType::Periodic => &PeriodicStrategy,
            RuleType::Turnover => &TurnoverStrategy,
            RuleType::Accuracy => &AccuracyStrategy,
            RuleType::Zero => {
                return Err(CycleCountError::Unsupported {
                    rule: rule.id_typed(),
                    rule_type: rule.rule_type(),
                });
            }
        };

        let proposals = strategy.propose(rule, locations, &ctx)?;
        info!(strategy = strategy.name(), proposals = proposals.len(), "rule evaluated");
        Ok(proposals)
    }
}
