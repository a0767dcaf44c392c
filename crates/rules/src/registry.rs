use tracing::{info, instrument, warn};

use cyclecount_core::DomainError;

use crate::error::{CycleCountError, CycleCountResult};
use crate::ids::{RuleId, WarehouseId};
use crate::repository::{LocationRepository, RuleRepository};
use crate::rule::{Rule, RuleDraft, RuleType};

/// Create/update entry point for rules.
///
/// Runs per-record validation plus the cross-record constraint that at most one
/// zero-confirmation rule covers any warehouse.
#[derive(Debug)]
pub struct RuleRegistry<R, L> {
    rules: R,
    locations: L,
}

impl<R, L> RuleRegistry<R, L>
where
    R: RuleRepository,
    L: LocationRepository,
{
    pub fn new(rules: R, locations: L) -> Self {
        Self { rules, locations }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn locations(&self) -> &L {
        &self.locations
    }

    /// Validate and store a new rule.
    #[instrument(skip_all, fields(name = %draft.name, rule_type = %draft.rule_type))]
    pub fn create(&self, draft: RuleDraft) -> CycleCountResult<Rule> {
        let id = draft.id.unwrap_or_else(RuleId::generate);
        if self.rules.get(id)?.is_some() {
            return Err(CycleCountError::invalid_rule(id, "a rule with this id already exists"));
        }

        let rule = Rule::from_draft(id, draft, &self.locations)?;
        self.validate(&rule)?;
        self.rules.save(rule.clone())?;

        info!(rule = %id, "cycle count rule created");
        Ok(rule)
    }

    /// Validate and store changes to an existing rule.
    ///
    /// A location-scoped rule must carry the warehouse set derived from its
    /// locations as they are now.
    #[instrument(skip_all, fields(rule = %rule.id_typed()))]
    pub fn update(&self, rule: Rule) -> CycleCountResult<Rule> {
        if self.rules.get(rule.id_typed())?.is_none() {
            return Err(DomainError::not_found(format!("rule {}", rule.id_typed())).into());
        }

        if let Err(e) = rule.check_derived_scope(&self.locations) {
            warn!(error = %e, "rule rejected");
            return Err(e);
        }
        self.validate(&rule)?;
        self.rules.save(rule.clone())?;

        info!("cycle count rule updated");
        Ok(rule)
    }

    /// Full validation: the rule's own constraints, then cross-record ones.
    pub fn validate(&self, rule: &Rule) -> CycleCountResult<()> {
        let result = rule.validate().and_then(|()| self.check_zero_rule_unique(rule));
        if let Err(e) = &result {
            warn!(rule = %rule.id_typed(), error = %e, "rule rejected");
        }
        result
    }

    fn check_zero_rule_unique(&self, rule: &Rule) -> CycleCountResult<()> {
        if rule.rule_type() != RuleType::Zero {
            return Ok(());
        }

        let warehouses = rule.scope().warehouses();
        let keys: Vec<Option<WarehouseId>> = if warehouses.is_empty() {
            vec![None]
        } else {
            warehouses.iter().copied().map(Some).collect()
        };

        for key in keys {
            let existing = self
                .rules
                .zero_rules_for(key)?
                .into_iter()
                .find(|other| *other != rule.id_typed());

            if let Some(other) = existing {
                let covered = match key {
                    Some(warehouse) => format!("warehouse {warehouse}"),
                    None => "no warehouse".to_owned(),
                };
                return Err(CycleCountError::invalid_rule(
                    rule.id_typed(),
                    format!(
                        "you can only have one zero confirmation rule per warehouse \
                         ({covered} is covered by rule {other})"
                    ),
                ));
            }
        }
        Ok(())
    }
}
