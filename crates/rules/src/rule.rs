use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cyclecount_core::{DomainError, Entity};

use crate::error::{CycleCountError, CycleCountResult};
use crate::ids::{LocationId, RuleId, WarehouseId};
use crate::location::Location;
use crate::repository::LocationRepository;

const NO_DESCRIPTION: &str = "(No description provided.)";

/// Scheduling policy implemented by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Fixed cadence: N counts every P days.
    Periodic,
    /// Count once the value moved through a location exceeds a threshold.
    Turnover,
    /// Count once a location's accuracy drops below a threshold.
    Accuracy,
    /// Confirm empty locations. Has no automated evaluation path.
    Zero,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Periodic => "periodic",
            RuleType::Turnover => "turnover",
            RuleType::Accuracy => "accuracy",
            RuleType::Zero => "zero",
        }
    }

    /// Human-readable explanation of what rules of this type do.
    pub fn description(&self) -> &'static str {
        match self {
            RuleType::Periodic => {
                "Ensures that at least a defined number of counts in a given period will be run."
            }
            RuleType::Turnover => {
                "Schedules a count every time the total turnover of a location exceeds the \
                 threshold. This considers every product going into/out of the location"
            }
            RuleType::Accuracy => {
                "Schedules a count every time the accuracy of a location goes under a given \
                 threshold."
            }
            RuleType::Zero => {
                "Perform an Inventory Adjustment every time a location in the warehouse runs out \
                 of stock in order to confirm it is truly empty."
            }
        }
    }
}

impl core::fmt::Display for RuleType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for RuleType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "periodic" => Ok(RuleType::Periodic),
            "turnover" => Ok(RuleType::Turnover),
            "accuracy" => Ok(RuleType::Accuracy),
            "zero" => Ok(RuleType::Zero),
            other => Err(DomainError::validation(format!("unknown rule type: {other:?}"))),
        }
    }
}

/// Describe a raw (possibly unrecognized) rule type string.
pub fn describe_rule_type(raw: &str) -> &'static str {
    raw.parse::<RuleType>()
        .map(|t| t.description())
        .unwrap_or(NO_DESCRIPTION)
}

/// Whether a rule targets whole warehouses or hand-picked locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    #[default]
    Warehouse,
    Location,
}

/// Numeric knobs of a rule. Which ones matter depends on the rule type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleParams {
    pub counts_per_period: i32,
    pub period_days: i32,
    pub turnover_threshold: Option<Decimal>,
    pub accuracy_threshold: Option<Decimal>,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            counts_per_period: 1,
            period_days: 0,
            turnover_threshold: None,
            accuracy_threshold: None,
        }
    }
}

/// Where a rule applies.
///
/// While the mode is [`ScopeMode::Location`] the warehouse set is derived from
/// the selected locations and cannot be edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleScope {
    mode: ScopeMode,
    warehouses: BTreeSet<WarehouseId>,
    locations: BTreeSet<LocationId>,
}

impl RuleScope {
    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    pub fn warehouses(&self) -> &BTreeSet<WarehouseId> {
        &self.warehouses
    }

    pub fn locations(&self) -> &BTreeSet<LocationId> {
        &self.locations
    }
}

/// Derive the warehouse set owning `locations`.
///
/// Locations without an owning warehouse contribute nothing. A location the
/// repository does not know is reported as [`DomainError::NotFound`].
fn derive_warehouses<L>(
    locations: &BTreeSet<LocationId>,
    repo: &L,
) -> CycleCountResult<BTreeSet<WarehouseId>>
where
    L: LocationRepository + ?Sized,
{
    let mut derived = BTreeSet::new();
    for id in locations {
        let location = repo
            .get(*id)?
            .ok_or_else(|| DomainError::not_found(format!("location {id}")))?;
        if let Some(warehouse) = location.warehouse {
            derived.insert(warehouse);
        }
    }
    Ok(derived)
}

/// Rule creation payload (admin input). Turned into a [`Rule`] by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(default)]
    pub id: Option<RuleId>,
    pub name: String,
    pub rule_type: RuleType,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_counts_per_period")]
    pub counts_per_period: i32,
    #[serde(default)]
    pub period_days: i32,
    #[serde(default)]
    pub turnover_threshold: Option<Decimal>,
    #[serde(default)]
    pub accuracy_threshold: Option<Decimal>,
    #[serde(default)]
    pub scope_mode: ScopeMode,
    #[serde(default)]
    pub warehouses: Vec<WarehouseId>,
    #[serde(default)]
    pub locations: Vec<LocationId>,
}

fn default_active() -> bool {
    true
}

fn default_counts_per_period() -> i32 {
    1
}

impl RuleDraft {
    pub fn new(name: impl Into<String>, rule_type: RuleType) -> Self {
        let params = RuleParams::default();
        Self {
            id: None,
            name: name.into(),
            rule_type,
            active: true,
            counts_per_period: params.counts_per_period,
            period_days: params.period_days,
            turnover_threshold: None,
            accuracy_threshold: None,
            scope_mode: ScopeMode::Warehouse,
            warehouses: Vec::new(),
            locations: Vec::new(),
        }
    }
}

/// Entity: one cycle count scheduling policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: RuleId,
    name: String,
    active: bool,
    rule_type: RuleType,
    params: RuleParams,
    scope: RuleScope,
}

impl Rule {
    /// Build a rule from an admin draft, deriving the warehouse set when the
    /// draft is location-scoped.
    ///
    /// This does not validate the numeric configuration; see [`Rule::validate`].
    pub fn from_draft<L>(id: RuleId, draft: RuleDraft, locations: &L) -> CycleCountResult<Self>
    where
        L: LocationRepository + ?Sized,
    {
        let explicit_warehouses: BTreeSet<WarehouseId> = draft.warehouses.into_iter().collect();
        let mut scope = RuleScope {
            mode: draft.scope_mode,
            warehouses: explicit_warehouses,
            locations: draft.locations.into_iter().collect(),
        };

        if scope.mode == ScopeMode::Location {
            let derived = derive_warehouses(&scope.locations, locations)?;
            if !scope.warehouses.is_empty() && scope.warehouses != derived {
                return Err(CycleCountError::invalid_rule(
                    id,
                    "warehouses are derived from the selected locations and cannot be set \
                     explicitly",
                ));
            }
            scope.warehouses = derived;
        }

        Ok(Self {
            id,
            name: draft.name,
            active: draft.active,
            rule_type: draft.rule_type,
            params: RuleParams {
                counts_per_period: draft.counts_per_period,
                period_days: draft.period_days,
                turnover_threshold: draft.turnover_threshold,
                accuracy_threshold: draft.accuracy_threshold,
            },
            scope,
        })
    }

    pub fn id_typed(&self) -> RuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn params(&self) -> &RuleParams {
        &self.params
    }

    pub fn scope(&self) -> &RuleScope {
        &self.scope
    }

    pub fn description(&self) -> &'static str {
        self.rule_type.description()
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_rule_type(&mut self, rule_type: RuleType) {
        self.rule_type = rule_type;
    }

    /// Mutable access to the numeric parameters. Re-validate before saving.
    pub fn params_mut(&mut self) -> &mut RuleParams {
        &mut self.params
    }

    /// Replace the warehouse selection of a warehouse-scoped rule.
    pub fn set_warehouses(
        &mut self,
        warehouses: impl IntoIterator<Item = WarehouseId>,
    ) -> CycleCountResult<()> {
        if self.scope.mode == ScopeMode::Location {
            return Err(CycleCountError::invalid_rule(
                self.id,
                "warehouses are derived from the selected locations while scope mode is `location`",
            ));
        }
        self.scope.warehouses = warehouses.into_iter().collect();
        Ok(())
    }

    /// Replace the location selection. Location-scoped rules re-derive their
    /// warehouses immediately; on error the scope is left untouched.
    pub fn set_locations<L>(
        &mut self,
        locations: impl IntoIterator<Item = LocationId>,
        repo: &L,
    ) -> CycleCountResult<()>
    where
        L: LocationRepository + ?Sized,
    {
        let locations: BTreeSet<LocationId> = locations.into_iter().collect();
        if self.scope.mode == ScopeMode::Location {
            self.scope.warehouses = derive_warehouses(&locations, repo)?;
        }
        self.scope.locations = locations;
        Ok(())
    }

    /// Switch scope mode.
    ///
    /// Entering location scope re-derives the warehouse set right away. Leaving
    /// it keeps the last derived set, which becomes editable again. On error the
    /// scope is left untouched.
    pub fn set_scope_mode<L>(&mut self, mode: ScopeMode, repo: &L) -> CycleCountResult<()>
    where
        L: LocationRepository + ?Sized,
    {
        if mode == ScopeMode::Location {
            self.scope.warehouses = derive_warehouses(&self.scope.locations, repo)?;
        }
        self.scope.mode = mode;
        Ok(())
    }

    /// Check that a location-scoped rule's warehouse set still matches the
    /// warehouses owning its locations.
    pub fn check_derived_scope<L>(&self, repo: &L) -> CycleCountResult<()>
    where
        L: LocationRepository + ?Sized,
    {
        if self.scope.mode != ScopeMode::Location {
            return Ok(());
        }
        let derived = derive_warehouses(&self.scope.locations, repo)?;
        if derived != self.scope.warehouses {
            return Err(CycleCountError::invalid_rule(
                self.id,
                "warehouses no longer match the warehouses of the selected locations",
            ));
        }
        Ok(())
    }

    /// Per-record validation (no repository access).
    pub fn validate(&self) -> CycleCountResult<()> {
        if self.name.trim().is_empty() {
            return Err(CycleCountError::invalid_rule(self.id, "name cannot be empty"));
        }
        if self.params.counts_per_period < 1 {
            return Err(CycleCountError::invalid_rule(
                self.id,
                "you cannot define a negative or null number of counts per period",
            ));
        }
        if self.params.period_days < 0 {
            return Err(CycleCountError::invalid_rule(
                self.id,
                "you cannot define a negative period",
            ));
        }
        if self.rule_type == RuleType::Zero && self.scope.warehouses.len() > 1 {
            return Err(CycleCountError::invalid_rule(
                self.id,
                "zero confirmation rules can only have one warehouse assigned",
            ));
        }
        Ok(())
    }

    /// Whether `location` falls inside this rule's scope.
    pub fn applies_to(&self, location: &Location) -> bool {
        match self.scope.mode {
            ScopeMode::Warehouse => location
                .warehouse
                .is_some_and(|wh| self.scope.warehouses.contains(&wh)),
            ScopeMode::Location => self.scope.locations.contains(&location.id),
        }
    }
}

impl Entity for Rule {
    type Id = RuleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
