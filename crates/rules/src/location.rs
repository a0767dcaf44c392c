use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cyclecount_core::Entity;

use crate::ids::{LocationId, WarehouseId};

/// A stock location as seen by the rule engine.
///
/// Location master data is owned elsewhere; the engine only needs the owning
/// warehouse (for scope resolution) and the accuracy metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    #[serde(default)]
    pub name: String,
    /// Owning warehouse. Virtual or transit locations may have none.
    #[serde(default)]
    pub warehouse: Option<WarehouseId>,
    /// Recent count reliability (e.g. a percentage). Compared against a rule's
    /// accuracy threshold with `<`.
    #[serde(default)]
    pub accuracy: Decimal,
}

impl Location {
    pub fn new(id: LocationId, warehouse: Option<WarehouseId>, accuracy: Decimal) -> Self {
        Self {
            id,
            name: String::new(),
            warehouse,
            accuracy,
        }
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
