//! Historical facts the engine reads: physical counts and stock movements.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cyclecount_core::{DomainError, Entity};

use crate::ids::{InventoryId, LocationId, MovementId};

/// Lifecycle state of a physical inventory (count) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryState {
    Draft,
    Confirm,
    Done,
    Cancel,
}

impl InventoryState {
    /// States that count as "a count happened or is underway".
    pub const COUNTED: [InventoryState; 3] = [
        InventoryState::Draft,
        InventoryState::Confirm,
        InventoryState::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryState::Draft => "draft",
            InventoryState::Confirm => "confirm",
            InventoryState::Done => "done",
            InventoryState::Cancel => "cancel",
        }
    }
}

impl core::fmt::Display for InventoryState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for InventoryState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "draft" => Ok(InventoryState::Draft),
            "confirm" => Ok(InventoryState::Confirm),
            "done" => Ok(InventoryState::Done),
            "cancel" => Ok(InventoryState::Cancel),
            other => Err(DomainError::validation(format!(
                "unknown inventory state: {other:?}"
            ))),
        }
    }
}

/// A physical inventory event covering one or more locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: InventoryId,
    pub date: DateTime<Utc>,
    pub locations: Vec<LocationId>,
    pub state: InventoryState,
}

impl InventoryRecord {
    pub fn covers(&self, location: LocationId) -> bool {
        self.locations.contains(&location)
    }
}

impl Entity for InventoryRecord {
    type Id = InventoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Lifecycle state of a stock movement. Only `Done` moves carry turnover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementState {
    Draft,
    Waiting,
    Done,
    Cancel,
}

/// A stock movement between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    pub date: DateTime<Utc>,
    pub source: LocationId,
    pub destination: LocationId,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub state: MovementState,
}

impl MovementRecord {
    /// Whether the movement enters or leaves `location`.
    pub fn touches(&self, location: LocationId) -> bool {
        self.source == location || self.destination == location
    }

    /// Moved value (`quantity × unit_price`). `None` on decimal overflow.
    pub fn value(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }
}

impl Entity for MovementRecord {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
