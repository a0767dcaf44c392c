//! Typed identifiers for the cycle count domain.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use cyclecount_core::{DomainError, EntityId};

macro_rules! entity_newtype {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(pub EntityId);

        impl $t {
            pub fn new(id: EntityId) -> Self {
                Self(id)
            }

            /// Generate a fresh identifier.
            pub fn generate() -> Self {
                Self(EntityId::new())
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<EntityId>().map(Self)
            }
        }
    };
}

entity_newtype!(
    /// Cycle count rule identifier.
    RuleId
);
entity_newtype!(
    /// Stock location identifier.
    LocationId
);
entity_newtype!(
    /// Warehouse identifier.
    WarehouseId
);
entity_newtype!(
    /// Physical inventory (count) record identifier.
    InventoryId
);
entity_newtype!(
    /// Stock movement identifier.
    MovementId
);
