//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `AreaId` where an `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(AreaId, "Unique identifier for an institutional area.");
typed_id!(AccountId, "Unique identifier for a budget account.");
typed_id!(ConceptId, "Unique identifier for an expense concept.");
typed_id!(ProductId, "Unique identifier for a catalog product.");
typed_id!(ProviderId, "Unique identifier for a provider.");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(BudgetRequestId, "Unique identifier for a budget request.");
typed_id!(RequisitionId, "Unique identifier for a purchase requisition.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(RequisitionId::new(), RequisitionId::new());
        assert_ne!(AreaId::new(), AreaId::new());
    }

    #[test]
    fn test_roundtrip_through_uuid() {
        let uuid = Uuid::new_v4();
        let id = AccountId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_display_and_parse() {
        let id = BudgetRequestId::new();
        let parsed = BudgetRequestId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(RequisitionId::from_str("not-a-uuid").is_err());
    }
}
