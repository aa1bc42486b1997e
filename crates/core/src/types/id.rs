//! Newtype id for marketplace listings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single marketplace listing (e.g. `m94238591682`).
///
/// Listing ids are opaque strings assigned by the marketplace. The newtype
/// keeps them from being confused with other string fields and gives the
/// selection stage a precise type to validate against the candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new listing id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_display() {
        let id = ItemId::new("m94238591682");
        assert_eq!(id.to_string(), "m94238591682");
    }

    #[test]
    fn test_item_id_serde_transparent() {
        let id = ItemId::new("m123");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"m123\"");

        let back: ItemId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
