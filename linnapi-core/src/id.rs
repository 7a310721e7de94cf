use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of an inventory item (the API's stock item GUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockItemId(String);

impl StockItemId {
    pub fn new(id: impl Into<String>) -> Self {
        StockItemId(id.into())
    }

    /// Generates a fresh id for an item that does not exist remotely yet.
    pub fn generate() -> Self {
        StockItemId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StockItemId {
    fn from(id: &str) -> Self {
        StockItemId(id.to_string())
    }
}

impl From<String> for StockItemId {
    fn from(id: String) -> Self {
        StockItemId(id)
    }
}

/// Identity of an extended property.
///
/// A property starts out `Local` when constructed in memory and becomes
/// `Remote` once the store has created it and issued an id. The transition
/// happens once; a `Remote` id never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyId {
    /// Token generated locally. Never valid as a remote id.
    Local(Uuid),
    /// Id issued by the remote store.
    Remote(String),
}

impl PropertyId {
    /// Creates a fresh local token.
    pub fn local() -> Self {
        PropertyId::Local(Uuid::new_v4())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, PropertyId::Remote(_))
    }

    /// Returns the server-issued id, if there is one.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            PropertyId::Remote(id) => Some(id),
            PropertyId::Local(_) => None,
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyId::Local(token) => write!(f, "local:{}", token),
            PropertyId::Remote(id) => f.write_str(id),
        }
    }
}
