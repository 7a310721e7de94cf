use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{PropertyId, StockItemId};

/// Type tag used when none is given.
pub const DEFAULT_PROPERTY_TYPE: &str = "Attribute";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("malformed property record: missing {field}")]
    MalformedRecord { field: &'static str },
}

/// A property as returned by a store's fetch.
///
/// Fields are optional so that an incomplete record can be rejected with a
/// precise error instead of failing somewhere inside the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub property_type: Option<String>,
}

impl RemoteRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            value: Some(value.into()),
            property_type: Some(property_type.into()),
        }
    }
}

/// A property as submitted in a create or update batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPayload {
    pub id: PropertyId,
    pub item_id: StockItemId,
    pub name: String,
    pub value: String,
    pub property_type: String,
}

/// One named attribute attached to an inventory item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedProperty {
    id: PropertyId,
    name: String,
    value: String,
    property_type: String,
    pending_delete: bool,
}

impl ExtendedProperty {
    /// Creates a local property with the default type.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_type(name, value, DEFAULT_PROPERTY_TYPE)
    }

    /// Creates a local property with an explicit type.
    pub fn with_type(
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Self {
        Self {
            id: PropertyId::local(),
            name: name.into(),
            value: value.into(),
            property_type: property_type.into(),
            pending_delete: false,
        }
    }

    /// Builds a persisted property from a fetched record.
    ///
    /// `id`, `name` and `value` are required; an empty id or name counts as
    /// missing. A missing or empty type falls back to [`DEFAULT_PROPERTY_TYPE`].
    pub fn from_remote(record: RemoteRecord) -> Result<Self, PropertyError> {
        let id = non_empty(record.id, "id")?;
        let name = non_empty(record.name, "name")?;
        let value = record
            .value
            .ok_or(PropertyError::MalformedRecord { field: "value" })?;
        let property_type = record
            .property_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string());

        Ok(Self {
            id: PropertyId::Remote(id),
            name,
            value,
            property_type,
            pending_delete: false,
        })
    }

    pub fn id(&self) -> &PropertyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn property_type(&self) -> &str {
        &self.property_type
    }

    /// True once the remote store has issued this property's id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_remote()
    }

    pub fn is_pending_delete(&self) -> bool {
        self.pending_delete
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_property_type(&mut self, property_type: impl Into<String>) {
        self.property_type = property_type.into();
    }

    /// Requests removal on the next sync. Idempotent.
    pub fn mark_for_deletion(&mut self) {
        self.pending_delete = true;
    }

    /// Builds the payload submitted to the store for this property.
    pub fn to_remote_payload(&self, item_id: &StockItemId) -> PropertyPayload {
        PropertyPayload {
            id: self.id.clone(),
            item_id: item_id.clone(),
            name: self.name.clone(),
            value: self.value.clone(),
            property_type: self.property_type.clone(),
        }
    }

    pub(crate) fn assign_remote_id(&mut self, id: String) {
        debug_assert!(!self.id.is_remote(), "remote id reassigned");
        self.id = PropertyId::Remote(id);
    }
}

fn non_empty(field: Option<String>, name: &'static str) -> Result<String, PropertyError> {
    match field {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PropertyError::MalformedRecord { field: name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_property_is_local() {
        let prop = ExtendedProperty::new("Colour", "Red");
        assert!(!prop.is_persisted());
        assert!(!prop.is_pending_delete());
        assert_eq!(prop.property_type(), DEFAULT_PROPERTY_TYPE);
        assert!(matches!(prop.id(), PropertyId::Local(_)));
    }

    #[test]
    fn from_remote_copies_fields() {
        let record = RemoteRecord::new("row-1", "Size", "XL", "Specification");
        let prop = ExtendedProperty::from_remote(record).unwrap();

        assert!(prop.is_persisted());
        assert_eq!(prop.id(), &PropertyId::Remote("row-1".to_string()));
        assert_eq!(prop.name(), "Size");
        assert_eq!(prop.value(), "XL");
        assert_eq!(prop.property_type(), "Specification");
    }

    #[test]
    fn from_remote_defaults_missing_type() {
        let record = RemoteRecord {
            property_type: None,
            ..RemoteRecord::new("row-1", "Size", "XL", "")
        };
        let prop = ExtendedProperty::from_remote(record).unwrap();
        assert_eq!(prop.property_type(), DEFAULT_PROPERTY_TYPE);
    }

    #[test]
    fn from_remote_accepts_empty_value() {
        let record = RemoteRecord::new("row-1", "Notes", "", "Attribute");
        let prop = ExtendedProperty::from_remote(record).unwrap();
        assert_eq!(prop.value(), "");
    }

    #[test]
    fn from_remote_rejects_missing_fields() {
        let missing_id = RemoteRecord {
            id: None,
            ..RemoteRecord::new("x", "Size", "XL", "Attribute")
        };
        assert_eq!(
            ExtendedProperty::from_remote(missing_id),
            Err(PropertyError::MalformedRecord { field: "id" })
        );

        let empty_name = RemoteRecord::new("row-1", "", "XL", "Attribute");
        assert_eq!(
            ExtendedProperty::from_remote(empty_name),
            Err(PropertyError::MalformedRecord { field: "name" })
        );

        let missing_value = RemoteRecord {
            value: None,
            ..RemoteRecord::new("row-1", "Size", "", "Attribute")
        };
        assert_eq!(
            ExtendedProperty::from_remote(missing_value),
            Err(PropertyError::MalformedRecord { field: "value" })
        );
    }

    #[test]
    fn mark_for_deletion_is_idempotent() {
        let mut prop = ExtendedProperty::new("Colour", "Red");
        prop.mark_for_deletion();
        prop.mark_for_deletion();
        assert!(prop.is_pending_delete());
    }

    #[test]
    fn payload_carries_current_id_and_item() {
        let item = StockItemId::new("item-1");
        let mut prop = ExtendedProperty::with_type("Colour", "Red", "Attribute");
        prop.set_value("Blue");

        let payload = prop.to_remote_payload(&item);
        assert_eq!(&payload.id, prop.id());
        assert_eq!(payload.item_id, item);
        assert_eq!(payload.value, "Blue");

        prop.assign_remote_id("row-9".to_string());
        let payload = prop.to_remote_payload(&item);
        assert_eq!(payload.id, PropertyId::Remote("row-9".to_string()));
    }
}
