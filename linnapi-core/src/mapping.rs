use indexmap::IndexMap;
use thiserror::Error;

use crate::id::{PropertyId, StockItemId};
use crate::property::ExtendedProperty;

/// Errors from local mapping operations. These never reach the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("extended property already exists: {0}")]
    DuplicateName(String),
    #[error("extended property name cannot be empty")]
    EmptyName,
    #[error("extended property not found: {0}")]
    NotFound(String),
    #[error("extended property index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Addresses a property by position or by name.
///
/// Name lookups only see properties that are not pending deletion;
/// positional lookups see everything still in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKey<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for PropertyKey<'_> {
    fn from(index: usize) -> Self {
        PropertyKey::Index(index)
    }
}

impl<'a> From<&'a str> for PropertyKey<'a> {
    fn from(name: &'a str) -> Self {
        PropertyKey::Name(name)
    }
}

impl<'a> From<&'a String> for PropertyKey<'a> {
    fn from(name: &'a String) -> Self {
        PropertyKey::Name(name)
    }
}

/// Flat view of a live property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub name: String,
    pub value: String,
    pub property_type: String,
}

/// The extended properties of one item.
///
/// Local edits accumulate here until [`sync`](Self::sync) pushes them to a
/// store. Properties marked for deletion stay in the collection, visible to
/// iteration, until a sync removes them.
#[derive(Debug, Clone)]
pub struct ExtendedPropertyMapping {
    item_id: StockItemId,
    pub(crate) properties: Vec<ExtendedProperty>,
    loaded: bool,
}

impl ExtendedPropertyMapping {
    /// Creates an empty, unloaded mapping for an item.
    pub fn new(item_id: StockItemId) -> Self {
        Self {
            item_id,
            properties: Vec::new(),
            loaded: false,
        }
    }

    pub fn item_id(&self) -> &StockItemId {
        &self.item_id
    }

    /// Whether the mapping has been populated from a store.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// All properties in order, including those pending deletion.
    pub fn iter(&self) -> std::slice::Iter<'_, ExtendedProperty> {
        self.properties.iter()
    }

    /// Properties not pending deletion.
    pub fn active(&self) -> impl Iterator<Item = &ExtendedProperty> {
        self.properties.iter().filter(|p| !p.is_pending_delete())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.active().any(|p| p.name() == name)
    }

    /// Appends a new local property and returns it.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Result<&mut ExtendedProperty, MappingError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MappingError::EmptyName);
        }
        if self.contains(&name) {
            return Err(MappingError::DuplicateName(name));
        }

        self.properties
            .push(ExtendedProperty::with_type(name, value, property_type));
        let last = self.properties.len() - 1;
        Ok(&mut self.properties[last])
    }

    pub fn get<'k>(&self, key: impl Into<PropertyKey<'k>>) -> Result<&ExtendedProperty, MappingError> {
        let index = self.position(key.into())?;
        Ok(&self.properties[index])
    }

    pub fn get_mut<'k>(
        &mut self,
        key: impl Into<PropertyKey<'k>>,
    ) -> Result<&mut ExtendedProperty, MappingError> {
        let index = self.position(key.into())?;
        Ok(&mut self.properties[index])
    }

    /// Marks a property for deletion. The next sync removes it.
    pub fn remove<'k>(&mut self, key: impl Into<PropertyKey<'k>>) -> Result<(), MappingError> {
        self.get_mut(key)?.mark_for_deletion();
        Ok(())
    }

    /// Name to value for every live property, in collection order.
    pub fn to_map(&self) -> IndexMap<String, String> {
        self.active()
            .map(|p| (p.name().to_string(), p.value().to_string()))
            .collect()
    }

    pub fn summaries(&self) -> Vec<PropertySummary> {
        self.active()
            .map(|p| PropertySummary {
                id: p.id().clone(),
                name: p.name().to_string(),
                value: p.value().to_string(),
                property_type: p.property_type().to_string(),
            })
            .collect()
    }

    pub(crate) fn replace_all(&mut self, properties: Vec<ExtendedProperty>) {
        self.properties = properties;
        self.loaded = true;
    }

    fn position(&self, key: PropertyKey<'_>) -> Result<usize, MappingError> {
        match key {
            PropertyKey::Index(index) if index < self.properties.len() => Ok(index),
            PropertyKey::Index(index) => Err(MappingError::IndexOutOfRange {
                index,
                len: self.properties.len(),
            }),
            PropertyKey::Name(name) => self
                .properties
                .iter()
                .position(|p| !p.is_pending_delete() && p.name() == name)
                .ok_or_else(|| MappingError::NotFound(name.to_string())),
        }
    }
}

impl<'a> IntoIterator for &'a ExtendedPropertyMapping {
    type Item = &'a ExtendedProperty;
    type IntoIter = std::slice::Iter<'a, ExtendedProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::DEFAULT_PROPERTY_TYPE;

    fn mapping() -> ExtendedPropertyMapping {
        ExtendedPropertyMapping::new(StockItemId::new("item-1"))
    }

    #[test]
    fn create_appends_local_property() {
        let mut map = mapping();
        let prop = map.create("Colour", "Red", DEFAULT_PROPERTY_TYPE).unwrap();
        assert!(!prop.is_persisted());

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Colour").unwrap().value(), "Red");
        assert_eq!(map.get(0_usize).unwrap().name(), "Colour");
    }

    #[test]
    fn create_rejects_duplicate_name_without_mutation() {
        let mut map = mapping();
        map.create("Colour", "Red", "Attribute").unwrap();

        let err = map.create("Colour", "Blue", "Attribute").unwrap_err();
        assert_eq!(err, MappingError::DuplicateName("Colour".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Colour").unwrap().value(), "Red");
    }

    #[test]
    fn create_rejects_empty_name() {
        let mut map = mapping();
        assert_eq!(map.create("", "x", "Attribute").unwrap_err(), MappingError::EmptyName);
        assert!(map.is_empty());
    }

    #[test]
    fn name_can_be_reused_after_removal() {
        let mut map = mapping();
        map.create("Colour", "Red", "Attribute").unwrap();
        map.remove("Colour").unwrap();

        map.create("Colour", "Blue", "Attribute").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Colour").unwrap().value(), "Blue");
    }

    #[test]
    fn lookup_errors() {
        let mut map = mapping();
        map.create("Colour", "Red", "Attribute").unwrap();

        assert_eq!(
            map.get("Size").unwrap_err(),
            MappingError::NotFound("Size".to_string())
        );
        assert_eq!(
            map.get(3_usize).unwrap_err(),
            MappingError::IndexOutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn removed_property_stays_visible_to_iteration() {
        let mut map = mapping();
        map.create("Colour", "Red", "Attribute").unwrap();
        map.create("Size", "XL", "Attribute").unwrap();
        map.remove("Colour").unwrap();

        assert_eq!(map.iter().count(), 2);
        assert_eq!(map.active().count(), 1);
        assert!(map.get(0_usize).unwrap().is_pending_delete());
        assert!(map.get("Colour").is_err());
        assert!(!map.contains("Colour"));
    }

    #[test]
    fn to_map_skips_pending_deletes_and_keeps_order() {
        let mut map = mapping();
        map.create("Size", "XL", "Attribute").unwrap();
        map.create("Colour", "Red", "Attribute").unwrap();
        map.create("Brand", "Acme", "Attribute").unwrap();
        map.remove(1_usize).unwrap();

        let flat = map.to_map();
        let names: Vec<_> = flat.keys().cloned().collect();
        assert_eq!(names, vec!["Size", "Brand"]);
        assert_eq!(flat["Brand"], "Acme");

        let summaries = map.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Size");
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut map = mapping();
        map.create("Size", "XL", "Attribute").unwrap();

        let prop = map.get_mut("Size").unwrap();
        prop.set_value("L");
        prop.set_property_type("Specification");

        let prop = map.get("Size").unwrap();
        assert_eq!(prop.value(), "L");
        assert_eq!(prop.property_type(), "Specification");
    }
}
