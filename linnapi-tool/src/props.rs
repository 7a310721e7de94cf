use linnapi_core::{DEFAULT_PROPERTY_TYPE, ExtendedPropertyMapping, MappingError, PropertySummary};

/// Edits the named property, or creates it if the item has none by that name.
///
/// An edit keeps the existing type unless one is given.
pub fn upsert(
    mapping: &mut ExtendedPropertyMapping,
    name: &str,
    value: &str,
    property_type: Option<&str>,
) -> Result<(), MappingError> {
    if mapping.contains(name) {
        let property = mapping.get_mut(name)?;
        property.set_value(value);
        if let Some(property_type) = property_type {
            property.set_property_type(property_type);
        }
        return Ok(());
    }

    mapping.create(name, value, property_type.unwrap_or(DEFAULT_PROPERTY_TYPE))?;
    Ok(())
}

pub fn format_summaries(summaries: &[PropertySummary]) -> String {
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    summaries
        .iter()
        .map(|s| format!("{:width$}  {}  ({})", s.name, s.value, s.property_type))
        .collect::<Vec<_>>()
        .join("\n")
}
