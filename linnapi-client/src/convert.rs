use linnapi_core::{InventoryItem, ItemField, PropertyId, PropertyPayload, RemoteRecord, StockItemId};
use serde_json::{Map, Value};

use crate::types::{ExtendedPropertyRecord, StockItemRecord};

/// Converts a fetched wire record into the store-facing shape.
pub fn record_to_remote(record: ExtendedPropertyRecord) -> RemoteRecord {
    RemoteRecord {
        id: record.row_id,
        name: record.name,
        value: record.value,
        property_type: record.property_type,
    }
}

/// Converts a batch payload into the wire record.
///
/// Local tokens are left out: the server assigns row ids on create.
pub fn payload_to_record(payload: &PropertyPayload) -> ExtendedPropertyRecord {
    let row_id = match &payload.id {
        PropertyId::Remote(id) => Some(id.clone()),
        PropertyId::Local(_) => None,
    };
    ExtendedPropertyRecord {
        row_id,
        stock_item_id: Some(payload.item_id.to_string()),
        name: Some(payload.name.clone()),
        value: Some(payload.value.clone()),
        property_type: Some(payload.property_type.clone()),
    }
}

/// Builds an item from a `GetInventoryItemById` response.
pub fn item_from_record(stock_id: StockItemId, record: StockItemRecord) -> InventoryItem {
    let mut item = InventoryItem::new(stock_id);
    item.sku = record.item_number.unwrap_or_default();
    item.title = record.item_title.unwrap_or_default();
    item.barcode = record.barcode_number.unwrap_or_default();
    item.purchase_price = record.purchase_price.unwrap_or_default();
    item.retail_price = record.retail_price.unwrap_or_default();
    item.quantity = record.quantity.unwrap_or_default();
    item.tax_rate = record.tax_rate.unwrap_or_default();
    item.variation_group_name = record.variation_group_name.unwrap_or_default();
    item.meta_data = record.meta_data.unwrap_or_default();
    item.category_id = record.category_id.unwrap_or_default();
    item.package_group_id = record.package_group_id.unwrap_or_default();
    item.postal_service_id = record.postal_service_id.unwrap_or_default();
    item.weight = record.weight.unwrap_or_default();
    item.width = record.width.unwrap_or_default();
    item.depth = record.depth.unwrap_or_default();
    item.height = record.height.unwrap_or_default();
    item
}

/// Builds the `inventoryItem` JSON object from the given fields.
///
/// The API expects every value as a string, plus the item's `StockItemId`.
pub fn item_to_json(item: &InventoryItem, fields: &[ItemField]) -> Value {
    let mut object = Map::new();
    for &field in fields {
        object.insert(field.api_name().to_string(), Value::String(item.field(field)));
    }
    object.insert(
        "StockItemId".to_string(),
        Value::String(item.stock_id().to_string()),
    );
    Value::Object(object)
}
