use serde::{Deserialize, Serialize};

/// An authenticated session against one API server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Base URL that API calls go to, as returned by authorization.
    pub server: String,
    pub user_id: String,
}

/// Login credentials. The password is redacted from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Account {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Authorization {
    pub token: Option<String>,
    pub server: Option<String>,
}

/// Extended property as the API encodes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPropertyRecord {
    #[serde(rename = "pkRowId", default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(rename = "fkStockItemId", default, skip_serializing_if = "Option::is_none")]
    pub stock_item_id: Option<String>,
    // sic: the API spells it this way
    #[serde(rename = "ProperyName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "PropertyValue", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "PropertyType", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
}

/// Inventory item as returned by `GetInventoryItemById`. Any field may be null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StockItemRecord {
    pub item_number: Option<String>,
    pub item_title: Option<String>,
    pub barcode_number: Option<String>,
    pub purchase_price: Option<f64>,
    pub retail_price: Option<f64>,
    pub quantity: Option<i64>,
    pub tax_rate: Option<f64>,
    pub variation_group_name: Option<String>,
    pub meta_data: Option<String>,
    pub category_id: Option<String>,
    pub package_group_id: Option<String>,
    pub postal_service_id: Option<String>,
    pub weight: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CategoryRecord {
    pub category_id: String,
    pub category_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct StockLocationRecord {
    pub stock_location_id: String,
    pub location_name: String,
}

/// Package groups come back as key/value pairs: name in `Key`, id in `Value`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PackageGroupRecord {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ShippingServiceRecord {
    #[serde(default)]
    pub postal_services: Vec<PostalServiceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostalServiceRecord {
    #[serde(rename = "pkPostalServiceId")]
    pub id: String,
    #[serde(rename = "PostalServiceName")]
    pub name: String,
}

/// One page of `GetInventoryItems`; only the ids are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct InventoryItemsPage {
    #[serde(default)]
    pub items: Vec<InventoryItemRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct InventoryItemRow {
    pub id: String,
}

/// One page of `SearchVariationGroups`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct VariationGroupPage {
    #[serde(default)]
    pub data: Vec<VariationGroupRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VariationGroupRow {
    #[serde(rename = "pkVariationItemId")]
    pub id: String,
}

/// Template sent to `CreateVariationGroup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct VariationGroupTemplate {
    #[serde(rename = "ParentSKU")]
    pub parent_sku: String,
    pub parent_stock_item_id: String,
    pub variation_group_name: String,
    pub variation_item_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ChannelRecord {
    pub source: String,
    pub sub_source: String,
}

/// A channel-specific description of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ItemDescription {
    #[serde(rename = "pkRowId")]
    pub row_id: Option<String>,
    #[serde(rename = "Source")]
    pub source: Option<String>,
    #[serde(rename = "SubSource")]
    pub sub_source: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
}
