use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use thiserror::Error;

use crate::async_store::AsyncPropertyStore;
use crate::id::StockItemId;
use crate::mapping::{ExtendedPropertyMapping, MappingError, PropertySummary};
use crate::property::ExtendedProperty;
use crate::sync::{SyncError, SyncReport};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("unknown item field: {0}")]
    UnknownField(String),
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: ItemField, value: String },
}

/// Editable fields of an inventory item, named as the API names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Sku,
    Title,
    Barcode,
    PurchasePrice,
    RetailPrice,
    Quantity,
    TaxRate,
    VariationGroupName,
    MetaData,
    CategoryId,
    PackageGroupId,
    PostalServiceId,
    Weight,
    Width,
    Depth,
    Height,
}

impl ItemField {
    /// Fields sent when an item is first created.
    pub const CREATE: [ItemField; 7] = [
        ItemField::Sku,
        ItemField::Title,
        ItemField::Barcode,
        ItemField::PurchasePrice,
        ItemField::RetailPrice,
        ItemField::Quantity,
        ItemField::TaxRate,
    ];

    /// Every editable field, in the order updates send them.
    pub const ALL: [ItemField; 16] = [
        ItemField::Sku,
        ItemField::Title,
        ItemField::Barcode,
        ItemField::PurchasePrice,
        ItemField::RetailPrice,
        ItemField::Quantity,
        ItemField::TaxRate,
        ItemField::VariationGroupName,
        ItemField::MetaData,
        ItemField::CategoryId,
        ItemField::PackageGroupId,
        ItemField::PostalServiceId,
        ItemField::Weight,
        ItemField::Width,
        ItemField::Depth,
        ItemField::Height,
    ];

    pub fn api_name(self) -> &'static str {
        match self {
            ItemField::Sku => "ItemNumber",
            ItemField::Title => "ItemTitle",
            ItemField::Barcode => "BarcodeNumber",
            ItemField::PurchasePrice => "PurchasePrice",
            ItemField::RetailPrice => "RetailPrice",
            ItemField::Quantity => "Quantity",
            ItemField::TaxRate => "TaxRate",
            ItemField::VariationGroupName => "VariationGroupName",
            ItemField::MetaData => "MetaData",
            ItemField::CategoryId => "CategoryId",
            ItemField::PackageGroupId => "PackageGroupId",
            ItemField::PostalServiceId => "PostalServiceId",
            ItemField::Weight => "Weight",
            ItemField::Width => "Width",
            ItemField::Depth => "Depth",
            ItemField::Height => "Height",
        }
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for ItemField {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemField::ALL
            .into_iter()
            .find(|field| field.api_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ItemError::UnknownField(s.to_string()))
    }
}

/// An inventory item and its extended properties.
///
/// The stock id is fixed at construction; the extended property mapping is
/// keyed by it and loaded lazily on first use.
#[derive(Debug, Clone)]
pub struct InventoryItem {
    stock_id: StockItemId,
    pub sku: String,
    pub title: String,
    pub barcode: String,
    pub purchase_price: f64,
    pub retail_price: f64,
    pub quantity: i64,
    pub tax_rate: f64,
    pub variation_group_name: String,
    pub meta_data: String,
    pub category_id: String,
    pub package_group_id: String,
    pub postal_service_id: String,
    pub weight: f64,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    /// Display names resolved from lookup tables, when known.
    pub category: Option<String>,
    pub package_group: Option<String>,
    pub postal_service: Option<String>,
    extended_properties: ExtendedPropertyMapping,
}

impl InventoryItem {
    pub fn new(stock_id: StockItemId) -> Self {
        Self {
            extended_properties: ExtendedPropertyMapping::new(stock_id.clone()),
            stock_id,
            sku: String::new(),
            title: String::new(),
            barcode: String::new(),
            purchase_price: 0.0,
            retail_price: 0.0,
            quantity: 0,
            tax_rate: 0.0,
            variation_group_name: String::new(),
            meta_data: String::new(),
            category_id: String::new(),
            package_group_id: String::new(),
            postal_service_id: String::new(),
            weight: 0.0,
            width: 0.0,
            depth: 0.0,
            height: 0.0,
            category: None,
            package_group: None,
            postal_service: None,
        }
    }

    /// An item with a freshly generated stock id, not yet created remotely.
    pub fn new_local() -> Self {
        Self::new(StockItemId::generate())
    }

    pub fn stock_id(&self) -> &StockItemId {
        &self.stock_id
    }

    /// Reads a field in its wire (string) form.
    pub fn field(&self, field: ItemField) -> String {
        match field {
            ItemField::Sku => self.sku.clone(),
            ItemField::Title => self.title.clone(),
            ItemField::Barcode => self.barcode.clone(),
            ItemField::PurchasePrice => self.purchase_price.to_string(),
            ItemField::RetailPrice => self.retail_price.to_string(),
            ItemField::Quantity => self.quantity.to_string(),
            ItemField::TaxRate => self.tax_rate.to_string(),
            ItemField::VariationGroupName => self.variation_group_name.clone(),
            ItemField::MetaData => self.meta_data.clone(),
            ItemField::CategoryId => self.category_id.clone(),
            ItemField::PackageGroupId => self.package_group_id.clone(),
            ItemField::PostalServiceId => self.postal_service_id.clone(),
            ItemField::Weight => self.weight.to_string(),
            ItemField::Width => self.width.to_string(),
            ItemField::Depth => self.depth.to_string(),
            ItemField::Height => self.height.to_string(),
        }
    }

    /// Sets a field from its wire (string) form. Numeric fields must parse.
    pub fn set_field(&mut self, field: ItemField, value: &str) -> Result<(), ItemError> {
        match field {
            ItemField::Sku => self.sku = value.to_string(),
            ItemField::Title => self.title = value.to_string(),
            ItemField::Barcode => self.barcode = value.to_string(),
            ItemField::PurchasePrice => self.purchase_price = parse(field, value)?,
            ItemField::RetailPrice => self.retail_price = parse(field, value)?,
            ItemField::Quantity => self.quantity = parse(field, value)?,
            ItemField::TaxRate => self.tax_rate = parse(field, value)?,
            ItemField::VariationGroupName => self.variation_group_name = value.to_string(),
            ItemField::MetaData => self.meta_data = value.to_string(),
            ItemField::CategoryId => self.category_id = value.to_string(),
            ItemField::PackageGroupId => self.package_group_id = value.to_string(),
            ItemField::PostalServiceId => self.postal_service_id = value.to_string(),
            ItemField::Weight => self.weight = parse(field, value)?,
            ItemField::Width => self.width = parse(field, value)?,
            ItemField::Depth => self.depth = parse(field, value)?,
            ItemField::Height => self.height = parse(field, value)?,
        }
        Ok(())
    }

    pub fn extended_properties(&self) -> &ExtendedPropertyMapping {
        &self.extended_properties
    }

    pub fn extended_properties_mut(&mut self) -> &mut ExtendedPropertyMapping {
        &mut self.extended_properties
    }

    /// Returns the mapping, loading it from the store on first use.
    ///
    /// Properties created before the first load are kept and merged after
    /// the stored ones.
    pub async fn loaded_extended_properties<S: AsyncPropertyStore>(
        &mut self,
        store: &S,
    ) -> Result<&mut ExtendedPropertyMapping, SyncError<S::Error>> {
        if !self.extended_properties.is_loaded() {
            self.extended_properties.load_keeping_local(store).await?;
        }
        Ok(&mut self.extended_properties)
    }

    /// Refetches the mapping, discarding unsynced local edits.
    pub async fn reload_extended_properties<S: AsyncPropertyStore>(
        &mut self,
        store: &S,
    ) -> Result<(), SyncError<S::Error>> {
        self.extended_properties.load(store).await
    }

    pub fn create_extended_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Result<&mut ExtendedProperty, MappingError> {
        self.extended_properties.create(name, value, property_type)
    }

    pub fn extended_properties_map(&self) -> IndexMap<String, String> {
        self.extended_properties.to_map()
    }

    pub fn extended_properties_list(&self) -> Vec<PropertySummary> {
        self.extended_properties.summaries()
    }

    /// Syncs the mapping, loading it first if that has not happened yet.
    pub async fn sync_extended_properties<S: AsyncPropertyStore>(
        &mut self,
        store: &S,
    ) -> Result<SyncReport, SyncError<S::Error>> {
        self.loaded_extended_properties(store).await?.sync(store).await
    }
}

impl fmt::Display for InventoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sku, self.title)
    }
}

fn parse<T: FromStr>(field: ItemField, value: &str) -> Result<T, ItemError> {
    value.trim().parse().map_err(|_| ItemError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
