use linnapi_core::{InventoryItem, ItemField, StockItemId, SyncReport};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use crate::client::LinnworksClient;
use crate::convert::{item_from_record, item_to_json};
use crate::error::{ApiError, UpdateError};
use crate::lookup::{LookupEntry, LookupTable};
use crate::types::{
    CategoryRecord, ChannelRecord, InventoryItemsPage, ItemDescription, PackageGroupRecord,
    ShippingServiceRecord, StockItemRecord, StockLocationRecord,
};

impl LinnworksClient {
    /// Fetches an item, resolving category, package group and postal
    /// service names from their lookup tables.
    #[instrument(skip(self), fields(stock_id = %stock_id))]
    pub async fn get_inventory_item(&self, stock_id: &StockItemId) -> Result<InventoryItem, ApiError> {
        let record: StockItemRecord = self
            .request(
                "/api/Inventory/GetInventoryItemById",
                &[("id", stock_id.to_string())],
            )
            .await?;
        let mut item = item_from_record(stock_id.clone(), record);

        let categories = self.get_categories().await?;
        item.category = categories.name_for(&item.category_id).map(str::to_string);

        let package_groups = self.get_package_groups().await?;
        item.package_group = package_groups
            .name_for(&item.package_group_id)
            .map(str::to_string);

        let postal_services = self.get_postal_services().await?;
        item.postal_service = postal_services
            .name_for(&item.postal_service_id)
            .map(str::to_string);

        Ok(item)
    }

    /// Fetches the item whose SKU is exactly `sku`.
    pub async fn get_inventory_item_by_sku(&self, sku: &str) -> Result<InventoryItem, ApiError> {
        let stock_id = self.get_inventory_item_id_by_sku(sku).await?;
        self.get_inventory_item(&stock_id).await
    }

    /// Finds the stock id of the item whose SKU is exactly `sku`.
    #[instrument(skip(self))]
    pub async fn get_inventory_item_id_by_sku(&self, sku: &str) -> Result<StockItemId, ApiError> {
        let mut view = self.get_new_inventory_view().await?;
        view.insert("Columns".to_string(), json!([]));
        view.insert(
            "Filters".to_string(),
            json!([{
                "Value": sku,
                "Field": "String",
                "FilterName": "SKU",
                "FilterNameExact": "",
                "Condition": "Equals"
            }]),
        );

        let locations = self.get_stock_locations().await?;
        let page: InventoryItemsPage = self
            .request(
                "/api/Inventory/GetInventoryItems",
                &[
                    ("view", serde_json::to_string(&view)?),
                    ("stockLocationIds", serde_json::to_string(&locations.ids())?),
                    ("startIndex", "0".to_string()),
                    ("itemsCount", "1".to_string()),
                ],
            )
            .await?;

        let row = page.items.into_iter().next().ok_or_else(|| ApiError::SkuNotFound {
            kind: "inventory item",
            sku: sku.to_string(),
        })?;
        debug!(stock_id = %row.id, "resolved SKU");
        Ok(StockItemId::new(row.id))
    }

    /// The server's default inventory view, used as a base for filtered queries.
    pub async fn get_new_inventory_view(&self) -> Result<Map<String, Value>, ApiError> {
        self.request("/api/Inventory/GetNewInventoryView", &[]).await
    }

    /// Channel-specific descriptions of an item.
    pub async fn get_inventory_item_descriptions(
        &self,
        stock_id: &StockItemId,
    ) -> Result<Vec<ItemDescription>, ApiError> {
        self.request(
            "/api/Inventory/GetInventoryItemDescriptions",
            &[("inventoryItemId", stock_id.to_string())],
        )
        .await
    }

    /// Sales channels, each as `"{source} {sub source}"`.
    pub async fn get_channels(&self) -> Result<Vec<String>, ApiError> {
        let channels: Vec<ChannelRecord> = self.request("/api/Inventory/GetChannels", &[]).await?;
        Ok(channels
            .into_iter()
            .map(|c| format!("{} {}", c.source, c.sub_source))
            .collect())
    }

    /// Creates the item remotely from its basic fields.
    #[instrument(skip(self, item), fields(stock_id = %item.stock_id()))]
    pub async fn add_inventory_item(&self, item: &InventoryItem) -> Result<(), ApiError> {
        let body = item_to_json(item, &ItemField::CREATE);
        self.request_empty(
            "/api/Inventory/AddInventoryItem",
            &[("inventoryItem", serde_json::to_string(&body)?)],
        )
        .await
    }

    /// Overwrites every editable field of the item remotely.
    #[instrument(skip(self, item), fields(stock_id = %item.stock_id()))]
    pub async fn update_inventory_item(&self, item: &InventoryItem) -> Result<(), ApiError> {
        let body = item_to_json(item, &ItemField::ALL);
        self.request_empty(
            "/api/Inventory/UpdateInventoryItem",
            &[("inventoryItem", serde_json::to_string(&body)?)],
        )
        .await
    }

    /// Updates the item, then syncs its extended properties.
    pub async fn update_all(&self, item: &mut InventoryItem) -> Result<SyncReport, UpdateError> {
        self.update_inventory_item(item)
            .await
            .map_err(UpdateError::Item)?;
        let report = item.sync_extended_properties(self).await?;
        info!(stock_id = %item.stock_id(), ?report, "item updated");
        Ok(report)
    }

    pub async fn get_categories(&self) -> Result<LookupTable, ApiError> {
        let records: Vec<CategoryRecord> = self.request("/api/Inventory/GetCategories", &[]).await?;
        Ok(records
            .into_iter()
            .map(|r| LookupEntry {
                id: r.category_id,
                name: r.category_name,
            })
            .collect())
    }

    pub async fn get_stock_locations(&self) -> Result<LookupTable, ApiError> {
        let records: Vec<StockLocationRecord> =
            self.request("/api/Inventory/GetStockLocations", &[]).await?;
        Ok(records
            .into_iter()
            .map(|r| LookupEntry {
                id: r.stock_location_id,
                name: r.location_name,
            })
            .collect())
    }

    pub async fn get_package_groups(&self) -> Result<LookupTable, ApiError> {
        let records: Vec<PackageGroupRecord> =
            self.request("/api/Inventory/GetPackageGroups", &[]).await?;
        Ok(records
            .into_iter()
            .map(|r| LookupEntry {
                id: r.value,
                name: r.key,
            })
            .collect())
    }

    /// Postal services, flattened across shipping vendors.
    pub async fn get_postal_services(&self) -> Result<LookupTable, ApiError> {
        let services: Vec<ShippingServiceRecord> =
            self.request("/api/Orders/GetShippingMethods", &[]).await?;
        Ok(services
            .into_iter()
            .flat_map(|s| s.postal_services)
            .map(|p| LookupEntry {
                id: p.id,
                name: p.name,
            })
            .collect())
    }

    /// Names of every extended property in use across the inventory.
    pub async fn get_extended_property_names(&self) -> Result<Vec<String>, ApiError> {
        self.request("/api/Inventory/GetExtendedPropertyNames", &[])
            .await
    }

    /// Asks the server for an unused SKU.
    pub async fn get_new_sku(&self) -> Result<String, ApiError> {
        self.request("/api/Stock/GetNewSKU", &[]).await
    }

    pub async fn sku_exists(&self, sku: &str) -> Result<bool, ApiError> {
        self.request("/api/Stock/SKUExists", &[("SKU", sku.to_string())])
            .await
    }
}
