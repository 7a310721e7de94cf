//! Variation groups: a parent item tying several stock items together.

use linnapi_core::{InventoryItem, StockItemId};
use tracing::{debug, instrument};

use crate::client::LinnworksClient;
use crate::error::ApiError;
use crate::types::{VariationGroupPage, VariationGroupTemplate};

impl LinnworksClient {
    /// Creates a variation group over `variation_ids` and returns the parent's stock id.
    ///
    /// Without an explicit parent id a fresh one is generated; without a
    /// parent SKU one is requested from the server.
    #[instrument(skip(self, variation_ids), fields(count = variation_ids.len()))]
    pub async fn create_variation_group(
        &self,
        title: &str,
        variation_ids: &[StockItemId],
        parent_id: Option<StockItemId>,
        parent_sku: Option<String>,
    ) -> Result<StockItemId, ApiError> {
        let parent_id = parent_id.unwrap_or_else(StockItemId::generate);
        let parent_sku = match parent_sku {
            Some(sku) => sku,
            None => self.get_new_sku().await?,
        };

        let template = VariationGroupTemplate {
            parent_sku,
            variation_group_name: title.to_string(),
            parent_stock_item_id: parent_id.to_string(),
            variation_item_ids: variation_ids.iter().map(ToString::to_string).collect(),
        };
        self.request_empty(
            "/api/Stock/CreateVariationGroup",
            &[("template", serde_json::to_string(&template)?)],
        )
        .await?;

        debug!(parent_id = %parent_id, "variation group created");
        Ok(parent_id)
    }

    /// Finds the parent stock id of the variation group with SKU `sku`.
    #[instrument(skip(self))]
    pub async fn get_variation_group_id_by_sku(&self, sku: &str) -> Result<StockItemId, ApiError> {
        let page: VariationGroupPage = self
            .request(
                "/api/Stock/SearchVariationGroups",
                &[
                    ("searchText", sku.to_string()),
                    ("searchType", "ParentSKU".to_string()),
                    ("entriesPerPage", "100".to_string()),
                    ("pageNumber", "1".to_string()),
                ],
            )
            .await?;

        page.data
            .into_iter()
            .next()
            .map(|row| StockItemId::new(row.id))
            .ok_or_else(|| ApiError::SkuNotFound {
                kind: "variation group",
                sku: sku.to_string(),
            })
    }

    /// Fetches the parent item of the variation group with SKU `sku`.
    pub async fn get_variation_group_item_by_sku(&self, sku: &str) -> Result<InventoryItem, ApiError> {
        let stock_id = self.get_variation_group_id_by_sku(sku).await?;
        self.get_inventory_item(&stock_id).await
    }
}
