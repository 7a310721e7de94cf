//! Extended property endpoints, exposed as an [`AsyncPropertyStore`].

use linnapi_core::{AsyncPropertyStore, PropertyPayload, RemoteRecord, StockItemId};
use tracing::instrument;

use crate::client::LinnworksClient;
use crate::convert::{payload_to_record, record_to_remote};
use crate::error::ApiError;
use crate::types::ExtendedPropertyRecord;

const GET_PROPERTIES: &str = "/api/Inventory/GetInventoryItemExtendedProperties";
const CREATE_PROPERTIES: &str = "/api/Inventory/CreateInventoryItemExtendedProperties";
const UPDATE_PROPERTIES: &str = "/api/Inventory/UpdateInventoryItemExtendedProperties";
const DELETE_PROPERTIES: &str = "/api/Inventory/DeleteInventoryItemExtendedProperties";

fn encode_records(records: &[PropertyPayload]) -> Result<String, ApiError> {
    let wire: Vec<ExtendedPropertyRecord> = records.iter().map(payload_to_record).collect();
    Ok(serde_json::to_string(&wire)?)
}

impl AsyncPropertyStore for LinnworksClient {
    type Error = ApiError;

    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn async_fetch(&self, item_id: &StockItemId) -> Result<Vec<RemoteRecord>, ApiError> {
        let records: Vec<ExtendedPropertyRecord> = self
            .request(GET_PROPERTIES, &[("inventoryItemId", item_id.to_string())])
            .await?;
        Ok(records.into_iter().map(record_to_remote).collect())
    }

    #[instrument(skip(self, records), fields(item_id = %item_id, count = records.len()))]
    async fn async_create_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> Result<Vec<String>, ApiError> {
        let created: Vec<ExtendedPropertyRecord> = self
            .request(
                CREATE_PROPERTIES,
                &[("inventoryItemExtendedProperties", encode_records(records)?)],
            )
            .await?;

        created
            .into_iter()
            .map(|record| record.row_id.ok_or(ApiError::MissingField("pkRowId")))
            .collect()
    }

    #[instrument(skip(self, records), fields(item_id = %item_id, count = records.len()))]
    async fn async_update_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> Result<(), ApiError> {
        self.request_empty(
            UPDATE_PROPERTIES,
            &[("inventoryItemExtendedProperties", encode_records(records)?)],
        )
        .await
    }

    #[instrument(skip(self, ids), fields(item_id = %item_id, count = ids.len()))]
    async fn async_delete_batch(&self, item_id: &StockItemId, ids: &[String]) -> Result<(), ApiError> {
        self.request_empty(
            DELETE_PROPERTIES,
            &[
                ("inventoryItemId", item_id.to_string()),
                ("inventoryItemExtendedPropertyIds", serde_json::to_string(ids)?),
            ],
        )
        .await
    }
}
