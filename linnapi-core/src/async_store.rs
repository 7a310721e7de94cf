use std::future::Future;

use crate::id::StockItemId;
use crate::property::{PropertyPayload, RemoteRecord};
use crate::store::PropertyStore;

/// Async counterpart of [`PropertyStore`].
///
/// Network-backed stores implement this directly. Methods are prefixed with
/// `async_` to avoid name collisions when a type implements both traits.
pub trait AsyncPropertyStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn async_fetch(
        &self,
        item_id: &StockItemId,
    ) -> impl Future<Output = Result<Vec<RemoteRecord>, Self::Error>> + Send;

    fn async_create_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;

    fn async_update_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn async_delete_batch(
        &self,
        item_id: &StockItemId,
        ids: &[String],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Blanket impl: any blocking `PropertyStore` is also an `AsyncPropertyStore`.
impl<S: PropertyStore + Send + Sync> AsyncPropertyStore for S {
    type Error = S::Error;

    async fn async_fetch(&self, item_id: &StockItemId) -> Result<Vec<RemoteRecord>, Self::Error> {
        self.fetch(item_id)
    }

    async fn async_create_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> Result<Vec<String>, Self::Error> {
        self.create_batch(item_id, records)
    }

    async fn async_update_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> Result<(), Self::Error> {
        self.update_batch(item_id, records)
    }

    async fn async_delete_batch(&self, item_id: &StockItemId, ids: &[String]) -> Result<(), Self::Error> {
        self.delete_batch(item_id, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPropertyStore;

    #[tokio::test]
    async fn property_store_as_async_store() {
        let store = MemoryPropertyStore::new();
        let item = StockItemId::new("item-1");
        store.insert(
            item.clone(),
            vec![RemoteRecord::new("row-1", "Colour", "Red", "Attribute")],
        );

        let records = store.async_fetch(&item).await.unwrap();
        assert_eq!(records.len(), 1);

        store
            .async_delete_batch(&item, &["row-1".to_string()])
            .await
            .unwrap();
        assert!(store.async_fetch(&item).await.unwrap().is_empty());
    }
}
