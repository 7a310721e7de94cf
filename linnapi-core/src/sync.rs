//! Reconciliation of an item's extended properties with a remote store.
//!
//! A sync pass partitions the mapping by identity and deletion intent, then
//! issues at most three batch calls in a fixed order:
//!
//! 1. **create** every local, live property; issued ids replace local tokens
//! 2. **update** every persisted, live property (there is no per-field dirty
//!    tracking, so unchanged properties are resubmitted too)
//! 3. **delete** every persisted property marked for deletion
//!
//! Local properties marked for deletion are dropped without a call. Each
//! stage is an independent remote call; a failure aborts the stages after it
//! and leaves earlier stages applied, so calling `sync` again picks up
//! exactly the remaining work.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::async_store::AsyncPropertyStore;
use crate::id::PropertyId;
use crate::mapping::{ExtendedPropertyMapping, MappingError};
use crate::property::{ExtendedProperty, PropertyError, PropertyPayload};

/// One of the three remote batches of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStage {
    Create,
    Update,
    Delete,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::Create => write!(f, "create"),
            SyncStage::Update => write!(f, "update"),
            SyncStage::Delete => write!(f, "delete"),
        }
    }
}

/// Error during load or sync, generic over the store's error type.
#[derive(Debug, thiserror::Error)]
pub enum SyncError<E> {
    #[error("failed to load extended properties: {0}")]
    Load(#[source] E),
    #[error(transparent)]
    MalformedRecord(#[from] PropertyError),
    #[error("local edit conflicts with stored properties: {0}")]
    LocalConflict(#[from] MappingError),
    #[error("{stage} batch failed: {source}")]
    PartialSync {
        stage: SyncStage,
        #[source]
        source: E,
    },
    #[error("create batch returned {returned} ids for {submitted} properties")]
    CreateResponseMismatch { submitted: usize, returned: usize },
}

impl<E> SyncError<E> {
    /// The batch that failed, if this is a batch failure.
    pub fn stage(&self) -> Option<SyncStage> {
        match self {
            SyncError::PartialSync { stage, .. } => Some(*stage),
            SyncError::CreateResponseMismatch { .. } => Some(SyncStage::Create),
            SyncError::Load(_) | SyncError::MalformedRecord(_) | SyncError::LocalConflict(_) => None,
        }
    }
}

/// The partition a sync pass would act on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub create: Vec<PropertyId>,
    pub update: Vec<PropertyId>,
    pub delete: Vec<PropertyId>,
    /// Local properties marked for deletion, dropped without a call.
    pub discard: Vec<PropertyId>,
}

impl SyncPlan {
    /// Number of remote calls the plan needs.
    pub fn remote_calls(&self) -> usize {
        [&self.create, &self.update, &self.delete]
            .iter()
            .filter(|batch| !batch.is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.remote_calls() == 0 && self.discard.is_empty()
    }
}

/// What a completed sync pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub discarded: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        *self == SyncReport::default()
    }
}

#[derive(Clone, Copy)]
enum Bucket {
    Create,
    Update,
    Delete,
    Discard,
}

fn bucket(property: &ExtendedProperty) -> Bucket {
    match (property.id(), property.is_pending_delete()) {
        (PropertyId::Local(_), false) => Bucket::Create,
        (PropertyId::Remote(_), false) => Bucket::Update,
        (PropertyId::Remote(_), true) => Bucket::Delete,
        (PropertyId::Local(_), true) => Bucket::Discard,
    }
}

impl ExtendedPropertyMapping {
    /// Replaces the collection with the store's current state.
    ///
    /// Every record is converted before anything is replaced, so on error
    /// the mapping is left as it was.
    #[instrument(skip(self, store), fields(item_id = %self.item_id()))]
    pub async fn load<S: AsyncPropertyStore>(&mut self, store: &S) -> Result<(), SyncError<S::Error>> {
        let records = store
            .async_fetch(self.item_id())
            .await
            .map_err(SyncError::Load)?;

        let properties = records
            .into_iter()
            .map(ExtendedProperty::from_remote)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = properties.len(), "loaded extended properties");
        self.replace_all(properties);
        Ok(())
    }

    /// First load for a mapping that may already hold local creates.
    ///
    /// Local, live properties are kept after the stored ones; local
    /// properties marked for deletion are dropped. A local name that is
    /// already stored fails with [`SyncError::LocalConflict`] and leaves the
    /// mapping as it was.
    #[instrument(skip(self, store), fields(item_id = %self.item_id()))]
    pub async fn load_keeping_local<S: AsyncPropertyStore>(
        &mut self,
        store: &S,
    ) -> Result<(), SyncError<S::Error>> {
        let records = store
            .async_fetch(self.item_id())
            .await
            .map_err(SyncError::Load)?;

        let mut properties = records
            .into_iter()
            .map(ExtendedProperty::from_remote)
            .collect::<Result<Vec<_>, _>>()?;

        let local: Vec<&ExtendedProperty> = self
            .properties
            .iter()
            .filter(|p| matches!(bucket(p), Bucket::Create))
            .collect();
        if let Some(clash) = local
            .iter()
            .find(|p| properties.iter().any(|stored| stored.name() == p.name()))
        {
            return Err(MappingError::DuplicateName(clash.name().to_string()).into());
        }

        debug!(
            count = properties.len(),
            kept = local.len(),
            "loaded extended properties"
        );
        properties.extend(local.into_iter().cloned());
        self.replace_all(properties);
        Ok(())
    }

    /// Computes the partition without touching the store.
    pub fn plan(&self) -> SyncPlan {
        let mut plan = SyncPlan::default();
        for property in self.iter() {
            let id = property.id().clone();
            match bucket(property) {
                Bucket::Create => plan.create.push(id),
                Bucket::Update => plan.update.push(id),
                Bucket::Delete => plan.delete.push(id),
                Bucket::Discard => plan.discard.push(id),
            }
        }
        plan
    }

    /// Pushes local state to the store: create, then update, then delete.
    #[instrument(skip(self, store), fields(item_id = %self.item_id()))]
    pub async fn sync<S: AsyncPropertyStore>(
        &mut self,
        store: &S,
    ) -> Result<SyncReport, SyncError<S::Error>> {
        let mut report = SyncReport::default();

        let before = self.properties.len();
        self.properties
            .retain(|p| !matches!(bucket(p), Bucket::Discard));
        report.discarded = before - self.properties.len();

        // Partition once, up front: properties created below must not be
        // picked up again by the update stage of the same pass.
        let mut create = Vec::new();
        let mut update = Vec::new();
        let mut delete = Vec::new();
        for (index, property) in self.properties.iter().enumerate() {
            match bucket(property) {
                Bucket::Create => create.push(index),
                Bucket::Update => update.push(index),
                Bucket::Delete => delete.push(index),
                Bucket::Discard => unreachable!("discarded above"),
            }
        }

        let item_id = self.item_id().clone();

        if !create.is_empty() {
            let payloads = self.payloads(&create);
            debug!(count = payloads.len(), "submitting create batch");
            let ids = store
                .async_create_batch(&item_id, &payloads)
                .await
                .map_err(|source| fail(SyncStage::Create, source))?;

            if ids.len() != create.len() {
                warn!(submitted = create.len(), returned = ids.len(), "create response mismatch");
                return Err(SyncError::CreateResponseMismatch {
                    submitted: create.len(),
                    returned: ids.len(),
                });
            }
            for (&index, id) in create.iter().zip(ids) {
                self.properties[index].assign_remote_id(id);
            }
            report.created = create.len();
            info!(count = report.created, "created extended properties");
        }

        if !update.is_empty() {
            let payloads = self.payloads(&update);
            debug!(count = payloads.len(), "submitting update batch");
            store
                .async_update_batch(&item_id, &payloads)
                .await
                .map_err(|source| fail(SyncStage::Update, source))?;
            report.updated = update.len();
            info!(count = report.updated, "updated extended properties");
        }

        if !delete.is_empty() {
            let ids: Vec<String> = delete
                .iter()
                .filter_map(|&index| self.properties[index].id().as_remote())
                .map(str::to_string)
                .collect();
            debug!(count = ids.len(), "submitting delete batch");
            store
                .async_delete_batch(&item_id, &ids)
                .await
                .map_err(|source| fail(SyncStage::Delete, source))?;

            let deleted: HashSet<&str> = ids.iter().map(String::as_str).collect();
            self.properties.retain(|p| {
                !(p.is_pending_delete() && p.id().as_remote().is_some_and(|id| deleted.contains(id)))
            });
            report.deleted = ids.len();
            info!(count = report.deleted, "deleted extended properties");
        }

        Ok(report)
    }

    fn payloads(&self, indices: &[usize]) -> Vec<PropertyPayload> {
        indices
            .iter()
            .map(|&index| self.properties[index].to_remote_payload(self.item_id()))
            .collect()
    }
}

fn fail<E: std::error::Error>(stage: SyncStage, source: E) -> SyncError<E> {
    warn!(%stage, error = %source, "sync stage failed");
    SyncError::PartialSync { stage, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::StockItemId;
    use crate::property::RemoteRecord;
    use crate::store::{MemoryPropertyStore, MemoryStoreError, StoreCall, StoreOp};

    fn item() -> StockItemId {
        StockItemId::new("item-1")
    }

    async fn loaded(store: &MemoryPropertyStore, records: Vec<RemoteRecord>) -> ExtendedPropertyMapping {
        store.insert(item(), records);
        let mut map = ExtendedPropertyMapping::new(item());
        map.load(store).await.unwrap();
        store.clear_calls();
        map
    }

    #[test]
    fn plan_partitions_by_identity_and_intent() {
        let mut map = ExtendedPropertyMapping::new(item());
        map.replace_all(vec![
            ExtendedProperty::from_remote(RemoteRecord::new("row-1", "A", "1", "Attribute")).unwrap(),
            ExtendedProperty::from_remote(RemoteRecord::new("row-2", "C", "3", "Attribute")).unwrap(),
        ]);
        map.create("B", "2", "Attribute").unwrap();
        map.create("D", "4", "Attribute").unwrap();
        map.remove("C").unwrap();
        map.remove("D").unwrap();

        let plan = map.plan();
        assert_eq!(plan.update, vec![PropertyId::Remote("row-1".into())]);
        assert_eq!(plan.delete, vec![PropertyId::Remote("row-2".into())]);
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.discard.len(), 1);
        assert_eq!(plan.remote_calls(), 3);
    }

    #[tokio::test]
    async fn load_replaces_collection() {
        let store = MemoryPropertyStore::new();
        let map = loaded(
            &store,
            vec![
                RemoteRecord::new("row-1", "Colour", "Red", "Attribute"),
                RemoteRecord::new("row-2", "Size", "XL", "Attribute"),
            ],
        )
        .await;

        assert!(map.is_loaded());
        assert_eq!(map.len(), 2);
        assert!(map.iter().all(ExtendedProperty::is_persisted));
    }

    #[tokio::test]
    async fn failed_load_leaves_mapping_untouched() {
        let store = MemoryPropertyStore::new();
        let mut map = ExtendedPropertyMapping::new(item());
        map.create("Local", "x", "Attribute").unwrap();

        store.fail_next(StoreOp::Fetch);
        let err = map.load(&store).await.unwrap_err();
        assert!(matches!(err, SyncError::Load(MemoryStoreError::Injected(StoreOp::Fetch))));
        assert_eq!(err.stage(), None);
        assert!(!map.is_loaded());
        assert_eq!(map.get("Local").unwrap().value(), "x");
    }

    #[tokio::test]
    async fn malformed_record_aborts_load() {
        let store = MemoryPropertyStore::new();
        store.insert(
            item(),
            vec![
                RemoteRecord::new("row-1", "Colour", "Red", "Attribute"),
                RemoteRecord {
                    name: None,
                    ..RemoteRecord::new("row-2", "", "XL", "Attribute")
                },
            ],
        );
        let mut map = ExtendedPropertyMapping::new(item());

        let err = map.load(&store).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::MalformedRecord(PropertyError::MalformedRecord { field: "name" })
        ));
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn create_mismatch_keeps_local_ids() {
        struct ShortStore;

        impl crate::store::PropertyStore for ShortStore {
            type Error = MemoryStoreError;

            fn fetch(&self, _: &StockItemId) -> Result<Vec<RemoteRecord>, Self::Error> {
                Ok(vec![])
            }

            fn create_batch(&self, _: &StockItemId, _: &[PropertyPayload]) -> Result<Vec<String>, Self::Error> {
                Ok(vec!["row-1".to_string()])
            }

            fn update_batch(&self, _: &StockItemId, _: &[PropertyPayload]) -> Result<(), Self::Error> {
                Ok(())
            }

            fn delete_batch(&self, _: &StockItemId, _: &[String]) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let mut map = ExtendedPropertyMapping::new(item());
        map.create("A", "1", "Attribute").unwrap();
        map.create("B", "2", "Attribute").unwrap();

        let err = map.sync(&ShortStore).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::CreateResponseMismatch { submitted: 2, returned: 1 }
        ));
        assert_eq!(err.stage(), Some(SyncStage::Create));
        assert!(map.iter().all(|p| !p.is_persisted()));
    }

    #[tokio::test]
    async fn created_properties_are_not_resubmitted_as_updates_in_same_pass() {
        let store = MemoryPropertyStore::new();
        let mut map = loaded(&store, vec![]).await;
        map.create("A", "1", "Attribute").unwrap();

        let report = map.sync(&store).await.unwrap();
        assert_eq!(report, SyncReport { created: 1, ..Default::default() });
        assert_eq!(
            store.calls(),
            vec![StoreCall::Create { item_id: item(), names: vec!["A".to_string()] }]
        );
    }
}
