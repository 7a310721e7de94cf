use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use thiserror::Error;

use crate::id::StockItemId;
use crate::property::{PropertyPayload, RemoteRecord};

/// Remote home of extended properties.
///
/// Stores own the wire format, authentication and transport. The
/// reconciliation engine only relies on the contract below: batches are
/// applied as a unit and `create_batch` returns one id per submitted
/// record, in submission order.
pub trait PropertyStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the current properties of an item.
    fn fetch(&self, item_id: &StockItemId) -> Result<Vec<RemoteRecord>, Self::Error>;

    /// Creates properties, returning the issued ids in submission order.
    fn create_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> Result<Vec<String>, Self::Error>;

    /// Overwrites existing properties, matched by remote id.
    fn update_batch(&self, item_id: &StockItemId, records: &[PropertyPayload])
    -> Result<(), Self::Error>;

    /// Deletes properties by remote id.
    fn delete_batch(&self, item_id: &StockItemId, ids: &[String]) -> Result<(), Self::Error>;
}

/// Store operation kinds, used for call logs and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOp::Fetch => write!(f, "fetch"),
            StoreOp::Create => write!(f, "create"),
            StoreOp::Update => write!(f, "update"),
            StoreOp::Delete => write!(f, "delete"),
        }
    }
}

/// A call received by a [`MemoryPropertyStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch(StockItemId),
    Create { item_id: StockItemId, names: Vec<String> },
    Update { item_id: StockItemId, names: Vec<String> },
    Delete { item_id: StockItemId, ids: Vec<String> },
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::Fetch(_) => StoreOp::Fetch,
            StoreCall::Create { .. } => StoreOp::Create,
            StoreCall::Update { .. } => StoreOp::Update,
            StoreCall::Delete { .. } => StoreOp::Delete,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("injected {0} failure")]
    Injected(StoreOp),
    #[error("unknown property id: {0}")]
    UnknownId(String),
}

/// An in-memory property store.
///
/// Useful for testing and as a reference implementation. Every call is
/// recorded, and a failure can be armed for the next call of a given kind.
/// Issued ids are `row-1`, `row-2`, ... in creation order.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    records: RwLock<HashMap<StockItemId, Vec<RemoteRecord>>>,
    calls: Mutex<Vec<StoreCall>>,
    armed: Mutex<HashSet<StoreOp>>,
    next_id: AtomicU64,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored properties of an item.
    pub fn insert(&self, item_id: StockItemId, records: Vec<RemoteRecord>) {
        self.records.write().unwrap().insert(item_id, records);
    }

    /// Returns the stored properties of an item.
    pub fn records(&self, item_id: &StockItemId) -> Vec<RemoteRecord> {
        self.records
            .read()
            .unwrap()
            .get(item_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns every call received so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Makes the next call of kind `op` fail without side effects.
    pub fn fail_next(&self, op: StoreOp) {
        self.armed.lock().unwrap().insert(op);
    }

    fn record_call(&self, call: StoreCall) -> Result<(), MemoryStoreError> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);
        if self.armed.lock().unwrap().remove(&op) {
            return Err(MemoryStoreError::Injected(op));
        }
        Ok(())
    }

    fn issue_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("row-{}", n)
    }
}

impl PropertyStore for MemoryPropertyStore {
    type Error = MemoryStoreError;

    fn fetch(&self, item_id: &StockItemId) -> Result<Vec<RemoteRecord>, Self::Error> {
        self.record_call(StoreCall::Fetch(item_id.clone()))?;
        Ok(self.records(item_id))
    }

    fn create_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> Result<Vec<String>, Self::Error> {
        self.record_call(StoreCall::Create {
            item_id: item_id.clone(),
            names: records.iter().map(|r| r.name.clone()).collect(),
        })?;

        let mut stored = self.records.write().unwrap();
        let entry = stored.entry(item_id.clone()).or_default();
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = self.issue_id();
            entry.push(RemoteRecord::new(
                id.clone(),
                record.name.clone(),
                record.value.clone(),
                record.property_type.clone(),
            ));
            ids.push(id);
        }
        Ok(ids)
    }

    fn update_batch(
        &self,
        item_id: &StockItemId,
        records: &[PropertyPayload],
    ) -> Result<(), Self::Error> {
        self.record_call(StoreCall::Update {
            item_id: item_id.clone(),
            names: records.iter().map(|r| r.name.clone()).collect(),
        })?;

        let mut stored = self.records.write().unwrap();
        let entry = stored.entry(item_id.clone()).or_default();

        // Validate the whole batch before applying any of it.
        let mut targets = Vec::with_capacity(records.len());
        for record in records {
            let position = record
                .id
                .as_remote()
                .and_then(|id| entry.iter().position(|r| r.id.as_deref() == Some(id)))
                .ok_or_else(|| MemoryStoreError::UnknownId(record.id.to_string()))?;
            targets.push(position);
        }

        for (position, record) in targets.into_iter().zip(records) {
            let target = &mut entry[position];
            target.name = Some(record.name.clone());
            target.value = Some(record.value.clone());
            target.property_type = Some(record.property_type.clone());
        }
        Ok(())
    }

    fn delete_batch(&self, item_id: &StockItemId, ids: &[String]) -> Result<(), Self::Error> {
        self.record_call(StoreCall::Delete {
            item_id: item_id.clone(),
            ids: ids.to_vec(),
        })?;

        if let Some(entry) = self.records.write().unwrap().get_mut(item_id) {
            entry.retain(|r| r.id.as_ref().is_none_or(|id| !ids.contains(id)));
        }
        Ok(())
    }
}
