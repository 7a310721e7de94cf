//! Core model for the linnapi inventory client.
//!
//! Core concepts:
//! - **ExtendedProperty**: a named value attached to an inventory item, with
//!   a local or server-issued identity
//! - **ExtendedPropertyMapping**: the properties of one item; tracks local
//!   edits and reconciles them with a store
//! - **PropertyStore / AsyncPropertyStore**: the remote side of
//!   reconciliation, implemented by the HTTP client and by
//!   [`MemoryPropertyStore`]
//! - **InventoryItem**: typed item record that owns its mapping
//!
//! # Example
//!
//! ```
//! use linnapi_core::{ExtendedPropertyMapping, MemoryPropertyStore, StockItemId};
//!
//! # tokio_test_block(async {
//! let store = MemoryPropertyStore::new();
//! let mut props = ExtendedPropertyMapping::new(StockItemId::new("item-1"));
//! props.load(&store).await.unwrap();
//!
//! props.create("Colour", "Red", "Attribute").unwrap();
//! let report = props.sync(&store).await.unwrap();
//! assert_eq!(report.created, 1);
//! assert!(props.get("Colour").unwrap().is_persisted());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod async_store;
mod id;
mod item;
mod mapping;
mod property;
mod store;
mod sync;

pub use async_store::AsyncPropertyStore;
pub use id::{PropertyId, StockItemId};
pub use item::{InventoryItem, ItemError, ItemField};
pub use mapping::{ExtendedPropertyMapping, MappingError, PropertyKey, PropertySummary};
pub use property::{
    DEFAULT_PROPERTY_TYPE, ExtendedProperty, PropertyError, PropertyPayload, RemoteRecord,
};
pub use store::{MemoryPropertyStore, MemoryStoreError, PropertyStore, StoreCall, StoreOp};
pub use sync::{SyncError, SyncPlan, SyncReport, SyncStage};
