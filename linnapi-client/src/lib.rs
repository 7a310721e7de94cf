//! Linnworks API client for linnapi.
//!
//! Wraps the inventory endpoints the rest of the workspace needs and
//! implements [`linnapi_core::AsyncPropertyStore`] so an item's extended
//! properties can be reconciled directly against the API.
//!
//! # Example
//!
//! ```ignore
//! use linnapi_client::{Credentials, LinnworksClient};
//! use linnapi_core::StockItemId;
//!
//! #[tokio::main]
//! async fn main() {
//!     let credentials = Credentials {
//!         username: "user@example.com".to_string(),
//!         password: "secret".to_string(),
//!     };
//!     let client = LinnworksClient::login(&credentials).await.unwrap();
//!
//!     let mut item = client
//!         .get_inventory_item(&StockItemId::new("5f1d..."))
//!         .await
//!         .unwrap();
//!     let props = item.loaded_extended_properties(&client).await.unwrap();
//!     props.create("Colour", "Red", "Attribute").unwrap();
//!     item.sync_extended_properties(&client).await.unwrap();
//! }
//! ```

mod client;
mod convert;
mod error;
mod inventory;
mod lookup;
mod properties;
mod types;
mod variation;

pub use client::{DEFAULT_AUTH_URL, LinnworksClient};
pub use convert::{item_from_record, item_to_json, payload_to_record, record_to_remote};
pub use error::{ApiError, UpdateError};
pub use lookup::{LookupEntry, LookupTable};
pub use types::{Credentials, ExtendedPropertyRecord, ItemDescription, Session, StockItemRecord};
