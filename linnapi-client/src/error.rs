use linnapi_core::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response missing field: {0}")]
    MissingField(&'static str),

    #[error("login returned no accounts")]
    NoAccounts,

    #[error("no {kind} with SKU {sku}")]
    SkuNotFound { kind: &'static str, sku: String },
}

/// Failure of [`LinnworksClient::update_all`](crate::LinnworksClient::update_all).
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("item update failed: {0}")]
    Item(#[source] ApiError),

    #[error("extended property sync failed: {0}")]
    Properties(#[from] SyncError<ApiError>),
}
