use linnapi_client::ApiError;
use linnapi_core::{MappingError, SyncError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "credentials not found. Set LINNWORKS_USERNAME and LINNWORKS_PASSWORD or configure ~/.config/linnapi/config.toml"
    )]
    CredentialsNotFound,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Linnworks error: {0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Mapping(#[from] MappingError),

    #[error("sync error: {0}")]
    Sync(#[from] SyncError<ApiError>),
}
