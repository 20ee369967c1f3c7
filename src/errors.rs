use thiserror::Error;

use crate::api::ApiError;

pub type Result<T> = std::result::Result<T, CaseDeskError>;

/// Error type covering configuration, storage and boundary failures.
#[derive(Debug, Error)]
pub enum CaseDeskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}
