//! Error types for SyncVault

use thiserror::Error;

/// Result type alias for SyncVault operations
pub type Result<T> = std::result::Result<T, SyncVaultError>;

/// Custom error types for SyncVault
#[derive(Error, Debug)]
pub enum SyncVaultError {
    #[error("Configuration error: marshal format '{0}' is not implemented")]
    Configuration(String),

    #[error("Encode error: {0}")]
    Encode(#[source] CodecError),

    #[error("Decode error: {0}")]
    Decode(#[source] CodecError),
}

/// Native errors of the serialization collaborators, passed through as-is
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

impl SyncVaultError {
    /// True when the store was built with a format it cannot dispatch to
    pub fn is_configuration(&self) -> bool {
        matches!(self, SyncVaultError::Configuration(_))
    }

    /// True when a value could not be serialized
    pub fn is_encode(&self) -> bool {
        matches!(self, SyncVaultError::Encode(_))
    }

    /// True when stored bytes could not be deserialized into the requested type
    pub fn is_decode(&self) -> bool {
        matches!(self, SyncVaultError::Decode(_))
    }
}
