//! Error surfaced by content mutations and queries.
use crate::assets::AssetStoreError;
use crate::storage::StorageError;
use thiserror::Error;

/// Failures a caller of the content service can observe.
///
/// Old-asset cleanup and link recomputation failures are deliberately absent:
/// they are recovered locally and only show up in logs.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Item already exists: {collection}/{key}")]
    AlreadyExists { collection: String, key: String },
    #[error("Item not found: {collection}/{key}")]
    NotFound { collection: String, key: String },
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
    #[error("Asset upload failed for field '{field}': {source}")]
    AssetUpload {
        field: String,
        #[source]
        source: AssetStoreError,
    },
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ContentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(collection: &str, key: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    /// Stable machine-readable code for adapters (HTTP, CLI).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnknownCollection(_) => "UNKNOWN_COLLECTION",
            Self::AssetUpload { .. } => "ASSET_UPLOAD_FAILED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the request itself was at fault. These never leave side effects.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::AlreadyExists { .. }
                | Self::NotFound { .. }
                | Self::UnknownCollection(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
