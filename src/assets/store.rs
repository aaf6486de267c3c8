use super::types::{AssetStoreError, Upload};
use crate::content::AssetKind;
use async_trait::async_trait;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub url: String,
    pub provider_id: String,
}

/// Client for the external media host.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, upload: &Upload, kind: AssetKind) -> Result<StoredAsset, AssetStoreError>;

    async fn delete(&self, provider_id: &str, kind: AssetKind) -> Result<(), AssetStoreError>;

    /// Whether `url` points at bytes this store owns. Anything else was
    /// supplied by a caller and must never be deleted.
    fn is_managed_url(&self, url: &str) -> bool;

    /// Recover the provider id from a managed URL, for records that lost it.
    fn provider_id_for_url(&self, _url: &str) -> Option<String> {
        None
    }
}
