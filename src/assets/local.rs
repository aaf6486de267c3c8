//! Filesystem-backed asset store.
//!
//! Bytes live at `<root>/<kind>s/<provider_id>.<ext>` and are served from
//! `<public_base_url>/<kind>s/<provider_id>.<ext>` by whatever fronts the
//! directory.
use super::policy::ManagedUrlPolicy;
use super::store::{AssetStore, StoredAsset};
use super::types::{AssetStoreError, Upload};
use crate::config::AssetStoreConfig;
use crate::content::AssetKind;
use crate::utils::short_hash;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
    policy: ManagedUrlPolicy,
}

fn is_safe_provider_id(provider_id: &str) -> bool {
    !provider_id.is_empty()
        && provider_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl LocalAssetStore {
    pub fn new(config: &AssetStoreConfig) -> Self {
        let public_base_url = config.public_base_url.trim_end_matches('/').to_string();
        let policy = ManagedUrlPolicy::new(
            std::iter::once(public_base_url.as_str())
                .chain(config.managed_url_prefixes.iter().map(String::as_str)),
        );
        Self {
            root: config.root.clone(),
            public_base_url,
            policy,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn new_provider_id(data: &[u8]) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", short_hash(data, 12), suffix.get(..8).unwrap_or(&suffix))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload(&self, upload: &Upload, kind: AssetKind) -> Result<StoredAsset, AssetStoreError> {
        let detected = upload.validate()?;
        if detected != kind {
            return Err(AssetStoreError::UnsupportedFileType(format!(
                "{} is not a {kind}",
                upload.filename
            )));
        }
        let ext = upload
            .extension()
            .ok_or_else(|| AssetStoreError::UnsupportedFileType(upload.filename.clone()))?;
        let provider_id = Self::new_provider_id(&upload.data);
        let dir = self.root.join(kind.folder_name());
        fs::create_dir_all(&dir).await?;
        let filename = format!("{provider_id}.{ext}");
        fs::write(dir.join(&filename), &upload.data).await?;
        debug!(provider_id = %provider_id, %kind, bytes = upload.data.len(), "Stored asset");
        Ok(StoredAsset {
            url: format!("{}/{}/{filename}", self.public_base_url, kind.folder_name()),
            provider_id,
        })
    }

    async fn delete(&self, provider_id: &str, kind: AssetKind) -> Result<(), AssetStoreError> {
        if !is_safe_provider_id(provider_id) {
            return Err(AssetStoreError::Rejected(format!(
                "invalid provider id '{provider_id}'"
            )));
        }
        let dir = self.root.join(kind.folder_name());
        if !dir.exists() {
            return Err(AssetStoreError::NotFound(provider_id.to_string()));
        }
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.file_stem().and_then(|s| s.to_str()) == Some(provider_id) {
                fs::remove_file(&path).await?;
                debug!(provider_id, %kind, "Deleted asset");
                return Ok(());
            }
        }
        Err(AssetStoreError::NotFound(provider_id.to_string()))
    }

    fn is_managed_url(&self, url: &str) -> bool {
        self.policy.is_managed(url)
    }

    fn provider_id_for_url(&self, url: &str) -> Option<String> {
        let relative = self.policy.relative_path(url)?;
        let filename = relative.rsplit('/').next()?;
        let stem = Path::new(filename).file_stem()?.to_str()?;
        is_safe_provider_id(stem).then(|| stem.to_string())
    }
}
