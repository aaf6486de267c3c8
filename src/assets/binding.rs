//! Keeps item asset fields and hosted assets consistent.
//!
//! A mutation stages its asset changes in a [`CleanupPlan`]. Once the item is
//! persisted the plan is committed, which deletes superseded assets in the
//! background. If the mutation fails the plan is aborted instead, which
//! deletes the uploads made by that mutation and leaves the old assets alone.
//! Background deletions are fire-and-forget detached tasks: they keep running
//! after the binder is dropped, failures are logged and orphaned assets are
//! left for out-of-band collection.
use super::store::AssetStore;
use super::types::{AssetStoreError, Upload};
use crate::config::{AssetFieldSpec, CollectionSchema};
use crate::content::{AssetRef, ContentItem};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Asset changes staged by one mutation.
#[derive(Debug, Default)]
pub struct CleanupPlan {
    uploaded: Vec<AssetRef>,
    retired: Vec<AssetRef>,
}

impl CleanupPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assets uploaded by this mutation.
    #[must_use]
    pub fn uploaded(&self) -> &[AssetRef] {
        &self.uploaded
    }

    /// Assets this mutation unbound or replaced.
    #[must_use]
    pub fn retired(&self) -> &[AssetRef] {
        &self.retired
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty() && self.retired.is_empty()
    }

    fn retire(&mut self, asset: AssetRef) {
        self.retired.push(asset);
    }
}

pub struct AssetBinder {
    store: Arc<dyn AssetStore>,
    /// Handles of deletions still running, kept only for [`Self::settle`].
    cleanups: Mutex<Vec<JoinHandle<()>>>,
}

impl AssetBinder {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            cleanups: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.cleanups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Upload `upload` and bind it to `field`, scheduling the previous asset
    /// of that field for deletion.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the upload fails; `item` is left untouched.
    pub async fn bind(
        &self,
        item: &mut ContentItem,
        field: &AssetFieldSpec,
        upload: &Upload,
        plan: &mut CleanupPlan,
    ) -> Result<AssetRef, AssetStoreError> {
        let detected = upload.validate()?;
        if detected != field.kind {
            return Err(AssetStoreError::UnsupportedFileType(format!(
                "{} is a {detected}, field '{}' expects a {}",
                upload.filename, field.name, field.kind
            )));
        }
        let stored = self.store.upload(upload, field.kind).await?;
        let asset = AssetRef::managed(stored.url, stored.provider_id, field.kind);
        plan.uploaded.push(asset.clone());
        if let Some(previous) = item.assets.insert(field.name.clone(), asset.clone()) {
            plan.retire(previous);
        }
        debug!(key = %item.key, field = %field.name, url = %asset.url, "Bound uploaded asset");
        Ok(asset)
    }

    /// Bind a caller-supplied URL. It is never deleted by this system.
    pub fn bind_external(
        &self,
        item: &mut ContentItem,
        field: &AssetFieldSpec,
        url: &str,
        plan: &mut CleanupPlan,
    ) -> AssetRef {
        let asset = AssetRef::external(url, field.kind);
        if let Some(previous) = item.assets.insert(field.name.clone(), asset.clone()) {
            if previous.url != asset.url {
                plan.retire(previous);
            }
        }
        asset
    }

    /// Clear `field`, scheduling its asset for deletion if the store manages it.
    pub fn unbind(
        &self,
        item: &mut ContentItem,
        field: &str,
        plan: &mut CleanupPlan,
    ) -> Option<AssetRef> {
        let previous = item.assets.remove(field)?;
        plan.retire(previous.clone());
        Some(previous)
    }

    /// Unbind every asset field the schema declares.
    pub fn cascade_delete(
        &self,
        item: &mut ContentItem,
        schema: &CollectionSchema,
        plan: &mut CleanupPlan,
    ) {
        for field in &schema.asset_fields {
            self.unbind(item, &field.name, plan);
        }
    }

    /// The owning item was persisted: delete everything it no longer references.
    pub fn commit(&self, plan: CleanupPlan) {
        for asset in plan.retired {
            self.retire(asset);
        }
    }

    /// The mutation failed: delete the uploads it made, keep the old assets.
    pub fn abort(&self, plan: CleanupPlan) {
        for asset in plan.uploaded {
            self.retire(asset);
        }
    }

    fn retire(&self, asset: AssetRef) {
        if !self.store.is_managed_url(&asset.url) {
            debug!(url = %asset.url, "Leaving external asset in place");
            return;
        }
        let provider_id = asset
            .provider_id
            .clone()
            .or_else(|| self.store.provider_id_for_url(&asset.url));
        let Some(provider_id) = provider_id else {
            warn!(url = %asset.url, "Managed asset has no provider id; leaving it orphaned");
            return;
        };
        let store = Arc::clone(&self.store);
        let kind = asset.kind;
        let handle = tokio::spawn(async move {
            match store.delete(&provider_id, kind).await {
                Ok(()) => info!(provider_id = %provider_id, %kind, "Deleted retired asset"),
                Err(e) => warn!(
                    provider_id = %provider_id,
                    %kind,
                    error = %e,
                    "Failed to delete retired asset"
                ),
            }
        });
        let mut tasks = self.tasks();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Wait for every background deletion scheduled so far.
    pub async fn settle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.tasks());
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    warn!(error = %e, "Asset cleanup task did not complete");
                }
            }
        }
    }
}

impl std::fmt::Debug for AssetBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetBinder").finish_non_exhaustive()
    }
}
