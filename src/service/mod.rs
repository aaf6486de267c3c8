//! The single entry point for mutating ordered collections.
//!
//! Every create, update and delete runs the same sequence: validate, bind
//! assets, persist, relink. Validation and not-found failures return before
//! any write or asset-store call. Asset cleanup and link persistence failures
//! are logged and never fail the mutation.
mod mutate;
mod query;
mod types;
mod validate;

pub use types::{AssetPatch, CreateItem, UpdateItem, Uploads};

use crate::assets::{AssetBinder, AssetStore, CleanupPlan, LocalAssetStore};
use crate::config::{CmsConfig, CollectionSchema};
use crate::content::{ContentError, ContentItem};
use crate::navigation::relink_collection;
use crate::storage::ContentStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ContentService {
    store: Arc<dyn ContentStore>,
    binder: AssetBinder,
    schemas: HashMap<String, CollectionSchema>,
}

impl ContentService {
    pub fn new(
        store: Arc<dyn ContentStore>,
        assets: Arc<dyn AssetStore>,
        schemas: impl IntoIterator<Item = CollectionSchema>,
    ) -> Self {
        let schemas = schemas
            .into_iter()
            .map(|schema| (schema.name.clone(), schema))
            .collect();
        Self {
            store,
            binder: AssetBinder::new(assets),
            schemas,
        }
    }

    /// Service over the configured collections with the filesystem asset store.
    pub fn from_config(config: &CmsConfig, store: Arc<dyn ContentStore>) -> Self {
        let assets = Arc::new(LocalAssetStore::new(&config.asset_store));
        Self::new(store, assets, config.collections.iter().cloned())
    }

    /// Schema of a served collection.
    ///
    /// # Errors
    ///
    /// [`ContentError::UnknownCollection`] if it is not served.
    pub fn schema(&self, collection: &str) -> Result<&CollectionSchema, ContentError> {
        self.schemas
            .get(collection)
            .ok_or_else(|| ContentError::UnknownCollection(collection.to_string()))
    }

    /// Names of the served collections, sorted.
    #[must_use]
    pub fn collections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Wait for background asset deletions to finish.
    pub async fn settle(&self) {
        self.binder.settle().await;
    }

    async fn load(&self, collection: &str, key: &str) -> Result<ContentItem, ContentError> {
        self.store
            .find_by_key(collection, key)
            .await?
            .ok_or_else(|| ContentError::not_found(collection, key))
    }

    /// Save `item`, then commit the plan; on failure roll back its uploads.
    async fn persist(
        &self,
        collection: &str,
        item: &ContentItem,
        plan: CleanupPlan,
    ) -> Result<(), ContentError> {
        match self.store.save(collection, item).await {
            Ok(()) => {
                self.binder.commit(plan);
                Ok(())
            }
            Err(e) => {
                warn!(key = %item.key, error = %e, "Failed to persist item; discarding new uploads");
                self.binder.abort(plan);
                Err(e.into())
            }
        }
    }

    /// Relink the collection and refresh `item`'s links from the result.
    async fn relink_after(&self, collection: &str, item: &mut ContentItem) {
        match relink_collection(self.store.as_ref(), collection).await {
            Ok(report) => {
                if let Some(links) = report.links_for(&item.key) {
                    item.links = links.clone();
                }
                if !report.is_clean() {
                    warn!(
                        failed = report.failures.len(),
                        "Some navigation links were not persisted"
                    );
                }
            }
            Err(e) => warn!(error = %e, "Relink failed; links are stale until the next mutation"),
        }
        debug!(key = %item.key, prev = ?item.prev_key(), next = ?item.next_key(), "Links refreshed");
    }
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("collections", &self.collections())
            .finish_non_exhaustive()
    }
}
