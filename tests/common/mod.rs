//! Common test utilities
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use cms_content::config::builtin_collections;
use cms_content::navigation::walk_chain;
use cms_content::{
    AssetKind, AssetStore, AssetStoreError, ContentItem, ContentService, ContentStore,
    MemoryStore, NavigationLink, StorageError, Upload, Uploads,
};
use cms_content::assets::StoredAsset;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CDN: &str = "https://cdn.test/media";

/// Asset store double that records every call and keeps a set of live ids.
#[derive(Default)]
pub struct MockAssetStore {
    next_id: AtomicUsize,
    live: Mutex<HashSet<String>>,
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    /// Uploads with this filename fail.
    pub fail_upload_named: Mutex<Option<String>>,
    pub fail_deletes: AtomicBool,
}

impl MockAssetStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_uploads_of(&self, filename: &str) {
        *self.fail_upload_named.lock().expect("lock") = Some(filename.to_string());
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("lock").clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().expect("lock").clone()
    }

    pub fn live(&self) -> HashSet<String> {
        self.live.lock().expect("lock").clone()
    }

    /// Register an asset as already hosted, e.g. for seeded items.
    pub fn host(&self, provider_id: &str) {
        self.live.lock().expect("lock").insert(provider_id.to_string());
    }

    pub fn url_for(provider_id: &str, kind: AssetKind) -> String {
        format!("{CDN}/{}/{provider_id}", kind.folder_name())
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    async fn upload(&self, upload: &Upload, kind: AssetKind) -> Result<StoredAsset, AssetStoreError> {
        self.uploads.lock().expect("lock").push(upload.filename.clone());
        if self.fail_upload_named.lock().expect("lock").as_deref() == Some(upload.filename.as_str()) {
            return Err(AssetStoreError::Rejected("quota exceeded".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let provider_id = format!("asset{n}");
        self.live.lock().expect("lock").insert(provider_id.clone());
        Ok(StoredAsset {
            url: Self::url_for(&provider_id, kind),
            provider_id,
        })
    }

    async fn delete(&self, provider_id: &str, _kind: AssetKind) -> Result<(), AssetStoreError> {
        self.deletes.lock().expect("lock").push(provider_id.to_string());
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AssetStoreError::Rejected("provider unavailable".to_string()));
        }
        if self.live.lock().expect("lock").remove(provider_id) {
            Ok(())
        } else {
            Err(AssetStoreError::NotFound(provider_id.to_string()))
        }
    }

    fn is_managed_url(&self, url: &str) -> bool {
        url.starts_with(&format!("{CDN}/"))
    }

    fn provider_id_for_url(&self, url: &str) -> Option<String> {
        url.rsplit('/').next().map(str::to_string)
    }
}

/// Persistence wrapper that can be told to fail and counts writes.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_save: AtomicBool,
    pub fail_save_links: AtomicBool,
    pub fail_delete: AtomicBool,
    pub writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn injected(what: &str) -> StorageError {
        StorageError::custom(format!("injected {what} failure"))
    }
}

#[async_trait]
impl ContentStore for FlakyStore {
    async fn find_all_sorted_by_order(
        &self,
        collection: &str,
    ) -> Result<Vec<ContentItem>, StorageError> {
        self.inner.find_all_sorted_by_order(collection).await
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<ContentItem>, StorageError> {
        self.inner.find_by_key(collection, key).await
    }

    async fn save(&self, collection: &str, item: &ContentItem) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Self::injected("save"));
        }
        self.inner.save(collection, item).await
    }

    async fn save_links(
        &self,
        collection: &str,
        key: &str,
        links: &NavigationLink,
    ) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_save_links.load(Ordering::SeqCst) {
            return Err(Self::injected("save_links"));
        }
        self.inner.save_links(collection, key, links).await
    }

    async fn save_order(
        &self,
        collection: &str,
        key: &str,
        order: i64,
    ) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Self::injected("save_order"));
        }
        self.inner.save_order(collection, key, order).await
    }

    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::injected("delete"));
        }
        self.inner.delete_by_key(collection, key).await
    }
}

/// Service over the built-in collections backed by the given doubles.
pub fn service(store: Arc<FlakyStore>, assets: Arc<MockAssetStore>) -> ContentService {
    ContentService::new(store, assets, builtin_collections())
}

pub fn png(name: &str) -> Upload {
    Upload::new(name, vec![0x89, b'P', b'N', b'G', 1, 2, 3])
}

pub fn mp4(name: &str) -> Upload {
    Upload::new(name, vec![0, 0, 0, 0x18, b'f', b't', b'y', b'p'])
}

pub fn uploads(entries: Vec<(&str, Upload)>) -> Uploads {
    entries
        .into_iter()
        .map(|(field, upload)| (field.to_string(), upload))
        .collect()
}

/// Chain invariants over a whole collection.
pub fn assert_chain(items: &[ContentItem]) {
    let active: Vec<&ContentItem> = items.iter().filter(|i| i.is_active).collect();
    let active_keys: HashSet<&str> = active.iter().map(|i| i.key.as_str()).collect();

    let heads = active.iter().filter(|i| i.prev_key().is_none()).count();
    let tails = active.iter().filter(|i| i.next_key().is_none()).count();
    assert!(heads <= 1, "more than one head: {items:#?}");
    assert!(tails <= 1, "more than one tail: {items:#?}");

    for item in items {
        if item.is_active {
            for linked in [item.prev_key(), item.next_key()].into_iter().flatten() {
                assert!(
                    active_keys.contains(linked),
                    "{} links to inactive or missing {linked}",
                    item.key
                );
            }
        } else {
            assert!(item.links.is_empty(), "inactive {} still linked", item.key);
        }
    }

    let walked = walk_chain(items);
    assert_eq!(walked.len(), active.len(), "chain does not visit every active item");
}

/// Active keys in chain order.
pub fn chain(items: &[ContentItem]) -> Vec<String> {
    walk_chain(items)
}
