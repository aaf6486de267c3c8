//! Markdown-file backend: one document per item under `<root>/<collection>/<key>.md`.
use super::error::StorageError;
use super::store::ContentStore;
use crate::common::frontmatter::{generate_frontmatter, parse_frontmatter};
use crate::content::{is_valid_key, AssetRef, ContentItem, NavigationLink};
use crate::utils::atomic_write;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::fs;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

/// Payload field rendered as the Markdown body instead of frontmatter.
const BODY_FIELD: &str = "body";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemFrontmatter {
    order: i64,
    is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prev_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_key: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    assets: BTreeMap<String, AssetRef>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    fields: Map<String, Value>,
    created_at: String,
    updated_at: String,
}

fn render(item: &ContentItem) -> Result<String, StorageError> {
    let mut fields = item.fields.clone();
    let body = match fields.remove(BODY_FIELD) {
        Some(Value::String(body)) => body,
        Some(other) => {
            fields.insert(BODY_FIELD.to_string(), other);
            String::new()
        }
        None => String::new(),
    };
    let frontmatter = ItemFrontmatter {
        order: item.order,
        is_active: item.is_active,
        prev_key: item.links.prev_key.clone(),
        next_key: item.links.next_key.clone(),
        assets: item.assets.clone(),
        fields,
        created_at: item.created_at.clone(),
        updated_at: item.updated_at.clone(),
    };
    Ok(generate_frontmatter(&frontmatter, &item.key, &body)?)
}

fn parse(key: &str, content: &str) -> Result<ContentItem, StorageError> {
    let (fm, _title, body): (ItemFrontmatter, String, String) = parse_frontmatter(content)?;
    let mut fields = fm.fields;
    if !body.is_empty() {
        fields.insert(BODY_FIELD.to_string(), Value::String(body));
    }
    Ok(ContentItem {
        key: key.to_string(),
        order: fm.order,
        is_active: fm.is_active,
        links: NavigationLink {
            prev_key: fm.prev_key,
            next_key: fm.next_key,
        },
        assets: fm.assets,
        fields,
        created_at: fm.created_at,
        updated_at: fm.updated_at,
    })
}

/// Stores each item as Markdown with YAML frontmatter, written atomically.
///
/// Writes to one item file are serialized, so a partial write such as
/// [`ContentStore::save_links`] never rewrites a stale copy over a newer one.
/// Clones share the same locks.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    item_locks: Arc<StdMutex<HashMap<PathBuf, Arc<Mutex<()>>>>>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            item_locks: Arc::default(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(collection) {
            return Err(StorageError::InvalidName(collection.to_string()));
        }
        Ok(self.root.join(collection))
    }

    fn item_path(&self, collection: &str, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidName(key.to_string()));
        }
        Ok(self.collection_dir(collection)?.join(format!("{key}.md")))
    }

    /// Exclusive write access to one item file.
    async fn lock_item(&self, path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .item_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(path.to_path_buf()).or_default())
        };
        lock.lock_owned().await
    }

    async fn read_item(&self, path: &Path, key: &str) -> Result<Option<ContentItem>, StorageError> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(parse(key, &content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read, patch and rewrite an existing item while holding its lock.
    async fn patch_item(
        &self,
        collection: &str,
        key: &str,
        patch: impl FnOnce(&mut ContentItem) + Send,
    ) -> Result<(), StorageError> {
        let path = self.item_path(collection, key)?;
        let _guard = self.lock_item(&path).await;
        let mut item = self
            .read_item(&path, key)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;
        patch(&mut item);
        atomic_write(&path, &render(&item)?).await?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FileStore {
    async fn find_all_sorted_by_order(
        &self,
        collection: &str,
    ) -> Result<Vec<ContentItem>, StorageError> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md")) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            // Deleted since the directory was read.
            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            match parse(&key, &content) {
                Ok(item) => items.push(item),
                Err(e) => warn!(collection, key = %key, error = %e, "Skipping unreadable item file"),
            }
        }
        // Directory order is unspecified; key order is the stable tie-break.
        items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.key.cmp(&b.key)));
        Ok(items)
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<ContentItem>, StorageError> {
        let path = self.item_path(collection, key)?;
        self.read_item(&path, key).await
    }

    async fn save(&self, collection: &str, item: &ContentItem) -> Result<(), StorageError> {
        let path = self.item_path(collection, &item.key)?;
        let content = render(item)?;
        fs::create_dir_all(self.collection_dir(collection)?).await?;
        let _guard = self.lock_item(&path).await;
        atomic_write(&path, &content).await?;
        Ok(())
    }

    async fn save_links(
        &self,
        collection: &str,
        key: &str,
        links: &NavigationLink,
    ) -> Result<(), StorageError> {
        self.patch_item(collection, key, |item| item.links = links.clone())
            .await
    }

    async fn save_order(
        &self,
        collection: &str,
        key: &str,
        order: i64,
    ) -> Result<(), StorageError> {
        self.patch_item(collection, key, |item| {
            item.order = order;
            item.touch();
        })
        .await
    }

    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StorageError> {
        let path = self.item_path(collection, key)?;
        let _guard = self.lock_item(&path).await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod file_tests;
