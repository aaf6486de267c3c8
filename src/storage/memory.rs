use super::error::StorageError;
use super::store::{sort_by_order, ContentStore};
use crate::content::{ContentItem, NavigationLink};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process store. Collections keep insertion order, which is the tie-break
/// for equal `order` values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<ContentItem>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection, replacing whatever it held.
    pub async fn seed(&self, collection: &str, items: Vec<ContentItem>) {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), items);
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_all_sorted_by_order(
        &self,
        collection: &str,
    ) -> Result<Vec<ContentItem>, StorageError> {
        let mut items = self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default();
        sort_by_order(&mut items);
        Ok(items)
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<ContentItem>, StorageError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|items| items.iter().find(|i| i.key == key))
            .cloned())
    }

    async fn save(&self, collection: &str, item: &ContentItem) -> Result<(), StorageError> {
        let mut guard = self.collections.write().await;
        let items = guard.entry(collection.to_string()).or_default();
        match items.iter_mut().find(|i| i.key == item.key) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(())
    }

    async fn save_links(
        &self,
        collection: &str,
        key: &str,
        links: &NavigationLink,
    ) -> Result<(), StorageError> {
        let mut guard = self.collections.write().await;
        let existing = guard
            .get_mut(collection)
            .and_then(|items| items.iter_mut().find(|i| i.key == key))
            .ok_or_else(|| StorageError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;
        existing.links = links.clone();
        Ok(())
    }

    async fn save_order(
        &self,
        collection: &str,
        key: &str,
        order: i64,
    ) -> Result<(), StorageError> {
        let mut guard = self.collections.write().await;
        let existing = guard
            .get_mut(collection)
            .and_then(|items| items.iter_mut().find(|i| i.key == key))
            .ok_or_else(|| StorageError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;
        existing.order = order;
        existing.touch();
        Ok(())
    }

    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StorageError> {
        let mut guard = self.collections.write().await;
        let Some(items) = guard.get_mut(collection) else {
            return Ok(false);
        };
        let before = items.len();
        items.retain(|i| i.key != key);
        Ok(items.len() < before)
    }
}
