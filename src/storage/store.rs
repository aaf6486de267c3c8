use super::error::StorageError;
use crate::content::{ContentItem, NavigationLink};
use async_trait::async_trait;

/// Persistence port for ordered collections.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every item of the collection, sorted by `order`. Ties keep the
    /// backend's own iteration order.
    async fn find_all_sorted_by_order(
        &self,
        collection: &str,
    ) -> Result<Vec<ContentItem>, StorageError>;

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<ContentItem>, StorageError>;

    /// Insert or replace the item with the same key.
    async fn save(&self, collection: &str, item: &ContentItem) -> Result<(), StorageError>;

    /// Overwrite only the derived navigation pointers of an existing item.
    ///
    /// Fails with [`StorageError::NotFound`] if the item is gone.
    async fn save_links(
        &self,
        collection: &str,
        key: &str,
        links: &NavigationLink,
    ) -> Result<(), StorageError>;

    /// Overwrite only the `order` of an existing item and refresh its
    /// `updated_at`.
    ///
    /// Fails with [`StorageError::NotFound`] if the item is gone.
    async fn save_order(
        &self,
        collection: &str,
        key: &str,
        order: i64,
    ) -> Result<(), StorageError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StorageError>;
}

/// Stable sort by `order`.
pub fn sort_by_order(items: &mut [ContentItem]) {
    items.sort_by_key(|item| item.order);
}
