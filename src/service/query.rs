use super::ContentService;
use crate::content::{ContentError, ContentItem};
use crate::metrics::{generate_request_id, OperationTimer};
use crate::navigation::{relink_collection, RelinkReport};
use crate::reorder::{self, Ranking, ReorderReport};
use tracing::{info, instrument};

impl ContentService {
    /// Items sorted by `order`, with their stored links.
    pub async fn list(
        &self,
        collection: &str,
        active_only: bool,
    ) -> Result<Vec<ContentItem>, ContentError> {
        self.schema(collection)?;
        let mut items = self.store.find_all_sorted_by_order(collection).await?;
        if active_only {
            items.retain(|item| item.is_active);
        }
        Ok(items)
    }

    pub async fn get(&self, collection: &str, key: &str) -> Result<ContentItem, ContentError> {
        self.schema(collection)?;
        self.load(collection, key).await
    }

    /// Apply a ranking and relink. Unknown keys are ignored and reported.
    ///
    /// # Errors
    ///
    /// [`ContentError::UnknownCollection`] before anything is read;
    /// [`ContentError::Storage`] if the collection cannot be read or an order
    /// cannot be saved (the collection is still relinked in that case).
    #[instrument(skip_all, fields(collection = %collection, request_id = %generate_request_id()))]
    pub async fn reorder(
        &self,
        collection: &str,
        ranking: &Ranking,
    ) -> Result<ReorderReport, ContentError> {
        let _timer = OperationTimer::new("reorder", collection);
        self.schema(collection)?;
        Ok(reorder::reorder(self.store.as_ref(), collection, ranking).await?)
    }

    /// Recompute and persist every link of the collection.
    #[instrument(skip_all, fields(collection = %collection, request_id = %generate_request_id()))]
    pub async fn relink(&self, collection: &str) -> Result<RelinkReport, ContentError> {
        let _timer = OperationTimer::new("relink", collection);
        self.schema(collection)?;
        let report = relink_collection(self.store.as_ref(), collection).await?;
        info!(
            updated = report.updated.len(),
            failed = report.failures.len(),
            "Manual relink finished"
        );
        Ok(report)
    }
}
