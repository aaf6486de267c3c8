use super::types::{Ranking, ReorderReport};
use crate::content::ContentItem;
use crate::navigation::relink_collection;
use crate::storage::{ContentStore, StorageError};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Items whose `order` a ranking changes, plus the keys it could not place.
#[derive(Debug, Default)]
pub struct ReorderPlan {
    pub changed: Vec<ContentItem>,
    pub ignored: Vec<String>,
}

/// Apply `ranking` to `items` without touching storage.
///
/// Unknown keys are ignored. Items the ranking omits keep their order. When a
/// key appears twice the later entry wins.
#[must_use]
pub fn plan_reorder(items: &[ContentItem], ranking: &Ranking) -> ReorderPlan {
    let known: HashSet<&str> = items.iter().map(|item| item.key.as_str()).collect();
    let mut wanted: HashMap<&str, i64> = HashMap::new();
    let mut ignored = Vec::new();
    for (key, order) in ranking.entries() {
        if known.contains(key) {
            wanted.insert(key, order);
        } else if !ignored.iter().any(|k: &String| k == key) {
            ignored.push(key.to_string());
        }
    }

    let changed = items
        .iter()
        .filter_map(|item| {
            let order = *wanted.get(item.key.as_str())?;
            (order != item.order).then(|| {
                let mut updated = item.clone();
                updated.order = order;
                updated.touch();
                updated
            })
        })
        .collect();
    ReorderPlan { changed, ignored }
}

/// Persist a ranking and relink the collection.
///
/// Only the `order` of each moved item is written, so concurrent changes to
/// its other fields survive. An item deleted in the meantime is skipped.
///
/// The relink runs even if a save fails, so whatever orders did land are
/// reflected in the links; the save error is then returned.
#[instrument(skip_all, fields(collection = %collection))]
pub async fn reorder(
    store: &dyn ContentStore,
    collection: &str,
    ranking: &Ranking,
) -> Result<ReorderReport, StorageError> {
    let items = store.find_all_sorted_by_order(collection).await?;
    let plan = plan_reorder(&items, ranking);
    if !plan.ignored.is_empty() {
        warn!(ignored = ?plan.ignored, "Ranking names unknown keys");
    }

    let mut report = ReorderReport {
        ignored: plan.ignored,
        ..ReorderReport::default()
    };
    let mut failure = None;
    for item in &plan.changed {
        match store.save_order(collection, &item.key, item.order).await {
            Ok(()) => report.reordered.push(item.key.clone()),
            Err(StorageError::NotFound { .. }) => {
                debug!(key = %item.key, "Item deleted before its order was saved");
            }
            Err(e) => {
                warn!(key = %item.key, error = %e, "Failed to save new order");
                failure = Some(e);
                break;
            }
        }
    }

    report.relink = match relink_collection(store, collection).await {
        Ok(relinked) => Some(relinked),
        Err(e) => {
            warn!(error = %e, "Relink after reorder failed");
            None
        }
    };
    if let Some(e) = failure {
        return Err(e);
    }
    info!(reordered = report.reordered.len(), "Reordered collection");
    Ok(report)
}
