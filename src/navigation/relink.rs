use super::linker::compute_links;
use crate::content::NavigationLink;
use crate::storage::{ContentStore, StorageError};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Persisting recomputed links for one item failed. The next successful
/// relink repairs it.
#[derive(Debug, Error)]
#[error("Failed to persist navigation links for '{key}': {source}")]
pub struct LinkRecomputeError {
    pub key: String,
    #[source]
    pub source: StorageError,
}

/// Outcome of one relink pass.
#[derive(Debug, Default)]
pub struct RelinkReport {
    pub collection: String,
    /// Items seen, active and inactive.
    pub items: usize,
    /// Keys whose stored links were rewritten.
    pub updated: Vec<String>,
    pub failures: Vec<LinkRecomputeError>,
    links: HashMap<String, NavigationLink>,
}

impl RelinkReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Links computed for `key` in this pass.
    #[must_use]
    pub fn links_for(&self, key: &str) -> Option<&NavigationLink> {
        self.links.get(key)
    }
}

/// Recompute the whole collection's links and persist the ones that changed.
///
/// Per-item write failures are logged and collected in the report; only a
/// failure to read the collection is returned as an error.
#[instrument(skip_all, fields(collection = %collection))]
pub async fn relink_collection(
    store: &dyn ContentStore,
    collection: &str,
) -> Result<RelinkReport, StorageError> {
    let items = store.find_all_sorted_by_order(collection).await?;
    let links = compute_links(&items);

    let mut report = RelinkReport {
        collection: collection.to_string(),
        items: items.len(),
        ..RelinkReport::default()
    };
    for (item, link) in items.iter().zip(links) {
        if item.links != link {
            match store.save_links(collection, &item.key, &link).await {
                Ok(()) => report.updated.push(item.key.clone()),
                Err(source) => {
                    warn!(key = %item.key, error = %source, "Failed to persist navigation links");
                    report.failures.push(LinkRecomputeError {
                        key: item.key.clone(),
                        source,
                    });
                }
            }
        }
        report.links.insert(item.key.clone(), link);
    }
    debug!(
        items = report.items,
        updated = report.updated.len(),
        failed = report.failures.len(),
        "Relinked collection"
    );
    Ok(report)
}
