use std::time::Instant;
use tracing::info;

/// Logs how long an operation on a collection took when dropped.
///
/// ```ignore
/// pub async fn create(&self, collection: &str, ...) -> Result<ContentItem, ContentError> {
///     let mut timer = OperationTimer::new("create", collection);
///     ...
///     timer.set_key(&item.key);
/// }
/// ```
pub struct OperationTimer {
    name: &'static str,
    collection: String,
    key: Option<String>,
    start: Instant,
}

impl OperationTimer {
    #[must_use]
    pub fn new(name: &'static str, collection: &str) -> Self {
        Self {
            name,
            collection: collection.to_string(),
            key: None,
            start: Instant::now(),
        }
    }

    /// Attach the item the operation resolved to.
    pub fn set_key(&mut self, key: &str) {
        self.key = Some(key.to_string());
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.name,
            collection = %self.collection,
            key = self.key.as_deref().unwrap_or("-"),
            duration_ms = %duration.as_millis(),
            "Operation completed"
        );
    }
}

/// Short id correlating the log lines of one service call.
#[must_use]
pub fn generate_request_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id.get(..8).unwrap_or(&id).to_string()
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
