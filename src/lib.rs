#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod assets;
pub mod common;
pub mod config;
pub mod content;
pub mod logging;
pub mod metrics;
pub mod navigation;
pub mod reorder;
pub mod service;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use assets::{AssetBinder, AssetStore, AssetStoreError, CleanupPlan, LocalAssetStore, Upload};
pub use config::{load_config, AssetFieldSpec, CmsConfig, CollectionSchema, ConfigError};
pub use content::{AssetKind, AssetRef, ContentError, ContentItem, NavigationLink};
pub use logging::{init_logging, LogConfig};
pub use navigation::{compute_links, relink_collection, LinkRecomputeError, RelinkReport};
pub use reorder::{RankEntry, Ranking, ReorderReport};
pub use service::{AssetPatch, ContentService, CreateItem, UpdateItem, Uploads};
pub use storage::{ContentStore, FileStore, MemoryStore, StorageError};
