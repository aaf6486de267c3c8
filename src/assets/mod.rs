//! Externally hosted media bound to item fields.
//!
//! [`AssetStore`] is the port to the hosting provider. [`AssetBinder`] keeps
//! item fields and hosted assets consistent across upload, replace and delete,
//! retiring superseded assets in the background.
mod binding;
mod local;
mod policy;
mod store;
mod types;

pub use binding::{AssetBinder, CleanupPlan};
pub use local::LocalAssetStore;
pub use policy::ManagedUrlPolicy;
pub use store::{AssetStore, StoredAsset};
pub use types::{
    get_mime_type, kind_for_filename, sanitize_filename, AssetStoreError, Upload,
    IMAGE_MIME_TYPES, VIDEO_MIME_TYPES,
};
