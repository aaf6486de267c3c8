//! Persistence for ordered collections.
//!
//! No transactional guarantees are assumed from any backend: every call is an
//! independent item-local read or write.
mod error;
mod file;
mod memory;
mod store;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{sort_by_order, ContentStore};
