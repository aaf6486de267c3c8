use crate::common::frontmatter::FrontmatterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
    #[error("Item not found: {collection}/{key}")]
    NotFound { collection: String, key: String },
    #[error("Invalid storage name: {0}")]
    InvalidName(String),
    #[error("{0}")]
    Custom(String),
}

impl StorageError {
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}
