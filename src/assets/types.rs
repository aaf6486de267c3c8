use crate::content::AssetKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetStoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Upload is empty: {0}")]
    EmptyUpload(String),
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("Asset store rejected the request: {0}")]
    Rejected(String),
}

pub const IMAGE_MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("svg", "image/svg+xml"),
];

pub const VIDEO_MIME_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
];

fn extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// MIME type for a supported image or video filename.
#[must_use]
pub fn get_mime_type(filename: &str) -> Option<&'static str> {
    let ext = extension(filename)?;
    IMAGE_MIME_TYPES
        .iter()
        .chain(VIDEO_MIME_TYPES)
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Asset kind implied by a filename's extension.
#[must_use]
pub fn kind_for_filename(filename: &str) -> Option<AssetKind> {
    let ext = extension(filename)?;
    if IMAGE_MIME_TYPES.iter().any(|(e, _)| *e == ext) {
        Some(AssetKind::Image)
    } else if VIDEO_MIME_TYPES.iter().any(|(e, _)| *e == ext) {
        Some(AssetKind::Video)
    } else {
        None
    }
}

pub fn sanitize_filename(filename: &str) -> Result<String, AssetStoreError> {
    if filename.is_empty() {
        return Err(AssetStoreError::InvalidFilename(
            "Filename cannot be empty".to_string(),
        ));
    }
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(AssetStoreError::InvalidFilename(
            "Filename cannot contain path separators or '..'".to_string(),
        ));
    }
    if filename.starts_with('.') {
        return Err(AssetStoreError::InvalidFilename(
            "Filename cannot start with '.'".to_string(),
        ));
    }
    if filename.len() > 255 {
        return Err(AssetStoreError::InvalidFilename(
            "Filename too long (max 255 characters)".to_string(),
        ));
    }
    Ok(filename.to_string())
}

/// Bytes submitted for one asset field.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Check the upload is a non-empty, supported file and return its kind.
    pub fn validate(&self) -> Result<AssetKind, AssetStoreError> {
        let filename = sanitize_filename(&self.filename)?;
        let kind = kind_for_filename(&filename)
            .ok_or_else(|| AssetStoreError::UnsupportedFileType(filename.clone()))?;
        if self.data.is_empty() {
            return Err(AssetStoreError::EmptyUpload(filename));
        }
        Ok(kind)
    }

    #[must_use]
    pub fn extension(&self) -> Option<String> {
        extension(&self.filename)
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("bytes", &self.data.len())
            .finish()
    }
}
