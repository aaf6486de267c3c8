use crate::content::AssetKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One asset-bearing field of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFieldSpec {
    pub name: String,
    pub kind: AssetKind,
    /// Must be bound on create.
    #[serde(default)]
    pub required: bool,
}

impl AssetFieldSpec {
    pub fn new(name: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Declared shape of one ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    pub name: String,
    /// Payload field slugified into the key when none is given.
    #[serde(default = "default_title_field")]
    pub title_field: String,
    #[serde(default)]
    pub asset_fields: Vec<AssetFieldSpec>,
}

fn default_title_field() -> String {
    "title".to_string()
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title_field: default_title_field(),
            asset_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title_field(mut self, field: impl Into<String>) -> Self {
        self.title_field = field.into();
        self
    }

    #[must_use]
    pub fn with_asset(mut self, field: AssetFieldSpec) -> Self {
        self.asset_fields.push(field);
        self
    }

    #[must_use]
    pub fn asset_field(&self, name: &str) -> Option<&AssetFieldSpec> {
        self.asset_fields.iter().find(|f| f.name == name)
    }
}

/// Where the filesystem asset store keeps bytes and which URLs it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetStoreConfig {
    pub root: PathBuf,
    /// Base of every URL minted for an upload.
    pub public_base_url: String,
    /// Additional prefixes recognised as managed, e.g. a previous CDN host.
    pub managed_url_prefixes: Vec<String>,
}

impl Default for AssetStoreConfig {
    fn default() -> Self {
        let root = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cms-content")
            .join("assets");
        Self {
            root,
            public_base_url: "http://localhost:8080/assets".to_string(),
            managed_url_prefixes: Vec::new(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsConfig {
    #[serde(default)]
    pub asset_store: AssetStoreConfig,
    /// Empty means the built-in collections.
    #[serde(default)]
    pub collections: Vec<CollectionSchema>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            asset_store: AssetStoreConfig::default(),
            collections: super::defaults::builtin_collections(),
        }
    }
}
