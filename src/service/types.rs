use crate::assets::Upload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// New uploads keyed by asset field name.
pub type Uploads = BTreeMap<String, Upload>;

/// Payload for creating an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    /// Derived from the title field when absent.
    #[serde(default)]
    pub key: Option<String>,
    /// End of the collection when absent.
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Caller-hosted URLs bound to asset fields.
    #[serde(default)]
    pub external_assets: BTreeMap<String, String>,
}

impl CreateItem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = Some(false);
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_external_asset(mut self, field: impl Into<String>, url: impl Into<String>) -> Self {
        self.external_assets.insert(field.into(), url.into());
        self
    }
}

/// Change to one asset field other than a new upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetPatch {
    /// Bind a caller-hosted URL.
    External(String),
    /// Unbind whatever the field holds.
    Clear,
}

/// Partial update of an item. Absent members are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Merged into the payload; `null` removes a field.
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub assets: BTreeMap<String, AssetPatch>,
}

impl UpdateItem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_asset(mut self, field: impl Into<String>, patch: AssetPatch) -> Self {
        self.assets.insert(field.into(), patch);
        self
    }

    /// Whether applying the patch can move the item within the chain.
    #[must_use]
    pub fn touches_ranking(&self) -> bool {
        self.order.is_some() || self.is_active.is_some()
    }
}
