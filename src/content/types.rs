use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Payload keys the subsystem owns. Callers may not smuggle them in through
/// the opaque field map.
pub const RESERVED_FIELDS: &[&str] = &[
    "key",
    "order",
    "isActive",
    "prevKey",
    "nextKey",
    "assets",
    "createdAt",
    "updatedAt",
];

/// Media kind of a bound asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Folder used by stores that partition bytes per kind.
    #[must_use]
    pub fn folder_name(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(format!("Unknown asset kind: {s}")),
        }
    }
}

/// Reference to a hosted asset bound to one field of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub url: String,
    /// Opaque id at the asset store; absent for caller-supplied URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    pub kind: AssetKind,
}

impl AssetRef {
    #[must_use]
    pub fn managed(url: impl Into<String>, provider_id: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            url: url.into(),
            provider_id: Some(provider_id.into()),
            kind,
        }
    }

    #[must_use]
    pub fn external(url: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            url: url.into(),
            provider_id: None,
            kind,
        }
    }
}

/// Derived previous/next pointers within the active subset of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationLink {
    #[serde(default)]
    pub prev_key: Option<String>,
    #[serde(default)]
    pub next_key: Option<String>,
}

impl NavigationLink {
    #[must_use]
    pub fn between(prev_key: Option<&str>, next_key: Option<&str>) -> Self {
        Self {
            prev_key: prev_key.map(str::to_string),
            next_key: next_key.map(str::to_string),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prev_key.is_none() && self.next_key.is_none()
    }
}

/// One entry of an ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Stable slug or id, unique within the collection.
    pub key: String,
    /// Relative rank; need not be contiguous or unique.
    pub order: i64,
    pub is_active: bool,
    #[serde(flatten)]
    pub links: NavigationLink,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, AssetRef>,
    /// Opaque payload, never interpreted here.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl ContentItem {
    #[must_use]
    pub fn new(key: impl Into<String>, order: i64) -> Self {
        let now = crate::utils::now_iso();
        Self {
            key: key.into(),
            order,
            is_active: true,
            links: NavigationLink::default(),
            assets: BTreeMap::new(),
            fields: Map::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[must_use]
    pub fn asset(&self, field: &str) -> Option<&AssetRef> {
        self.assets.get(field)
    }

    #[must_use]
    pub fn prev_key(&self) -> Option<&str> {
        self.links.prev_key.as_deref()
    }

    #[must_use]
    pub fn next_key(&self) -> Option<&str> {
        self.links.next_key.as_deref()
    }

    /// String value of a payload field, if present and a string.
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn touch(&mut self) {
        self.updated_at = crate::utils::now_iso();
    }
}
