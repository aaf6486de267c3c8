use crate::navigation::RelinkReport;
use serde::{Deserialize, Serialize};

/// A caller-supplied ranking.
///
/// Deserializes from either a JSON array of keys or an array of
/// `{ "key": ..., "order": ... }` objects (`id` is accepted for `key`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ranking {
    /// Keys in their new order; the index becomes the item's `order`.
    Keys(Vec<String>),
    /// Explicit order values.
    Positions(Vec<RankEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    #[serde(alias = "id")]
    pub key: String,
    pub order: i64,
}

impl RankEntry {
    pub fn new(key: impl Into<String>, order: i64) -> Self {
        Self {
            key: key.into(),
            order,
        }
    }
}

impl Ranking {
    /// `(key, order)` pairs in ranking order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, i64)> {
        match self {
            Self::Keys(keys) => keys
                .iter()
                .enumerate()
                .map(|(index, key)| (key.as_str(), i64::try_from(index).unwrap_or(i64::MAX)))
                .collect(),
            Self::Positions(entries) => entries
                .iter()
                .map(|entry| (entry.key.as_str(), entry.order))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Keys(keys) => keys.is_empty(),
            Self::Positions(entries) => entries.is_empty(),
        }
    }
}

/// Outcome of a reorder.
#[derive(Debug, Default)]
pub struct ReorderReport {
    /// Keys whose `order` was rewritten.
    pub reordered: Vec<String>,
    /// Ranking keys that matched no item.
    pub ignored: Vec<String>,
    /// `None` if the collection could not be re-read for relinking.
    pub relink: Option<RelinkReport>,
}
