//! Content items stored in ordered collections.
//!
//! Every entity type (services, banner slides, events) is a [`ContentItem`]
//! in a named collection. The subsystem only interprets the rank, the active
//! flag, the derived navigation links and the bound assets; everything else
//! travels as opaque payload fields.

pub mod error;
pub mod key;
pub mod types;

pub use error::ContentError;
pub use key::{generate_key, is_valid_key, key_from_title};
pub use types::{AssetKind, AssetRef, ContentItem, NavigationLink, RESERVED_FIELDS};
