use super::types::{AssetFieldSpec, CollectionSchema};
use crate::content::AssetKind;

/// Services, banner slides and events as shipped.
#[must_use]
pub fn builtin_collections() -> Vec<CollectionSchema> {
    vec![
        CollectionSchema::new("services")
            .with_asset(AssetFieldSpec::new("heroImage", AssetKind::Image)),
        CollectionSchema::new("banners")
            .with_asset(AssetFieldSpec::new("image", AssetKind::Image).required())
            .with_asset(AssetFieldSpec::new("video", AssetKind::Video)),
        CollectionSchema::new("events")
            .with_title_field("name")
            .with_asset(AssetFieldSpec::new("coverImage", AssetKind::Image)),
    ]
}
