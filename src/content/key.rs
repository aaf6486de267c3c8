//! Item keys: stable slugs or generated ids.

/// Longest key accepted for an item.
pub const MAX_KEY_LEN: usize = 128;

/// Check that a key is a lowercase slug (`[a-z0-9-]`, no leading/trailing dash).
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('-')
        && !key.ends_with('-')
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Derive a key from a human title. Returns `None` if nothing sluggable remains.
#[must_use]
pub fn key_from_title(title: &str) -> Option<String> {
    let slug = slug::slugify(title);
    let truncated: String = slug.chars().take(MAX_KEY_LEN).collect();
    let trimmed = truncated.trim_end_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Generate an opaque key for items without a title.
#[must_use]
pub fn generate_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
