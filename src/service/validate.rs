//! Payload checks that run before any write or asset-store call.
use super::types::{AssetPatch, CreateItem, UpdateItem, Uploads};
use crate::config::CollectionSchema;
use crate::content::{generate_key, is_valid_key, key_from_title, ContentError, RESERVED_FIELDS};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn is_http_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    matches!(rest, Some(rest) if !rest.is_empty() && !rest.starts_with('/'))
}

/// Opaque payload may not shadow subsystem-owned names or asset fields.
pub fn fields(schema: &CollectionSchema, fields: &Map<String, Value>) -> Result<(), ContentError> {
    for name in fields.keys() {
        if name.is_empty() {
            return Err(ContentError::validation("field names cannot be empty"));
        }
        if RESERVED_FIELDS.contains(&name.as_str()) {
            return Err(ContentError::validation(format!(
                "'{name}' is reserved and cannot be set as a payload field"
            )));
        }
        if schema.asset_field(name).is_some() {
            return Err(ContentError::validation(format!(
                "'{name}' is an asset field; supply an upload or asset patch instead"
            )));
        }
    }
    Ok(())
}

pub fn uploads(schema: &CollectionSchema, uploads: &Uploads) -> Result<(), ContentError> {
    for (name, upload) in uploads {
        let field = schema.asset_field(name).ok_or_else(|| {
            ContentError::validation(format!(
                "'{name}' is not an asset field of {}",
                schema.name
            ))
        })?;
        let kind = upload
            .validate()
            .map_err(|e| ContentError::validation(format!("upload for '{name}': {e}")))?;
        if kind != field.kind {
            return Err(ContentError::validation(format!(
                "upload for '{name}' is a {kind}, expected a {}",
                field.kind
            )));
        }
    }
    Ok(())
}

fn external_url(schema: &CollectionSchema, name: &str, url: &str) -> Result<(), ContentError> {
    if schema.asset_field(name).is_none() {
        return Err(ContentError::validation(format!(
            "'{name}' is not an asset field of {}",
            schema.name
        )));
    }
    if !is_http_url(url) {
        return Err(ContentError::validation(format!(
            "asset URL for '{name}' must be an absolute http(s) URL"
        )));
    }
    Ok(())
}

fn no_double_binding<T>(uploads: &Uploads, changes: &BTreeMap<String, T>) -> Result<(), ContentError> {
    for name in changes.keys() {
        if uploads.contains_key(name) {
            return Err(ContentError::validation(format!(
                "'{name}' has both an upload and an asset change"
            )));
        }
    }
    Ok(())
}

/// Full check of a create payload.
pub fn create(
    schema: &CollectionSchema,
    payload: &CreateItem,
    uploads: &Uploads,
) -> Result<(), ContentError> {
    fields(schema, &payload.fields)?;
    self::uploads(schema, uploads)?;
    for (name, url) in &payload.external_assets {
        external_url(schema, name, url)?;
    }
    no_double_binding(uploads, &payload.external_assets)?;
    for field in schema.asset_fields.iter().filter(|f| f.required) {
        if !uploads.contains_key(&field.name) && !payload.external_assets.contains_key(&field.name)
        {
            return Err(ContentError::validation(format!(
                "asset field '{}' is required",
                field.name
            )));
        }
    }
    Ok(())
}

/// Full check of an update patch.
pub fn update(
    schema: &CollectionSchema,
    patch: &UpdateItem,
    uploads: &Uploads,
) -> Result<(), ContentError> {
    fields(schema, &patch.fields)?;
    self::uploads(schema, uploads)?;
    for (name, change) in &patch.assets {
        match change {
            AssetPatch::External(url) => external_url(schema, name, url)?,
            AssetPatch::Clear => {
                let field = schema.asset_field(name).ok_or_else(|| {
                    ContentError::validation(format!(
                        "'{name}' is not an asset field of {}",
                        schema.name
                    ))
                })?;
                if field.required {
                    return Err(ContentError::validation(format!(
                        "asset field '{name}' is required and cannot be cleared"
                    )));
                }
            }
        }
    }
    no_double_binding(uploads, &patch.assets)
}

/// Explicit key, else the slug of the title field, else a generated id.
pub fn resolve_key(schema: &CollectionSchema, payload: &CreateItem) -> Result<String, ContentError> {
    if let Some(key) = &payload.key {
        if !is_valid_key(key) {
            return Err(ContentError::validation(format!(
                "key '{key}' must be a lowercase slug of letters, digits and '-'"
            )));
        }
        return Ok(key.clone());
    }
    let from_title = payload
        .fields
        .get(&schema.title_field)
        .and_then(Value::as_str)
        .and_then(key_from_title);
    Ok(from_title.unwrap_or_else(generate_key))
}
