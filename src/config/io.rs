use super::defaults::builtin_collections;
use super::types::CmsConfig;
use super::ConfigError;
use crate::content::{is_valid_key, RESERVED_FIELDS};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Canonical config location (`~/.cms-content/config.toml`).
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cms-content").join("config.toml"))
}

/// Load the config from its canonical location, or defaults if there is none.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read, parsed or validated.
pub fn load_config() -> Result<CmsConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine config directory; using defaults");
            Ok(CmsConfig::default())
        }
    }
}

/// Load the config at `path`; a missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read, parsed or validated.
pub fn load_config_from(path: &Path) -> Result<CmsConfig, ConfigError> {
    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(CmsConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate TOML config text.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] on syntax errors and [`ConfigError::Invalid`]
/// when collection declarations are inconsistent.
pub fn parse_config(content: &str) -> Result<CmsConfig, ConfigError> {
    let mut config: CmsConfig = toml::from_str(content)?;
    if config.collections.is_empty() {
        config.collections = builtin_collections();
    }
    validate(&config)?;
    Ok(config)
}

fn validate(config: &CmsConfig) -> Result<(), ConfigError> {
    if config.asset_store.public_base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("assetStore.publicBaseUrl is empty".into()));
    }
    let mut names = HashSet::new();
    for schema in &config.collections {
        if !is_valid_key(&schema.name) {
            return Err(ConfigError::Invalid(format!(
                "collection name '{}' must be a lowercase slug",
                schema.name
            )));
        }
        if !names.insert(schema.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "collection '{}' is declared twice",
                schema.name
            )));
        }
        let mut fields = HashSet::new();
        for field in &schema.asset_fields {
            if field.name.is_empty() || RESERVED_FIELDS.contains(&field.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "collection '{}' has an invalid asset field name '{}'",
                    schema.name, field.name
                )));
            }
            if !fields.insert(field.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "collection '{}' declares asset field '{}' twice",
                    schema.name, field.name
                )));
            }
        }
        if schema.asset_field(&schema.title_field).is_some() {
            return Err(ConfigError::Invalid(format!(
                "collection '{}' uses asset field '{}' as its title field",
                schema.name, schema.title_field
            )));
        }
    }
    Ok(())
}
