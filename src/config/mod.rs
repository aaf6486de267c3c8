//! Configuration loaded from `~/.cms-content/config.toml`.
//!
//! The file is optional. Without it the asset store writes under the user's
//! data directory and the built-in collections (services, banners, events)
//! are served.
mod defaults;
mod io;
mod types;

pub use defaults::builtin_collections;
pub use io::{config_path, load_config, load_config_from, parse_config};
pub use types::{AssetFieldSpec, AssetStoreConfig, CmsConfig, CollectionSchema};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
