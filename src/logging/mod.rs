//! `tracing` subscriber setup for processes embedding the content service.
mod init;

pub use init::{init_logging, parse_rotation};

use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::rolling::Rotation;

pub const LOG_FILENAME: &str = "cms-content.log";

static LOG_FILE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Where the rolling log file lives, once [`init_logging`] has run.
pub fn log_file_path() -> Option<&'static PathBuf> {
    LOG_FILE_PATH.get()
}

pub struct LogConfig {
    pub log_dir: PathBuf,
    /// Used when `RUST_LOG` is not set.
    pub log_level: Level,
    pub json_format: bool,
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cms-content")
            .join("logs");
        Self {
            log_dir,
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}
