//! Configuration management for Bookshelf

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Backing file holding the whole catalog
    pub path: PathBuf,
    /// Write through a temp file and rename instead of truncating in place
    #[serde(default = "default_atomic_write")]
    pub atomic_write: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/` files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Load configuration, looking for `default.*` and `{RUN_MODE}.*` under `dir`
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = AppConfig::default();

        let config = Config::builder()
            .set_default(
                "storage.path",
                defaults.storage.path.to_string_lossy().into_owned(),
            )?
            .set_default("storage.atomic_write", defaults.storage.atomic_write)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join(&run_mode)).required(false))
            // BOOKSHELF__STORAGE__PATH, BOOKSHELF__LOGGING__LEVEL, ...
            .add_source(
                Environment::with_prefix("BOOKSHELF")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("storage.path", env::var("BOOKSHELF_FILE").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl StorageConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic_write: default_atomic_write(),
        }
    }
}

fn default_atomic_write() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("library.json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
