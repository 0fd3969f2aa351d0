use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::catalog::DEFAULT_BASE_URL;

/// Runtime settings for the catalog client and local storage.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Catalog API root
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Cuisine fetched when no category filter is active
    #[serde(default = "default_area")]
    pub default_area: String,
    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Directory holding the persisted blobs
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_url: default_base_url(),
            default_area: default_area(),
            timeout: default_timeout(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_area() -> String {
    "Italian".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("pepe-nero").to_string_lossy().into_owned())
        .unwrap_or_else(|| ".pepe-nero".to_string())
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PEPENERO__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PEPENERO__DEFAULT_AREA
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("PEPENERO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
