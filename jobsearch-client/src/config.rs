use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.reed.co.uk/api/1.0/";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "https://www.reed.co.uk/api/1.0/"
# Key issued at https://www.reed.co.uk/developers/jobseeker
# api_key = "your-api-key"

[search]
debounce_ms = 300
page_size = 25

[database]
# path = "/path/to/bookmarks.sqlite"
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ClientConfig {
    pub api: Option<ApiConfig>,
    pub search: Option<SearchConfig>,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub page_size: Option<i64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_size: Some(shared_types::DEFAULT_PAGE_SIZE),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

impl ClientConfig {
    /// Load the config from the default location, writing a commented
    /// default file first if none exists.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?;

        let config: Self = builder.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(page_size) = self.search.as_ref().and_then(|search| search.page_size) {
            if page_size <= 0 {
                return Err(ConfigError::Message(format!(
                    "search.page_size must be positive, got {page_size}"
                )));
            }
        }
        Ok(())
    }

    pub fn api(&self) -> ApiConfig {
        self.api.clone().unwrap_or_default()
    }

    pub fn search(&self) -> SearchConfig {
        self.search.clone().unwrap_or_default()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("jobsearch").join("client.toml")
    } else {
        PathBuf::from("client.toml")
    }
}
