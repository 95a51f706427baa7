//! wayplan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main wayplan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Geocoding and image lookup configuration
    pub places: PlacesConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks ranges that would otherwise surface as confusing runtime
    /// failures. Call this early in startup to fail fast.
    pub fn validate(&self) -> Result<()> {
        if self.llm.max_tokens == 0 {
            return Err(eyre::eyre!("llm.max-tokens must be greater than 0"));
        }
        if self.llm.timeout_ms == 0 {
            return Err(eyre::eyre!("llm.timeout-ms must be greater than 0"));
        }
        if self.places.timeout_ms == 0 {
            return Err(eyre::eyre!("places.timeout-ms must be greater than 0"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .wayplan.yml
        let local_config = PathBuf::from(".wayplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/wayplan/config.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("wayplan").join("config.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openrouter" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Optional file containing the API key (fallback when the env var is unset)
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// HTTP-Referer header value sent to OpenRouter
    pub referer: String,

    /// X-Title header value sent to OpenRouter
    #[serde(rename = "app-title")]
    pub app_title: String,
}

impl LlmConfig {
    /// Resolve the API key: environment variable first, then the key file
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        if let Some(path) = &self.api_key_file {
            let key = fs::read_to_string(path)
                .context(format!("Failed to read API key file {}", path.display()))?;
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        Err(eyre::eyre!(
            "No API key found. Set the {} environment variable or configure llm.api-key-file.",
            self.api_key_env
        ))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            model: "deepseek/deepseek-chat-v3.1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key_file: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
            referer: "https://wayplan.dev".to_string(),
            app_title: "wayplan".to_string(),
        }
    }
}

/// Geocoding and image lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Photon geocoding endpoint
    #[serde(rename = "geocode-url")]
    pub geocode_url: String,

    /// Wikipedia API endpoint for image search
    #[serde(rename = "image-url")]
    pub image_url: String,

    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            geocode_url: "https://photon.komoot.io/api".to_string(),
            image_url: "https://en.wikipedia.org/w/api.php".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the trips database
    #[serde(rename = "db-path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use the local data directory (~/.local/share/wayplan on Linux)
        let db_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wayplan")
            .join("trips.db");

        Self { db_path }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let file = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wayplan")
            .join("logs")
            .join("wayplan.log");

        Self {
            level: "info".to_string(),
            file,
        }
    }
}
