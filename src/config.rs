//! Provides runtime configuration for the generation client.
//!
//! The endpoint address is fixed at build time through the `SHAPECAST_ENDPOINT`
//! environment variable and falls back to a placeholder. A JSON5 file can
//! override it, and the CLI can override both.
//!
//! # Examples
//! ```
//! use shapecast::config::Config;
//!
//! let config = Config::from_json5("{ endpoint: 'http://10.0.0.5:8000/' }").unwrap();
//! let url = config.generate_url().unwrap();
//! assert_eq!(url.as_str(), "http://10.0.0.5:8000/generate-3d");
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

/// The address used when no endpoint was injected at build time.
pub const PLACEHOLDER_ENDPOINT: &str = "http://YOUR_AKASH_API_URL";

/// The path appended to the endpoint for generation requests.
pub const GENERATE_PATH: &str = "generate-3d";

/// Returns the endpoint baked in at build time.
pub fn default_endpoint() -> &'static str {
    option_env!("SHAPECAST_ENDPOINT").unwrap_or(PLACEHOLDER_ENDPOINT)
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base address of the generation service.
    pub endpoint: String,
    /// Edge length in pixels of the rendered viewer canvas.
    pub render_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint().to_string(),
            render_size: 512,
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not valid JSON5 or has unknown keys.
    Parse(String),
    /// The endpoint is not an absolute http(s) URL.
    InvalidEndpoint(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::InvalidEndpoint(endpoint) => {
                write!(f, "Invalid endpoint: {}", endpoint)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl Config {
    /// Parses configuration from JSON5 text. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON5 or contains unknown keys.
    pub fn from_json5(text: &str) -> Result<Self, ConfigError> {
        json5::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads configuration from a JSON5 file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json5(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Replaces the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Returns the full URL generation requests are posted to.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an absolute http(s) URL.
    ///
    /// # Examples
    /// ```
    /// use shapecast::config::Config;
    ///
    /// let config = Config::default().with_endpoint("not a url");
    /// assert!(config.generate_url().is_err());
    /// ```
    pub fn generate_url(&self) -> Result<Url, ConfigError> {
        let base = self.endpoint.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{}/{}", base, GENERATE_PATH))
            .map_err(|_| ConfigError::InvalidEndpoint(self.endpoint.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidEndpoint(self.endpoint.clone())),
        }
    }
}
