//! Configuration management for the weather service
//!
//! Handles loading configuration from an optional TOML file and
//! `KOREA_WEATHER_*` environment variables, and validates the result.

use crate::WeatherError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Value shipped in sample configs; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "<your_api_key>";

/// Root configuration for the weather service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// data.go.kr service key (decoded form)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the village forecast service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Rows requested per page
    #[serde(default = "default_num_of_rows")]
    pub num_of_rows: u32,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://apis.data.go.kr/1360000/VilageFcstInfoService_2.0".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_num_of_rows() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            num_of_rows: default_num_of_rows(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl WeatherConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.or_else(Self::get_config_path);

        if let Some(config_file) = config_file.filter(|path| path.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // KOREA_WEATHER_API_KEY -> api_key
        builder = builder.add_source(
            Environment::with_prefix("KOREA_WEATHER")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("korea-weather").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
        if self.timeout_seconds == 0 {
            self.timeout_seconds = default_timeout();
        }
        if self.num_of_rows == 0 {
            self.num_of_rows = default_num_of_rows();
        }
        if self.log_level.is_empty() {
            self.log_level = default_log_level();
        }
        if self.log_format.is_empty() {
            self.log_format = default_log_format();
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
    }

    /// Validate all configuration settings
    ///
    /// A missing API key is not an error here; each weather call checks it.
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The API key if it is set to something other than the placeholder
    pub fn api_key(&self) -> crate::Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(WeatherError::MissingApiKey),
        }
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=60).contains(&self.timeout_seconds) {
            return Err(WeatherError::config(
                "Request timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if !(1..=1000).contains(&self.num_of_rows) {
            return Err(WeatherError::config(
                "numOfRows must be between 1 and 1000",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(WeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.log_format.as_str()) {
            return Err(WeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.log_format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(WeatherError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
