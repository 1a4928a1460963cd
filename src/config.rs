//! Configuration management for `vaer-compare`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ForecastError;
use crate::models::location::DEFAULT_LOCATION_ID;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompareConfig {
    /// Upstream weather services
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Where the comparison page is written
    #[serde(default)]
    pub output: OutputConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Weather service endpoints and HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// MET locationforecast base URL (without `/compact`)
    #[serde(default = "default_met_base_url")]
    pub met_base_url: String,
    /// Open-Meteo forecast base URL (without `/forecast`)
    #[serde(default = "default_open_meteo_base_url")]
    pub open_meteo_base_url: String,
    /// Open-Meteo geocoding base URL (without `/search`)
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// User-Agent header; MET rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the generated HTML page
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Location id used when none is given on the command line
    #[serde(default = "default_location")]
    pub location: String,
}

// Default value functions
fn default_met_base_url() -> String {
    "https://api.met.no/weatherapi/locationforecast/2.0".to_string()
}

fn default_open_meteo_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_user_agent() -> String {
    format!("vaer-compare/{}", crate::VERSION)
}

fn default_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("vaer-6dager.html")
}

fn default_location() -> String {
    DEFAULT_LOCATION_ID.to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            met_base_url: default_met_base_url(),
            open_meteo_base_url: default_open_meteo_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
        }
    }
}

impl CompareConfig {
    /// Load configuration from `config_path`, or the default file location
    /// when none is given, overlaid with the environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // VAER_SOURCES__TIMEOUT_SECONDS=10 etc.
        builder = builder.add_source(
            Environment::with_prefix("VAER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CompareConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vaer-compare").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.sources.met_base_url.is_empty() {
            self.sources.met_base_url = default_met_base_url();
        }
        if self.sources.open_meteo_base_url.is_empty() {
            self.sources.open_meteo_base_url = default_open_meteo_base_url();
        }
        if self.sources.geocoding_base_url.is_empty() {
            self.sources.geocoding_base_url = default_geocoding_base_url();
        }
        if self.sources.user_agent.is_empty() {
            self.sources.user_agent = default_user_agent();
        }
        if self.sources.timeout_seconds == 0 {
            self.sources.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.output.path.as_os_str().is_empty() {
            self.output.path = default_output_path();
        }
        if self.defaults.location.is_empty() {
            self.defaults.location = default_location();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let urls = [
            ("MET", &self.sources.met_base_url),
            ("Open-Meteo", &self.sources.open_meteo_base_url),
            ("Geocoding", &self.sources.geocoding_base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ForecastError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.sources.timeout_seconds > 300 {
            return Err(
                ForecastError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.sources.user_agent.trim().is_empty() {
            return Err(ForecastError::config("User-Agent cannot be blank").into());
        }

        Ok(())
    }
}
