//! Configuration management for the HopeBites backend
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::HopeBitesError;
use crate::geocode::RegionProfile;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the HopeBites backend
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HopeBitesConfig {
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Geocoding pipeline configuration
    #[serde(default)]
    pub geocode: GeocodeConfig,
    /// Service-region profile (bounding box, spellings, default point)
    #[serde(default)]
    pub region: RegionProfile,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Geocoding pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeConfig {
    /// Base URL of the Nominatim-compatible provider
    #[serde(default = "default_geocode_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_geocode_timeout")]
    pub timeout_seconds: u32,
    /// Delay between variant/ladder attempts in milliseconds
    #[serde(default = "default_attempt_delay")]
    pub attempt_delay_ms: u64,
    /// Delay between records in batch geocoding in milliseconds
    #[serde(default = "default_batch_delay")]
    pub batch_delay_ms: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_port() -> u16 {
    4000
}

fn default_geocode_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocode_timeout() -> u32 {
    12
}

fn default_attempt_delay() -> u64 {
    1000
}

fn default_batch_delay() -> u64 {
    1500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocode_base_url(),
            timeout_seconds: default_geocode_timeout(),
            attempt_delay_ms: default_attempt_delay(),
            batch_delay_ms: default_batch_delay(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl HopeBitesConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with HOPEBITES_ prefix
        builder = builder.add_source(
            Environment::with_prefix("HOPEBITES")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: HopeBitesConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hopebites").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_region()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocode.timeout_seconds == 0 || self.geocode.timeout_seconds > 300 {
            return Err(HopeBitesError::config(
                "Geocode timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.geocode.attempt_delay_ms > 60_000 {
            return Err(HopeBitesError::config(
                "Geocode attempt delay cannot exceed 60000 ms",
            )
            .into());
        }

        if self.geocode.batch_delay_ms > 60_000 {
            return Err(HopeBitesError::config(
                "Batch geocode delay cannot exceed 60000 ms",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(HopeBitesError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if !self.geocode.base_url.starts_with("http://")
            && !self.geocode.base_url.starts_with("https://")
        {
            return Err(HopeBitesError::config(
                "Geocode base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    /// Validate the region profile
    fn validate_region(&self) -> Result<()> {
        let bounds = &self.region.bounds;
        if bounds.min_lat >= bounds.max_lat || bounds.min_lng >= bounds.max_lng {
            return Err(HopeBitesError::config(
                "Region bounding box must have min < max on both axes",
            )
            .into());
        }

        if !(-90.0..=90.0).contains(&bounds.min_lat) || !(-90.0..=90.0).contains(&bounds.max_lat) {
            return Err(HopeBitesError::config(
                "Region bounding box latitudes must be between -90 and 90",
            )
            .into());
        }

        if !(-180.0..=180.0).contains(&bounds.min_lng)
            || !(-180.0..=180.0).contains(&bounds.max_lng)
        {
            return Err(HopeBitesError::config(
                "Region bounding box longitudes must be between -180 and 180",
            )
            .into());
        }

        if !bounds.contains(self.region.default_latitude, self.region.default_longitude) {
            return Err(HopeBitesError::config(
                "Region default point must sit inside the bounding box",
            )
            .into());
        }

        if self.region.primary_name.is_empty() || self.region.country.is_empty() {
            return Err(HopeBitesError::config(
                "Region primary name and country cannot be empty",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HopeBitesConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.geocode.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocode.timeout_seconds, 12);
        assert_eq!(config.geocode.attempt_delay_ms, 1000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.region.primary_name, "Puducherry");
    }

    #[test]
    fn test_default_config_validates() {
        assert!(HopeBitesConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = HopeBitesConfig::default();
        config.logging.level = "verbose".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = HopeBitesConfig::default();
        config.geocode.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = HopeBitesConfig::default();
        config.geocode.base_url = "nominatim.openstreetmap.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_inverted_bounds() {
        let mut config = HopeBitesConfig::default();
        config.region.bounds.min_lat = config.region.bounds.max_lat + 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_default_point_outside_bounds() {
        let mut config = HopeBitesConfig::default();
        config.region.default_latitude = 28.6139;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = HopeBitesConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("hopebites"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
