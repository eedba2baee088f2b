//! Configuration management for shotlink
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `SHOTLINK__<section>__<key>`
//!
//! Examples:
//! - `SHOTLINK__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `SHOTLINK__SERVER__PUBLIC_URL=https://shots.example.com`
//! - `SHOTLINK__STORAGE__PROVIDER=s3`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/shotlink.toml`.
//! This can be overridden using the `SHOTLINK_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{
    ClientConfig, Config, RetentionConfig, ServerConfig, StorageConfig, StorageProvider,
};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`SHOTLINK__*`)
    /// 2. TOML file (default: `config/shotlink.toml`)
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

/// Normalize a server base URL before it is used to build endpoints or
/// share links: trims whitespace, strips trailing slashes and a trailing
/// `/upload` suffix left over from users pasting the full endpoint.
pub fn normalize_base_url(raw: &str) -> String {
    let mut url = raw.trim();

    while let Some(stripped) = url.strip_suffix('/') {
        url = stripped;
    }
    if let Some(stripped) = url.strip_suffix("/upload") {
        url = stripped;
        while let Some(stripped) = url.strip_suffix('/') {
            url = stripped;
        }
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_rejects_invalid_retention() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[retention]
default_days = 60
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::DefaultRetentionOutOfRange { .. })
        ));
    }

    #[test]
    fn normalize_strips_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://example.com///"),
            "http://example.com"
        );
        assert_eq!(normalize_base_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn normalize_strips_upload_suffix() {
        assert_eq!(
            normalize_base_url("http://example.com/upload/"),
            "http://example.com"
        );
        assert_eq!(
            normalize_base_url("http://example.com/upload"),
            "http://example.com"
        );
        assert_eq!(
            normalize_base_url("  https://shots.example.com/upload  "),
            "https://shots.example.com"
        );
    }

    #[test]
    fn normalize_keeps_upload_elsewhere_in_path() {
        assert_eq!(
            normalize_base_url("http://example.com/uploads"),
            "http://example.com/uploads"
        );
    }
}
