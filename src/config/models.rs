use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Public base URL embedded in share links returned to clients
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_url: default_public_url(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:8787".parse().unwrap()
}

fn default_public_url() -> String {
    "http://localhost:8787".to_string()
}

fn default_max_upload_bytes() -> ByteSize {
    ByteSize(5 * 1024 * 1024) // 5 MB
}

/// Storage provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// Process-local store, lost on restart. Development and tests only.
    #[default]
    Memory,
    S3,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Key prefix under which screenshot objects are written
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    /// S3 access key (loaded from environment, not from config file)
    #[serde(skip)]
    pub access_key: Option<String>,
    /// S3 secret key (loaded from environment, not from config file)
    #[serde(skip)]
    pub secret_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            bucket: default_bucket(),
            key_prefix: default_key_prefix(),
            endpoint: None,
            region: None,
            access_key: None,
            secret_key: None,
        }
    }
}

fn default_bucket() -> String {
    "shotlink-screenshots".to_string()
}

fn default_key_prefix() -> String {
    "screenshots".to_string()
}

/// Retention configuration for stored screenshots
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    #[serde(default = "default_retention_days")]
    pub default_days: u32,
    #[serde(default = "default_min_days")]
    pub min_days: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            default_days: default_retention_days(),
            min_days: default_min_days(),
            max_days: default_max_days(),
        }
    }
}

fn default_retention_days() -> u32 {
    7
}

fn default_min_days() -> u32 {
    1
}

fn default_max_days() -> u32 {
    30
}

/// Upload client configuration (used by the capture subcommand)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the upload server, normalized before use
    #[serde(default = "default_client_base_url")]
    pub base_url: String,
    /// Value stamped into upload metadata as the capture source
    #[serde(default = "default_client_source")]
    pub source: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            source: default_client_source(),
        }
    }
}

fn default_client_base_url() -> String {
    "http://localhost:8787".to_string()
}

fn default_client_source() -> String {
    "shotlink-capture".to_string()
}
