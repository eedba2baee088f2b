//! Screenshot object storage
//!
//! Owns the persisted screenshot lifecycle: validation, identity,
//! retention stamping, and the put/get/delete operations against an
//! Apache Arrow object_store backend. Objects are written exactly once
//! under a freshly generated key and never updated in place.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use object_store::path::Path as StoragePath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{self, Config, StorageProvider};

/// Maximum accepted screenshot payload
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/png"];

/// Retention applied when the uploader does not request one
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Custom attribute key carrying the serialized metadata blob
const METADATA_ATTRIBUTE: &str = "shotlink-meta";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file size {size} exceeds maximum allowed {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("unsupported content type: {0}")]
    InvalidFormat(String),

    #[error("failed to persist screenshot: {0}")]
    PutFailed(#[source] object_store::Error),

    #[error("failed to encode object metadata: {0}")]
    MetadataEncoding(#[from] serde_json::Error),

    #[error("storage backend configuration error: {0}")]
    Backend(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Caller-supplied upload metadata. Unknown keys are carried through
/// untouched and persisted alongside the well-known fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Requested retention in days; range-checked by the protocol layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Metadata blob serialized onto the stored object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    uploaded_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    content_type: String,
    #[serde(flatten)]
    upload: UploadMetadata,
}

/// Returned by a successful save
#[derive(Debug, Clone)]
pub struct SavedScreenshot {
    pub id: Uuid,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// A retrieved screenshot with its stored attributes
#[derive(Debug, Clone)]
pub struct StoredScreenshot {
    pub data: Bytes,
    pub content_type: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub metadata: UploadMetadata,
}

/// Screenshot store wrapping any object_store backend
#[derive(Clone)]
pub struct ScreenshotStore {
    store: Arc<dyn ObjectStore>,
    public_url: String,
    key_prefix: String,
    max_file_size: u64,
    default_retention_days: u32,
}

impl ScreenshotStore {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        public_url: &str,
        key_prefix: &str,
        max_file_size: u64,
        default_retention_days: u32,
    ) -> Self {
        Self {
            store,
            public_url: config::normalize_base_url(public_url),
            key_prefix: key_prefix.trim_matches('/').to_string(),
            max_file_size,
            default_retention_days,
        }
    }

    /// Create in-memory storage for testing/development
    pub fn in_memory(public_url: &str) -> Self {
        Self::new(
            Arc::new(object_store::memory::InMemory::new()),
            public_url,
            "screenshots",
            MAX_FILE_SIZE,
            DEFAULT_RETENTION_DAYS,
        )
    }

    /// Build a store from configuration
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match cfg.storage.provider {
            StorageProvider::Memory => Arc::new(object_store::memory::InMemory::new()),
            StorageProvider::S3 => {
                let mut builder = object_store::aws::AmazonS3Builder::new()
                    .with_bucket_name(cfg.storage.bucket.as_str())
                    .with_region(cfg.storage.region.as_deref().unwrap_or("us-east-1"));
                if let Some(endpoint) = &cfg.storage.endpoint {
                    builder = builder
                        .with_endpoint(endpoint.as_str())
                        .with_allow_http(true);
                }
                if let Some(access_key) = &cfg.storage.access_key {
                    builder = builder.with_access_key_id(access_key.as_str());
                }
                if let Some(secret_key) = &cfg.storage.secret_key {
                    builder = builder.with_secret_access_key(secret_key.as_str());
                }
                let s3 = builder
                    .build()
                    .map_err(|e| StorageError::Backend(e.to_string()))?;
                Arc::new(s3)
            }
        };

        Ok(Self::new(
            store,
            &cfg.server.public_url,
            &cfg.storage.key_prefix,
            cfg.server.max_upload_bytes.as_u64(),
            cfg.retention.default_days,
        ))
    }

    fn object_key(&self, id: &str) -> StoragePath {
        StoragePath::from(format!("{}/{}.png", self.key_prefix, id))
    }

    /// Validate size and declared content type before any write happens.
    /// An absent content type passes; the payload is treated as PNG.
    pub fn validate(&self, size: u64, content_type: Option<&str>) -> Result<()> {
        if size > self.max_file_size {
            return Err(StorageError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        if let Some(declared) = content_type {
            let essence = declared.split(';').next().unwrap_or(declared).trim();
            if !ALLOWED_MIME_TYPES
                .iter()
                .any(|allowed| essence.eq_ignore_ascii_case(allowed))
            {
                return Err(StorageError::InvalidFormat(declared.to_string()));
            }
        }

        Ok(())
    }

    /// Generate a unique identifier for a screenshot. Collisions are not
    /// handled; v4 UUIDs make them practically impossible.
    pub fn generate_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    /// Persist a screenshot and return its share URL, id, and expiry.
    ///
    /// Validation failures abort with no side effects. The binary and its
    /// metadata ride a single put, so there is nothing to roll back on a
    /// backend failure.
    pub async fn save(
        &self,
        data: Bytes,
        content_type: Option<&str>,
        metadata: UploadMetadata,
    ) -> Result<SavedScreenshot> {
        self.validate(data.len() as u64, content_type)?;

        let id = self.generate_id();
        let retention_days = metadata
            .retention
            .unwrap_or(self.default_retention_days);
        let uploaded_at = Utc::now();
        let expires_at = uploaded_at + Duration::days(i64::from(retention_days));
        let content_type = content_type.unwrap_or("image/png").to_string();
        let size = data.len();

        let blob = serde_json::to_string(&ObjectMetadata {
            uploaded_at,
            expires_at,
            content_type: content_type.clone(),
            upload: metadata,
        })?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.into());
        attributes.insert(Attribute::Metadata(METADATA_ATTRIBUTE.into()), blob.into());

        let path = self.object_key(&id.to_string());
        self.store
            .put_opts(
                &path,
                data.into(),
                PutOptions {
                    attributes,
                    ..Default::default()
                },
            )
            .await
            .map_err(StorageError::PutFailed)?;

        // Best-effort verification that the object landed
        match self.store.head(&path).await {
            Ok(meta) => tracing::debug!(%id, stored_size = meta.size, "Verified stored object"),
            Err(error) => tracing::warn!(%id, %error, "Post-put verification failed"),
        }

        let url = format!("{}/{}", self.public_url, id);
        tracing::info!(%id, size, retention_days, %expires_at, "Screenshot stored");

        Ok(SavedScreenshot {
            id,
            url,
            expires_at,
        })
    }

    /// Fetch a screenshot by id.
    ///
    /// Both not-found and backend/read failures collapse to `None`;
    /// callers cannot distinguish them from this call alone. Backend
    /// failures are logged at warn for operators.
    pub async fn get(&self, id: &str) -> Option<StoredScreenshot> {
        let path = self.object_key(id);

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return None,
            Err(error) => {
                tracing::warn!(id, %error, "Screenshot retrieval failed");
                return None;
            }
        };

        let attributes = result.attributes.clone();
        let data = match result.bytes().await {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(id, %error, "Screenshot body read failed");
                return None;
            }
        };

        let content_type = attributes
            .get(&Attribute::ContentType)
            .map(|value| value.as_ref().to_string())
            .unwrap_or_else(|| "image/png".to_string());

        let blob = attributes
            .get(&Attribute::Metadata(METADATA_ATTRIBUTE.into()))
            .and_then(|value| serde_json::from_str::<ObjectMetadata>(value.as_ref()).ok());

        let (uploaded_at, expires_at, metadata) = match blob {
            Some(blob) => (Some(blob.uploaded_at), Some(blob.expires_at), blob.upload),
            None => (None, None, UploadMetadata::default()),
        };

        Some(StoredScreenshot {
            data,
            content_type,
            uploaded_at,
            expires_at,
            metadata,
        })
    }

    /// Best-effort delete; returns false on any error.
    pub async fn delete(&self, id: &str) -> bool {
        match self.store.delete(&self.object_key(id)).await {
            Ok(()) => {
                tracing::info!(id, "Screenshot deleted");
                true
            }
            Err(error) => {
                tracing::warn!(id, %error, "Screenshot deletion failed");
                false
            }
        }
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}
