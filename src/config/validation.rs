use super::models::{Config, StorageProvider};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("retention range is invalid: min {min} .. max {max} (min must be >= 1)")]
    InvalidRetentionRange { min: u32, max: u32 },

    #[error("default retention {default} is outside the accepted range {min}..={max}")]
    DefaultRetentionOutOfRange { default: u32, min: u32, max: u32 },

    #[error("{field} must be an http(s) URL, got: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("max_upload_bytes must be greater than zero")]
    ZeroUploadLimit,

    #[error("storage bucket name must not be empty")]
    EmptyBucket,
}

pub fn validate(config: &Config) -> Result<(), ValidationError> {
    let retention = &config.retention;
    if retention.min_days == 0 || retention.min_days > retention.max_days {
        return Err(ValidationError::InvalidRetentionRange {
            min: retention.min_days,
            max: retention.max_days,
        });
    }
    if retention.default_days < retention.min_days || retention.default_days > retention.max_days {
        return Err(ValidationError::DefaultRetentionOutOfRange {
            default: retention.default_days,
            min: retention.min_days,
            max: retention.max_days,
        });
    }

    validate_url("server.public_url", &config.server.public_url)?;
    validate_url("client.base_url", &config.client.base_url)?;

    if config.server.max_upload_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroUploadLimit);
    }

    if config.storage.provider == StorageProvider::S3 && config.storage.bucket.trim().is_empty() {
        return Err(ValidationError::EmptyBucket);
    }

    Ok(())
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}
