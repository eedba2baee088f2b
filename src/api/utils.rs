//! Pure helpers for the upload protocol
//!
//! The handler runs the same size/MIME checks the store runs, just
//! earlier, to produce fast 400 responses; the store's validation on
//! save remains authoritative.

use super::error::ApiError;
use crate::config::RetentionConfig;
use crate::storage::{ALLOWED_MIME_TYPES, UploadMetadata};

/// Check a declared content type against the allow-list. An absent type
/// passes; the payload is treated as PNG downstream.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), ApiError> {
    if let Some(declared) = content_type {
        let parsed: mime::Mime = declared.parse().map_err(|_| ApiError::InvalidFormat)?;
        let essence = parsed.essence_str();
        if !ALLOWED_MIME_TYPES
            .iter()
            .any(|allowed| essence.eq_ignore_ascii_case(allowed))
        {
            return Err(ApiError::InvalidFormat);
        }
    }
    Ok(())
}

pub fn check_size(size: u64, max: u64) -> Result<(), ApiError> {
    if size > max {
        return Err(ApiError::FileTooLarge(max));
    }
    Ok(())
}

/// Parse the metadata field defensively. Invalid JSON, a schema
/// mismatch, or a retention outside the accepted range all degrade to
/// empty metadata rather than rejecting the upload.
pub fn parse_metadata(raw: Option<&str>, retention: &RetentionConfig) -> UploadMetadata {
    let Some(raw) = raw else {
        return UploadMetadata::default();
    };

    let parsed: UploadMetadata = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::warn!(%error, "Ignoring unparseable upload metadata");
            return UploadMetadata::default();
        }
    };

    if let Some(days) = parsed.retention {
        if days < retention.min_days || days > retention.max_days {
            tracing::warn!(
                days,
                min = retention.min_days,
                max = retention.max_days,
                "Ignoring metadata with out-of-range retention"
            );
            return UploadMetadata::default();
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retention() -> RetentionConfig {
        RetentionConfig::default()
    }

    #[test]
    fn content_type_allow_list() {
        assert!(check_content_type(None).is_ok());
        assert!(check_content_type(Some("image/png")).is_ok());
        assert!(check_content_type(Some("image/png; charset=binary")).is_ok());
        assert!(check_content_type(Some("image/jpeg")).is_err());
        assert!(check_content_type(Some("text/plain")).is_err());
        assert!(check_content_type(Some("not a mime")).is_err());
    }

    #[test]
    fn size_boundary() {
        assert!(check_size(100, 100).is_ok());
        assert!(matches!(
            check_size(101, 100),
            Err(ApiError::FileTooLarge(100))
        ));
    }

    #[test]
    fn absent_metadata_is_empty() {
        assert_eq!(parse_metadata(None, &retention()), UploadMetadata::default());
    }

    #[test]
    fn valid_metadata_is_kept() {
        let parsed = parse_metadata(
            Some(r#"{"timestamp": 1700000000000, "source": "ext", "retention": 14, "tab": "x"}"#),
            &retention(),
        );
        assert_eq!(parsed.timestamp, Some(1_700_000_000_000));
        assert_eq!(parsed.source.as_deref(), Some("ext"));
        assert_eq!(parsed.retention, Some(14));
        assert_eq!(parsed.extra.get("tab"), Some(&serde_json::json!("x")));
    }

    #[test]
    fn invalid_json_degrades_to_empty() {
        let parsed = parse_metadata(Some("{not json"), &retention());
        assert_eq!(parsed, UploadMetadata::default());
    }

    #[test]
    fn out_of_range_retention_degrades_to_empty() {
        let parsed = parse_metadata(Some(r#"{"retention": 0}"#), &retention());
        assert_eq!(parsed, UploadMetadata::default());

        let parsed = parse_metadata(Some(r#"{"retention": 31}"#), &retention());
        assert_eq!(parsed, UploadMetadata::default());
    }

    #[test]
    fn retention_bounds_are_inclusive() {
        let parsed = parse_metadata(Some(r#"{"retention": 1}"#), &retention());
        assert_eq!(parsed.retention, Some(1));

        let parsed = parse_metadata(Some(r#"{"retention": 30}"#), &retention());
        assert_eq!(parsed.retention, Some(30));
    }

    #[test]
    fn wrongly_typed_retention_degrades_to_empty() {
        let parsed = parse_metadata(Some(r#"{"retention": "forever"}"#), &retention());
        assert_eq!(parsed, UploadMetadata::default());
    }
}
