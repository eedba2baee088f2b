//! Cross-context message envelope
//!
//! The page overlay and the capture pipeline run in different contexts;
//! everything crossing that boundary is a tagged envelope validated
//! here, so the orchestrator only ever sees well-typed events.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::geometry::SelectionArea;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed message envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("capture request has an empty selection")]
    EmptySelection,
}

/// Messages exchanged between the selection UI and the capture pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Envelope {
    CaptureRequest {
        area: SelectionArea,
    },
    CaptureResult {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Envelope {
    pub fn request(area: SelectionArea) -> Self {
        Envelope::CaptureRequest { area }
    }

    pub fn success(url: String) -> Self {
        Envelope::CaptureResult {
            success: true,
            url: Some(url),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Envelope::CaptureResult {
            success: false,
            url: None,
            error: Some(error.into()),
        }
    }
}

/// Validate and decode an envelope arriving from the page context.
pub fn decode(value: Value) -> Result<Envelope, MessageError> {
    let envelope: Envelope = serde_json::from_value(value)?;

    if let Envelope::CaptureRequest { area } = &envelope {
        if area.is_empty() {
            return Err(MessageError::EmptySelection);
        }
    }

    Ok(envelope)
}

/// Encode an envelope for the page context.
pub fn encode(envelope: &Envelope) -> Value {
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}
