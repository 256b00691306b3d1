//! Document encoding: raw bytes → `data:<mime>;base64,<payload>`.
//!
//! The data URI doubles as the session preview and as the transport form:
//! the analysis client splits it back into MIME type and payload with
//! [`parse_data_uri`] right before the request is built.

use crate::error::AuditError;
use crate::model::UploadedDocument;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^data:([^;]+);base64,(.+)$").unwrap());

/// Build a data URI from raw bytes.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    format!("data:{mime_type};base64,{b64}")
}

/// Encode a selected document off the async executor.
///
/// Base64 of a 100 MB file is CPU-bound work, so it runs on the blocking
/// pool. A failed or panicked encode surfaces as [`AuditError::EncodeFailed`]
/// instead of leaving the session without a preview.
pub async fn encode_document(doc: &UploadedDocument) -> Result<String, AuditError> {
    if doc.bytes.is_empty() {
        return Err(AuditError::EncodeFailed {
            detail: format!("'{}' is empty", doc.file_name),
        });
    }

    let mime_type = doc.mime_type.clone();
    let bytes = doc.bytes.clone();
    tokio::task::spawn_blocking(move || encode_data_uri(&mime_type, &bytes))
        .await
        .map_err(|e| AuditError::EncodeFailed {
            detail: e.to_string(),
        })
}

/// Split a data URI into `(mime_type, base64_payload)`.
pub fn parse_data_uri(uri: &str) -> Result<(&str, &str), AuditError> {
    let caps = RE_DATA_URI
        .captures(uri)
        .ok_or(AuditError::InvalidDataUri)?;
    match (caps.get(1), caps.get(2)) {
        (Some(mime), Some(payload)) => Ok((mime.as_str(), payload.as_str())),
        _ => Err(AuditError::InvalidDataUri),
    }
}
