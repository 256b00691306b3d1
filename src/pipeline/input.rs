//! File selection: turn a path on disk into an [`UploadedDocument`].
//!
//! The MIME type is what a browser would report for the file: derived from
//! the extension. Files without a recognised extension are sniffed by magic
//! bytes so `resume` (no extension) still resolves to a PDF. The size limit
//! is checked from metadata before reading so an oversized file is never
//! pulled into memory.

use crate::error::AuditError;
use crate::model::{DocumentKind, UploadedDocument, MAX_DOCUMENT_BYTES};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reported when neither extension nor content identify the file.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Number of leading bytes inspected when sniffing.
const SNIFF_LEN: usize = 16;

/// Read a resume file from disk.
///
/// Fails with [`AuditError::FileTooLarge`] without reading the content when
/// the file exceeds the upload limit. Unsupported types are returned as-is
/// (with their reported MIME type) so the validator can reject them with the
/// standard message.
pub async fn read_document(path: impl AsRef<Path>) -> Result<UploadedDocument, AuditError> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;

    if !metadata.is_file() {
        return Err(AuditError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > MAX_DOCUMENT_BYTES {
        return Err(AuditError::FileTooLarge {
            size_bytes: metadata.len(),
            limit_bytes: MAX_DOCUMENT_BYTES,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    let mime_type = resolve_mime(path, &bytes);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(
        "Read {} ({} bytes, {})",
        file_name,
        bytes.len(),
        mime_type
    );
    Ok(UploadedDocument::new(file_name, mime_type, bytes))
}

/// MIME type for a file: extension first, then content sniffing.
pub fn resolve_mime(path: &Path, bytes: &[u8]) -> String {
    if let Some(mime) = mime_from_extension(path) {
        return mime.to_string();
    }
    sniff_kind(bytes)
        .map(|k| k.mime_type().to_string())
        .unwrap_or_else(|| UNKNOWN_MIME.to_string())
}

/// MIME type implied by the file extension, if it is one we know about.
///
/// Known-but-unsupported image types map to their real MIME type so the
/// validator rejects them explicitly.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(mime)
}

/// Identify a supported document from its leading bytes.
pub fn sniff_kind(bytes: &[u8]) -> Option<DocumentKind> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    if head.starts_with(b"%PDF") {
        return Some(DocumentKind::Pdf);
    }
    match image::guess_format(head).ok()? {
        image::ImageFormat::Png => Some(DocumentKind::Png),
        image::ImageFormat::Jpeg => Some(DocumentKind::Jpeg),
        image::ImageFormat::WebP => Some(DocumentKind::Webp),
        _ => None,
    }
}

fn io_error(path: &Path, e: std::io::Error) -> AuditError {
    let path: PathBuf = path.to_path_buf();
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => AuditError::PermissionDenied { path },
        std::io::ErrorKind::NotFound => AuditError::FileNotFound { path },
        _ => AuditError::EncodeFailed {
            detail: format!("reading {}: {e}", path.display()),
        },
    }
}
