//! Error types for the resume-audit library.
//!
//! Every failure of an analysis run is an [`AuditError`]. The variants are
//! grouped into five [`ErrorCategory`] buckets that decide how a front-end
//! presents them:
//!
//! * **Validation**: bad file or incomplete form. Nothing was sent; the user
//!   fixes the input and tries again.
//! * **Configuration**: no usable API credential. Blocking until fixed.
//! * **Contract violation**: the remote service answered, but with an empty
//!   or unreadable payload.
//! * **Rejected request**: the remote service refused the document itself.
//! * **Unknown**: everything else.
//!
//! Front-ends never show `Display` output verbatim to end users; they show
//! [`AuditError::user_message`], which collapses each failure into the one
//! sentence the dashboard displays.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Message shown when the remote service rejects the uploaded document.
pub const REJECTED_DOCUMENT_MESSAGE: &str =
    "The document could not be processed. Ensure the file is a valid PDF or clear image under 10MB.";

/// Fallback when a failure carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze document.";

/// Shown when submission is attempted before the form is complete.
pub const INCOMPLETE_SUBMISSION_MESSAGE: &str = "Please complete all steps before analyzing.";

/// All errors returned by the resume-audit library.
#[derive(Debug, Error)]
pub enum AuditError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// The selected file is larger than the upload limit.
    #[error("File size exceeds 100MB limit.")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    /// The selected file is not a PDF, PNG, JPEG or WebP.
    #[error("Please upload a PDF or an image file.")]
    UnsupportedFileType { mime_type: String },

    /// Title, description or document missing at submission time.
    #[error("Please complete all steps before analyzing.")]
    IncompleteSubmission { missing: Vec<&'static str> },

    /// Resume file was not found at the given path.
    #[error("Resume file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading or base64-encoding the document failed.
    #[error("Failed to encode document: {detail}")]
    EncodeFailed { detail: String },

    /// The stored preview is not a `data:<mime>;base64,<payload>` URI.
    #[error("Invalid file content format.")]
    InvalidDataUri,

    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key, or the placeholder value, was found.
    #[error("Please set your Gemini API key in GEMINI_API_KEY ({reason})")]
    ConfigMissing { reason: String },

    /// A named provider could not be constructed.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Remote contract violations ────────────────────────────────────────
    /// The remote service answered without any text.
    #[error("Empty response from AI.")]
    EmptyResponse,

    /// The response text is not JSON of the expected shape.
    #[error("Malformed analysis response: {detail}")]
    MalformedResponse { detail: String },

    // ── Remote failures ───────────────────────────────────────────────────
    /// The remote service refused the request because of the document.
    #[error("Request rejected: {0}")]
    RejectedRequest(RemoteFailure),

    /// Any other remote or transport failure.
    #[error("{0}")]
    RemoteFailure(RemoteFailure),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the report file.
    #[error("Failed to write report '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse grouping of [`AuditError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    ContractViolation,
    RejectedRequest,
    Unknown,
}

impl AuditError {
    /// Which bucket this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::FileTooLarge { .. }
            | AuditError::UnsupportedFileType { .. }
            | AuditError::IncompleteSubmission { .. }
            | AuditError::FileNotFound { .. }
            | AuditError::PermissionDenied { .. }
            | AuditError::EncodeFailed { .. }
            | AuditError::InvalidDataUri => ErrorCategory::Validation,
            AuditError::ConfigMissing { .. }
            | AuditError::ProviderNotConfigured { .. }
            | AuditError::InvalidConfig(_) => ErrorCategory::Configuration,
            AuditError::EmptyResponse | AuditError::MalformedResponse { .. } => {
                ErrorCategory::ContractViolation
            }
            AuditError::RejectedRequest(_) => ErrorCategory::RejectedRequest,
            AuditError::RemoteFailure(_)
            | AuditError::ReportWriteFailed { .. }
            | AuditError::Internal(_) => ErrorCategory::Unknown,
        }
    }

    /// `true` when the failure happened before any network action.
    pub fn is_local(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::Configuration
        )
    }

    /// The single sentence a front-end shows for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AuditError::RejectedRequest(_) => REJECTED_DOCUMENT_MESSAGE.to_string(),
            AuditError::MalformedResponse { .. } => {
                format!("{GENERIC_FAILURE_MESSAGE} The response was not in the expected format.")
            }
            AuditError::RemoteFailure(failure) => {
                let message = failure.message.trim();
                if message.is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message.to_string()
                }
            }
            other => other.to_string(),
        }
    }
}

/// A failure reported by the remote analysis capability or its transport.
///
/// Backends fill in whatever structure they have. The native Gemini client
/// knows the HTTP status and the `error.status` code; generic providers only
/// have a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFailure {
    pub message: String,
    pub http_status: Option<u16>,
    /// Provider status string, e.g. `INVALID_ARGUMENT`.
    pub code: Option<String>,
}

impl RemoteFailure {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Decide whether the remote side rejected the document itself.
    ///
    /// Structured fields are consulted first. Providers that only hand back
    /// a message fall through to substring matching on the text, which is a
    /// wording heuristic: a changed upstream phrasing silently disables it.
    pub fn is_rejected_document(&self) -> bool {
        if matches!(self.http_status, Some(400) | Some(413)) {
            return true;
        }
        if let Some(code) = self.code.as_deref() {
            if code.eq_ignore_ascii_case("INVALID_ARGUMENT") {
                return true;
            }
        }
        message_indicates_rejection(&self.message)
    }

    /// Classify into the matching [`AuditError`] variant.
    pub fn into_error(self) -> AuditError {
        if self.is_rejected_document() {
            AuditError::RejectedRequest(self)
        } else {
            AuditError::RemoteFailure(self)
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.http_status, self.code.as_deref()) {
            (Some(status), Some(code)) => write!(f, "[{status} {code}] {}", self.message),
            (Some(status), None) => write!(f, "[{status}] {}", self.message),
            (None, Some(code)) => write!(f, "[{code}] {}", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

/// Substring heuristic for "bad request / too large" failures.
pub fn message_indicates_rejection(message: &str) -> bool {
    message.contains("400")
        || message.contains("INVALID_ARGUMENT")
        || message.to_lowercase().contains("too large")
}
