//! Progress-callback trait for analysis lifecycle events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::config::AnalyzerConfigBuilder::progress_callback`] to follow a
//! run: document ready, request sent, response decoded or failed. The CLI
//! drives its spinner from these events; an embedding UI can use them to
//! flip its busy indicator.
//!
//! # Example
//!
//! ```rust
//! use resume_audit::{AnalysisProgressCallback, AnalyzerConfig};
//! use std::sync::Arc;
//!
//! struct Log;
//!
//! impl AnalysisProgressCallback for Log {
//!     fn on_request_start(&self, backend: &str, model: Option<&str>) {
//!         eprintln!("calling {backend} ({})", model.unwrap_or("default"));
//!     }
//! }
//!
//! let config = AnalyzerConfig::builder()
//!     .progress_callback(Arc::new(Log))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the analysis client as a run progresses.
///
/// All methods default to no-ops so callers override only what they need.
pub trait AnalysisProgressCallback: Send + Sync {
    /// The document has been validated and encoded.
    ///
    /// # Arguments
    /// * `file_name`  — name as selected, or `"document"` for raw payloads
    /// * `size_bytes` — size of the original (decoded) document
    fn on_document_ready(&self, file_name: &str, size_bytes: u64) {
        let _ = (file_name, size_bytes);
    }

    /// Just before the single remote request is sent.
    fn on_request_start(&self, backend: &str, model: Option<&str>) {
        let _ = (backend, model);
    }

    /// The response was decoded into an analysis result.
    fn on_request_complete(&self, duration_ms: u64, overall_score: u8) {
        let _ = (duration_ms, overall_score);
    }

    /// The run failed; `message` is the user-facing text.
    ///
    /// Fires exactly once for any failure of a public `analyze*` entry
    /// point, including validation and configuration errors raised before
    /// a request was started.
    fn on_request_error(&self, message: &str) {
        let _ = message;
    }
}

/// A no-op implementation, the default when nothing is configured.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalyzerConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;
