//! Analysis entry points.
//!
//! [`analyze`] is the core operation: one base64 document, one set of job
//! details, one remote call, one typed result. The other functions are
//! conveniences layered on top of it for callers that start from a data
//! URI, an in-memory document, or a path on disk.
//!
//! ```text
//! path ──▶ read ──▶ validate ──▶ encode ──▶ analyze ──▶ AnalysisResult
//!         (input)   (validate)   (encode)    │
//!                                            ├─ resolve backend (credential check)
//!                                            ├─ build instruction + schema
//!                                            ├─ single remote call
//!                                            ├─ clean text (postprocess)
//!                                            └─ strict decode
//! ```
//!
//! There are no retries. A failed call is reported and the caller decides
//! whether to try again.

use crate::backend::gemini::{GeminiBackend, GeminiSettings};
use crate::backend::provider::ProviderBackend;
use crate::backend::{AnalysisBackend, AnalysisRequest};
use crate::config::AnalyzerConfig;
use crate::error::AuditError;
use crate::model::{AnalysisResult, DocumentKind, JobDetails, UploadedDocument};
use crate::pipeline::{encode, input, postprocess, validate};
use crate::prompts::{build_instruction, response_schema};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyze a base64-encoded resume against the given job details.
///
/// # Arguments
/// * `document_base64`: the document payload, without a `data:` prefix
/// * `mime_type`: one of `application/pdf`, `image/png`, `image/jpeg`, `image/webp`
/// * `job`: target role; `title` and `description` are required
///
/// # Errors
/// * [`AuditError::ConfigMissing`] when no credential is available, before
///   any network action
/// * validation errors for an unsupported MIME type or incomplete input
/// * [`AuditError::EmptyResponse`] / [`AuditError::MalformedResponse`] when the
///   model's answer is unusable
/// * [`AuditError::RejectedRequest`] when the service refused the document,
///   [`AuditError::RemoteFailure`] for anything else
pub async fn analyze(
    document_base64: &str,
    mime_type: &str,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    notify_failure(config, run_analysis(document_base64, mime_type, job, config).await)
}

async fn run_analysis(
    document_base64: &str,
    mime_type: &str,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    let backend = resolve_backend(config)?;

    let kind = DocumentKind::from_mime(mime_type).ok_or_else(|| AuditError::UnsupportedFileType {
        mime_type: mime_type.to_string(),
    })?;
    validate::validate_submission(job, Some(document_base64))?;

    let request = AnalysisRequest {
        kind,
        document_base64: document_base64.to_string(),
        instruction: build_instruction(kind, job),
        output_schema: response_schema(),
    };

    info!(
        "Analyzing {} resume for '{}' via {}",
        kind.label(),
        job.title,
        backend.name()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_request_start(backend.name(), backend.model());
    }

    let start = Instant::now();
    let response = backend.generate(&request).await.map_err(|failure| {
        warn!("Analysis request failed: {}", failure);
        failure.into_error()
    })?;
    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(
        "{} input tokens, {} output tokens, {}ms",
        response.input_tokens, response.output_tokens, duration_ms
    );

    let text = response
        .text
        .as_deref()
        .and_then(postprocess::clean_response_text)
        .ok_or(AuditError::EmptyResponse)?;
    let result = AnalysisResult::from_json_str(&text)?;

    info!(
        "Analysis complete: score {}, match {} in {}ms",
        result.overall_score, result.job_alignment.match_percentage, duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_request_complete(duration_ms, result.overall_score.value());
    }
    Ok(result)
}

/// Analyze a `data:<mime>;base64,<payload>` URI, as held in a session preview.
pub async fn analyze_data_uri(
    data_uri: &str,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    notify_failure(config, run_data_uri(data_uri, job, config).await)
}

/// Validate, encode and analyze an in-memory document.
pub async fn analyze_document(
    doc: &UploadedDocument,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    notify_failure(config, run_document(doc, job, config).await)
}

/// Read a resume from disk and analyze it.
///
/// An oversized file is rejected from its metadata alone; nothing is read
/// and no request is made.
pub async fn analyze_file(
    path: impl AsRef<Path>,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    let outcome = match input::read_document(path).await {
        Ok(doc) => run_document(&doc, job, config).await,
        Err(e) => Err(e),
    };
    notify_failure(config, outcome)
}

/// Synchronous wrapper around [`analyze_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    path: impl AsRef<Path>,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AuditError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(analyze_file(path, job, config))
}

/// Write a rendered report atomically (temp file in the same directory,
/// then rename), so a crash never leaves a half-written report behind.
pub fn write_report(path: impl AsRef<Path>, contents: &str) -> Result<(), AuditError> {
    use std::io::Write;

    let path = path.as_ref();
    let write_err = |source: std::io::Error| AuditError::ReportWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn run_data_uri(
    data_uri: &str,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    validate::validate_submission(job, Some(data_uri))?;
    let (mime_type, payload) = encode::parse_data_uri(data_uri)?;
    run_analysis(payload, mime_type, job, config).await
}

async fn run_document(
    doc: &UploadedDocument,
    job: &JobDetails,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, AuditError> {
    validate::validate_document(doc)?;
    let data_uri = encode::encode_document(doc).await?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_ready(&doc.file_name, doc.size_bytes);
    }
    run_data_uri(&data_uri, job, config).await
}

/// Report a failed run to the progress callback. Public entry points call
/// this once at their outermost level, so each failure is reported once.
fn notify_failure<T>(config: &AnalyzerConfig, outcome: Result<T, AuditError>) -> Result<T, AuditError> {
    if let (Err(e), Some(cb)) = (&outcome, &config.progress_callback) {
        cb.on_request_error(&e.user_message());
    }
    outcome
}

/// Pick the backend for this run, from most- to least-specific.
///
/// 1. **Pre-built backend** (`config.backend`): used as-is; tests and
///    embedders with their own transport.
/// 2. **Pre-built provider** (`config.provider`): wrapped in a
///    [`ProviderBackend`].
/// 3. **Named provider** (`config.provider_name`): built through
///    `ProviderFactory`, which reads that provider's own key variable.
/// 4. **Native Gemini**: requires a credential; a missing or placeholder
///    key fails here, before any network action.
fn resolve_backend(config: &AnalyzerConfig) -> Result<Arc<dyn AnalysisBackend>, AuditError> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }

    let max_tokens = config.max_output_tokens as usize;

    if let Some(ref provider) = config.provider {
        return Ok(Arc::new(ProviderBackend::new(
            Arc::clone(provider),
            config.provider_name.as_deref().unwrap_or("custom"),
            Some(config.model.clone()),
            config.temperature,
            max_tokens,
        )));
    }

    if let Some(ref name) = config.provider_name {
        return Ok(Arc::new(ProviderBackend::from_name(
            name,
            &config.model,
            config.temperature,
            max_tokens,
        )?));
    }

    let api_key = config.resolve_api_key()?;
    Ok(Arc::new(GeminiBackend::new(GeminiSettings {
        api_key,
        model: config.model.clone(),
        base_url: config.base_url.clone(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
        timeout_secs: config.request_timeout_secs,
    })?))
}
