//! # resume-audit
//!
//! Audit a resume against a target job with a multimodal LLM.
//!
//! A PDF or image resume plus a job title, company and description go in;
//! a typed [`AnalysisResult`] comes out: overall score, strengths,
//! weaknesses, keyword gaps, spelling corrections and an improvement plan
//! ranked by impact. All analysis happens in the remote model; this crate
//! validates input, encodes the document, makes exactly one request with a
//! declared JSON schema, and refuses to trust the answer until it decodes
//! strictly.
//!
//! ## Flow
//!
//! ```text
//! resume file
//!  │
//!  ├─ 1. Input     read bytes, resolve MIME type
//!  ├─ 2. Validate  ≤ 100 MiB, PDF/PNG/JPEG/WebP, form complete
//!  ├─ 3. Encode    data:<mime>;base64,<payload>
//!  ├─ 4. Analyze   one call to Gemini (or any edgequake-llm provider)
//!  ├─ 5. Decode    strict schema check, fail closed
//!  └─ 6. Report    terminal dashboard / Markdown / JSON
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_audit::{analyze_file, AnalyzerConfig, JobDetails};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Key read from GEMINI_API_KEY
//!     let config = AnalyzerConfig::default();
//!     let job = JobDetails::new(
//!         "Backend Engineer",
//!         "",
//!         "Go and distributed systems experience required",
//!     );
//!     let result = analyze_file("resume.pdf", &job, &config).await?;
//!     println!("score: {}", result.overall_score);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume-audit` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod report;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_data_uri, analyze_document, analyze_file, analyze_sync, write_report};
pub use backend::{AnalysisBackend, AnalysisRequest, BackendResponse};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::{AuditError, ErrorCategory, RemoteFailure};
pub use model::{
    AnalysisResult, DocumentKind, Impact, Improvement, JobAlignment, JobDetails, Percentage,
    SpellingError, UploadedDocument, MAX_DOCUMENT_BYTES,
};
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{render_markdown, render_text, TextStyle};
pub use session::{load_file, run_submission, Session, Submission};
