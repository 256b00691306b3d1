//! The remote analysis capability.
//!
//! A backend takes one document plus an instruction and a declared output
//! schema, and returns whatever text the model produced. It does not decode
//! or validate that text; [`crate::analyze`] does.
//!
//! Two implementations ship with the crate:
//!
//! * [`gemini::GeminiBackend`]: native `generateContent` REST call with a
//!   `responseSchema`, and structured error codes.
//! * [`provider::ProviderBackend`]: any `edgequake_llm` provider; the schema
//!   travels inside the prompt.
//!
//! Tests and embedders can plug their own in through
//! [`crate::config::AnalyzerConfigBuilder::backend`].

pub mod gemini;
pub mod provider;

use crate::error::RemoteFailure;
use crate::model::DocumentKind;
use futures::future::BoxFuture;
use serde_json::Value;

/// Everything a backend needs for one call.
#[derive(Clone)]
pub struct AnalysisRequest {
    pub kind: DocumentKind,
    /// Base64 payload, without the `data:` prefix.
    pub document_base64: String,
    pub instruction: String,
    pub output_schema: Value,
}

impl std::fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("kind", &self.kind)
            .field("document_base64", &format_args!("<{} bytes>", self.document_base64.len()))
            .field("instruction", &self.instruction)
            .finish()
    }
}

/// What came back from the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendResponse {
    /// Model output; `None` when the service returned no text at all.
    pub text: Option<String>,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl BackendResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// One-shot, non-streaming call to a remote model.
pub trait AnalysisBackend: Send + Sync {
    /// Short name for logs, e.g. `gemini` or `openai`.
    fn name(&self) -> &str;

    /// Model identifier, if the backend knows it.
    fn model(&self) -> Option<&str> {
        None
    }

    fn generate<'a>(
        &'a self,
        request: &'a AnalysisRequest,
    ) -> BoxFuture<'a, Result<BackendResponse, RemoteFailure>>;
}
