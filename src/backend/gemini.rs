//! Native Gemini backend over the `generateContent` REST endpoint.
//!
//! Talking to the REST API directly (instead of through a generic chat
//! abstraction) is what lets us declare `responseSchema` and read the
//! structured `error.status` on failure, so rejected documents are
//! recognised by code rather than by wording.

use super::{AnalysisBackend, AnalysisRequest, BackendResponse};
use crate::error::{AuditError, RemoteFailure};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Default model, a fast multimodal Gemini.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Public Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for [`GeminiBackend`].
#[derive(Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

pub struct GeminiBackend {
    client: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiBackend {
    pub fn new(settings: GeminiSettings) -> Result<Self, AuditError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AuditError::Internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    async fn call(&self, request: &AnalysisRequest) -> Result<BackendResponse, RemoteFailure> {
        let body = build_body(request, &self.settings);
        let url = self.endpoint();
        debug!("POST {} ({} bytes of document)", url, request.document_base64.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_failure)?;

        if !status.is_success() {
            let failure = parse_error_body(status.as_u16(), &text);
            warn!("Gemini returned {}: {}", status, failure.message);
            return Err(failure);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            RemoteFailure::from_message(format!("Unreadable Gemini response envelope: {e}"))
        })?;
        Ok(parsed.into_backend_response())
    }
}

impl AnalysisBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.settings.model)
    }

    fn generate<'a>(
        &'a self,
        request: &'a AnalysisRequest,
    ) -> BoxFuture<'a, Result<BackendResponse, RemoteFailure>> {
        self.call(request).boxed()
    }
}

fn transport_failure(e: reqwest::Error) -> RemoteFailure {
    RemoteFailure {
        message: e.to_string(),
        http_status: e.status().map(|s| s.as_u16()),
        code: e.is_timeout().then(|| "TIMEOUT".to_string()),
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
    temperature: f32,
    max_output_tokens: u32,
}

fn build_body<'a>(
    request: &'a AnalysisRequest,
    settings: &GeminiSettings,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: request.kind.mime_type(),
                        data: &request.document_base64,
                    },
                },
                Part::Text {
                    text: &request.instruction,
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.output_schema,
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        },
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_backend_response(self) -> BackendResponse {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());
        let usage = self.usage_metadata.unwrap_or_default();
        BackendResponse {
            text,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Decode a non-2xx body; falls back to the raw text.
fn parse_error_body(http_status: u16, body: &str) -> RemoteFailure {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => RemoteFailure {
            message: envelope.error.message,
            http_status: Some(http_status),
            code: envelope.error.status,
        },
        Err(_) => RemoteFailure {
            message: if body.trim().is_empty() {
                format!("HTTP {http_status}")
            } else {
                body.trim().to_string()
            },
            http_status: Some(http_status),
            code: None,
        },
    }
}
