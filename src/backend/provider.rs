//! Generic backend over any `edgequake_llm` provider.
//!
//! Not every provider supports a declared response schema, so the JSON shape
//! rides along in the instruction text (see [`crate::prompts`]). The document
//! is attached as an image part; Gemini and Anthropic accept PDFs that way,
//! other providers may reject them, which surfaces as a rejected request.

use super::{AnalysisBackend, AnalysisRequest, BackendResponse};
use crate::error::{AuditError, RemoteFailure};
use crate::prompts::SYSTEM_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ProviderBackend {
    provider: Arc<dyn LLMProvider>,
    name: String,
    model: Option<String>,
    temperature: f32,
    max_tokens: usize,
}

impl ProviderBackend {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        name: impl Into<String>,
        model: Option<String>,
        temperature: f32,
        max_tokens: usize,
    ) -> Self {
        Self {
            provider,
            name: name.into(),
            model,
            temperature,
            max_tokens,
        }
    }

    /// Build a provider by name via `ProviderFactory`, which reads the
    /// matching API key variable (`OPENAI_API_KEY`, ...) itself.
    pub fn from_name(
        provider_name: &str,
        model: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<Self, AuditError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            AuditError::ProviderNotConfigured {
                provider: provider_name.to_string(),
                hint: format!("{e}"),
            }
        })?;
        Ok(Self::new(
            provider,
            provider_name,
            Some(model.to_string()),
            temperature,
            max_tokens,
        ))
    }

    fn build_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }

    async fn call(&self, request: &AnalysisRequest) -> Result<BackendResponse, RemoteFailure> {
        let document = ImageData::new(
            request.document_base64.clone(),
            request.kind.mime_type().to_string(),
        );
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user_with_images(request.instruction.as_str(), vec![document]),
        ];
        let options = self.build_options();

        match self.provider.chat(&messages, Some(&options)).await {
            Ok(response) => {
                debug!(
                    "{}: {} input tokens, {} output tokens",
                    self.name, response.prompt_tokens, response.completion_tokens
                );
                let input_tokens = response.prompt_tokens as u64;
                let output_tokens = response.completion_tokens as u64;
                Ok(BackendResponse {
                    text: Some(response.content).filter(|t| !t.trim().is_empty()),
                    input_tokens,
                    output_tokens,
                })
            }
            Err(e) => {
                let message = format!("{e}");
                warn!("{}: request failed: {}", self.name, message);
                Err(RemoteFailure::from_message(message))
            }
        }
    }
}

impl AnalysisBackend for ProviderBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn generate<'a>(
        &'a self,
        request: &'a AnalysisRequest,
    ) -> BoxFuture<'a, Result<BackendResponse, RemoteFailure>> {
        self.call(request).boxed()
    }
}
