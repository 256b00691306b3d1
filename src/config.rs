//! Configuration for resume analysis.
//!
//! All behaviour is controlled through [`AnalyzerConfig`], built via
//! [`AnalyzerConfigBuilder`]. The only required input is a credential for
//! the remote model; everything else has a default.
//!
//! # Credential resolution
//!
//! 1. [`AnalyzerConfig::api_key`] if set
//! 2. `GEMINI_API_KEY`
//! 3. `API_KEY`
//!
//! An empty value or the literal `PLACEHOLDER_API_KEY` counts as missing and
//! fails the run before any network action.

use crate::backend::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::backend::AnalysisBackend;
use crate::error::AuditError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Value shipped in template `.env` files; never a real key.
pub const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_API_KEY";

/// Environment variables consulted for the Gemini key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Configuration for an analysis run.
///
/// # Example
/// ```rust
/// use resume_audit::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .api_key("my-key")
///     .model("gemini-2.5-flash")
///     .temperature(0.1)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Gemini API key. If None, read from the environment.
    pub api_key: Option<String>,

    /// Model identifier. Default: `gemini-3-flash-preview`.
    pub model: String,

    /// REST root for the native backend. Default: the public v1beta API.
    pub base_url: String,

    /// Sampling temperature. Range 0.0–2.0. Default: 0.2.
    ///
    /// Scoring should be repeatable across runs on the same resume, so keep
    /// this low.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// A full report with a dozen improvements and spelling fixes is
    /// typically 1–3k tokens; truncation yields malformed JSON.
    pub max_output_tokens: u32,

    /// Timeout for the single remote call, in seconds. Default: 120.
    pub request_timeout_secs: u64,

    /// Use a named `edgequake_llm` provider (e.g. "openai") instead of the
    /// native Gemini client.
    pub provider_name: Option<String>,

    /// Pre-constructed `edgequake_llm` provider. Takes precedence over
    /// `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed backend. Takes precedence over everything else.
    pub backend: Option<Arc<dyn AnalysisBackend>>,

    /// Optional lifecycle callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.2,
            max_output_tokens: 8192,
            request_timeout_secs: 120,
            provider_name: None,
            provider: None,
            backend: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .finish()
    }
}

impl AnalyzerConfig {
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the Gemini API key from the config, then the environment.
    pub fn resolve_api_key(&self) -> Result<String, AuditError> {
        let from_env = || {
            API_KEY_ENV_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        };
        let key = self.api_key.clone().or_else(from_env);
        check_api_key(key.as_deref()).map(str::to_string)
    }
}

/// Reject absent, blank and placeholder credentials.
pub fn check_api_key(key: Option<&str>) -> Result<&str, AuditError> {
    match key.map(str::trim) {
        None | Some("") => Err(AuditError::ConfigMissing {
            reason: "not set".into(),
        }),
        Some(PLACEHOLDER_API_KEY) => Err(AuditError::ConfigMissing {
            reason: "currently using placeholder".into(),
        }),
        Some(k) => Ok(k),
    }
}

/// Builder for [`AnalyzerConfig`].
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl fmt::Debug for AnalyzerConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl AnalyzerConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn AnalysisBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// The credential is not checked here; it is resolved per run so a
    /// config can be built before the environment is populated.
    pub fn build(self) -> Result<AnalyzerConfig, AuditError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AuditError::InvalidConfig("model must not be empty".into()));
        }
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(AuditError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        if c.max_output_tokens == 0 {
            return Err(AuditError::InvalidConfig(
                "max output tokens must be ≥ 1".into(),
            ));
        }
        if c.request_timeout_secs == 0 {
            return Err(AuditError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = AnalyzerConfig::default();
        assert_eq!(c.model, "gemini-3-flash-preview");
        assert_eq!(c.temperature, 0.2);
        assert_eq!(c.max_output_tokens, 8192);
        assert!(c.api_key.is_none());
    }

    #[test]
    fn temperature_is_clamped() {
        let c = AnalyzerConfig::builder().temperature(7.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn build_rejects_bad_values() {
        assert!(AnalyzerConfig::builder().model(" ").build().is_err());
        assert!(AnalyzerConfig::builder().base_url("ftp://x").build().is_err());
        assert!(AnalyzerConfig::builder().max_output_tokens(0).build().is_err());
        assert!(AnalyzerConfig::builder().request_timeout_secs(0).build().is_err());
    }

    #[test]
    fn placeholder_and_blank_keys_are_missing() {
        assert!(check_api_key(None).is_err());
        assert!(check_api_key(Some("   ")).is_err());
        let err = check_api_key(Some(PLACEHOLDER_API_KEY)).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
        assert_eq!(check_api_key(Some(" real-key ")).unwrap(), "real-key");
    }

    #[test]
    fn explicit_key_wins() {
        let c = AnalyzerConfig::builder().api_key("explicit").build().unwrap();
        assert_eq!(c.resolve_api_key().unwrap(), "explicit");
    }

    /// Every env-dependent case lives in one test so parallel tests never
    /// observe a half-set environment.
    #[test]
    fn key_from_environment_in_order() {
        let saved: Vec<_> = API_KEY_ENV_VARS
            .iter()
            .map(|var| (*var, std::env::var(var).ok()))
            .collect();
        let config = AnalyzerConfig::default();

        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("API_KEY");
        assert!(matches!(
            config.resolve_api_key(),
            Err(AuditError::ConfigMissing { .. })
        ));

        std::env::set_var("API_KEY", "from-api-key");
        assert_eq!(config.resolve_api_key().unwrap(), "from-api-key");

        std::env::set_var("GEMINI_API_KEY", "from-gemini");
        assert_eq!(config.resolve_api_key().unwrap(), "from-gemini");

        // Blank counts as unset and falls through to the next variable.
        std::env::set_var("GEMINI_API_KEY", "  ");
        assert_eq!(config.resolve_api_key().unwrap(), "from-api-key");

        std::env::set_var("GEMINI_API_KEY", PLACEHOLDER_API_KEY);
        let err = config.resolve_api_key().unwrap_err();
        assert!(err.to_string().contains("placeholder"));
        assert!(err.is_local());

        let explicit = AnalyzerConfig::builder().api_key("explicit").build().unwrap();
        assert_eq!(explicit.resolve_api_key().unwrap(), "explicit");

        for (var, value) in saved {
            match value {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }
    }

    #[test]
    fn debug_redacts_key() {
        let c = AnalyzerConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
