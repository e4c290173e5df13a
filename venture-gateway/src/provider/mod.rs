//! Provider abstraction for the remote generative model.
//!
//! A provider performs exactly one round-trip per [`Provider::generate`] call:
//! no retries, no streaming. Callers that need a different backend (or a test
//! double) implement the same trait.

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Provider Trait
// ============================================================================

/// Unified interface for text-generation backends.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Whether a credential is available. Checked before any request is sent.
    fn has_credentials(&self) -> bool;

    /// Check if this provider supports a given model.
    fn supports_model(&self, model: &str) -> bool;

    /// Send one generation request.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Transport-level failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Connection could not be established or was interrupted
    Network,
    /// The request exceeded the client timeout
    Timeout,
    /// Credential rejected (401/403) or missing
    Auth,
    /// Rate limit or quota exhausted (429)
    Quota,
    /// Any other non-success answer from the endpoint
    Api,
    /// The HTTP body was not the expected response envelope
    InvalidEnvelope,
}

impl ProviderErrorKind {
    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::Quota,
            408 | 504 => Self::Timeout,
            _ => Self::Api,
        }
    }
}

/// Error from a provider.
#[derive(Debug, Clone)]
pub struct ProviderError {
    pub provider: String,
    pub model: String,
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
}

impl ProviderError {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    /// Attach the HTTP status that produced this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.provider, self.model, self.message)
    }
}

impl std::error::Error for ProviderError {}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A single-prompt generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model to use
    pub model: String,
    /// Prompt text, sent as one user turn
    pub prompt: String,
    /// Enable the search-augmentation tool
    #[serde(default)]
    pub web_search: bool,
    /// Temperature (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            web_search: false,
            temperature: None,
        }
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A web citation attached to a reply. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// Provider reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Provider name
    pub provider: String,
    /// Model used
    pub model: String,
    /// Concatenated reply text; empty when the endpoint produced none
    pub text: String,
    /// Citations in the order the endpoint returned them
    pub citations: Vec<Citation>,
    /// Token usage
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
    /// Response latency in milliseconds
    pub latency_ms: u64,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
}
