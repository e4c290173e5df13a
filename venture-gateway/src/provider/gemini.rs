//! Google Gemini provider with Google Search grounding.
//!
//! Calls `POST {base_url}/models/{model}:generateContent` with the key in the
//! `x-goog-api-key` header. Grounding chunks from the first candidate are
//! surfaced as [`Citation`]s.

use super::{
    Citation, GenerateRequest, GenerateResponse, Provider, ProviderError, ProviderErrorKind,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use venture_common::config::LlmConfig;

const PROVIDER_NAME: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider.
pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

// ══════════════════════════════════════════════════════════════════════════════
// API REQUEST/RESPONSE TYPES
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSpec>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<i64>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<i64>,
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<i64>,
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public endpoint.
    ///
    /// A missing or blank key is accepted here; [`Provider::has_credentials`]
    /// reports it so callers can fail before sending anything.
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_options(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(120),
            Duration::from_secs(10),
        )
    }

    /// Create a provider from the `llm` config section.
    pub fn from_config(config: &LlmConfig, api_key: Option<&str>) -> Self {
        Self::with_options(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    /// Create a provider with an explicit base URL and timeouts.
    pub fn with_options(
        api_key: Option<&str>,
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from);

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(connect_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        let model_name = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!("{}/{model_name}:generateContent", self.base_url)
    }

    fn build_body(request: &GenerateRequest) -> GenerateContentRequest {
        let tools = if request.web_search {
            vec![ToolSpec {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            tools,
            generation_config: request
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        }
    }
}

/// Concatenate the text parts of a candidate and collect its web citations.
fn extract_candidate(candidate: Candidate) -> (String, Vec<Citation>, Option<String>) {
    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| Citation {
                    uri: web.uri,
                    title: web.title,
                })
                .collect()
        })
        .unwrap_or_default();

    (text, citations, candidate.finish_reason)
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn supports_model(&self, model: &str) -> bool {
        model.trim_start_matches("models/").starts_with("gemini-")
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let start = Instant::now();
        let model = request.model.clone();

        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ProviderError::new(
                PROVIDER_NAME,
                &model,
                ProviderErrorKind::Auth,
                "Gemini API key not found. Set API_KEY or GEMINI_API_KEY.",
            )
        })?;

        let body = Self::build_body(&request);
        let url = self.endpoint(&model);

        tracing::debug!(
            model = %model,
            web_search = request.web_search,
            prompt_chars = request.prompt.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    ProviderErrorKind::Timeout
                } else {
                    ProviderErrorKind::Network
                };
                ProviderError::new(PROVIDER_NAME, &model, kind, format!("Request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                PROVIDER_NAME,
                &model,
                ProviderErrorKind::from_status(status.as_u16()),
                format!("API error ({}): {}", status.as_u16(), error_text),
            )
            .with_status(status.as_u16()));
        }

        let result: GenerateContentResponse = response.json().await.map_err(|e| {
            let kind = if e.is_timeout() {
                ProviderErrorKind::Timeout
            } else {
                ProviderErrorKind::InvalidEnvelope
            };
            ProviderError::new(
                PROVIDER_NAME,
                &model,
                kind,
                format!("Failed to parse response: {e}"),
            )
        })?;

        if let Some(err) = result.error {
            return Err(ProviderError::new(
                PROVIDER_NAME,
                &model,
                ProviderErrorKind::Api,
                format!("API error: {}", err.message),
            ));
        }

        let (text, citations, finish_reason) = result
            .candidates
            .and_then(|c| c.into_iter().next())
            .map(extract_candidate)
            .unwrap_or_default();

        let usage = result.usage_metadata.map_or(TokenUsage::default(), |u| TokenUsage {
            input_tokens: u.prompt_token_count.unwrap_or(0),
            output_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count.unwrap_or(0),
        });

        Ok(GenerateResponse {
            provider: PROVIDER_NAME.into(),
            model,
            text,
            citations,
            usage,
            finish_reason,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_without_key_has_no_credentials() {
        assert!(!GeminiProvider::new(None).has_credentials());
        assert!(!GeminiProvider::new(Some("  ")).has_credentials());
    }

    #[test]
    fn provider_with_key_has_credentials() {
        let provider = GeminiProvider::new(Some("test-api-key"));
        assert!(provider.has_credentials());
        assert_eq!(provider.api_key.as_deref(), Some("test-api-key"));
    }

    #[test]
    fn supports_gemini_models() {
        let provider = GeminiProvider::new(Some("key"));
        assert!(provider.supports_model("gemini-2.5-flash"));
        assert!(provider.supports_model("models/gemini-1.5-pro"));
        assert!(!provider.supports_model("gpt-4"));
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn endpoint_adds_models_prefix_once() {
        let provider = GeminiProvider::with_options(
            Some("k"),
            "http://localhost:9/v1beta/",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert_eq!(
            provider.endpoint("gemini-2.5-flash"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            provider.endpoint("models/gemini-2.5-flash"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn body_includes_search_tool_only_when_enabled() {
        let request = GenerateRequest::new("gemini-2.5-flash", "value this").with_web_search(true);
        let body = serde_json::to_value(GeminiProvider::build_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "value this" }] }],
                "tools": [{ "google_search": {} }]
            })
        );

        let request = GenerateRequest::new("gemini-2.5-flash", "x").with_temperature(Some(0.3));
        let body = serde_json::to_value(GeminiProvider::build_body(&request)).unwrap();
        assert!(body.get("tools").is_none());
        assert_eq!(body["generationConfig"]["temperature"], json!(0.3));
    }

    #[test]
    fn candidate_text_parts_are_concatenated() {
        let candidate: Candidate = serde_json::from_value(json!({
            "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] },
            "finishReason": "STOP",
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    { "retrievedContext": {} },
                    { "web": { "uri": "https://b.example" } }
                ]
            }
        }))
        .unwrap();

        let (text, citations, finish) = extract_candidate(candidate);
        assert_eq!(text, "{\"a\": 1}");
        assert_eq!(finish.as_deref(), Some("STOP"));
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].title.as_deref(), Some("A"));
        assert!(citations[1].title.is_none());
    }

    #[test]
    fn candidate_without_content_yields_empty_text() {
        let candidate: Candidate =
            serde_json::from_value(json!({ "finishReason": "SAFETY" })).unwrap();
        let (text, citations, _) = extract_candidate(candidate);
        assert!(text.is_empty());
        assert!(citations.is_empty());
    }
}
