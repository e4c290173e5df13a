//! The analysis request adapter.
//!
//! One call to [`Analyzer::analyze`] makes exactly one outbound request. No
//! lock is held across the await, so concurrent calls proceed independently
//! and complete in any order. Dropping the returned future abandons the
//! request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, info_span, Instrument};
use venture_common::logging::generate_request_id;
use venture_common::util::{sanitize_for_log, truncate_with_ellipsis};
use venture_common::Config;
use venture_gateway::{GeminiProvider, GenerateRequest, Provider};

use crate::error::AnalysisError;
use crate::parse::{dedupe_sources, parse_reply};
use crate::prompt::{build_prompt, PromptContext};
use crate::types::{AnalysisResult, Inputs, ToolDefinition};

/// Longest raw reply excerpt written to the log on parse failure.
const MAX_LOGGED_REPLY_CHARS: usize = 2000;

/// Request settings applied to every analysis.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub model: String,
    pub web_search: bool,
    pub temperature: Option<f64>,
    pub context: PromptContext,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            web_search: true,
            temperature: None,
            context: PromptContext::default(),
        }
    }
}

impl From<&Config> for AnalyzerOptions {
    fn from(config: &Config) -> Self {
        Self {
            model: config.llm.model.clone(),
            web_search: config.llm.web_search,
            temperature: config.llm.temperature,
            context: PromptContext::from(&config.analysis),
        }
    }
}

/// Turns a tool and its collected inputs into an [`AnalysisResult`].
#[derive(Clone)]
pub struct Analyzer {
    provider: Arc<dyn Provider>,
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn Provider>, options: AnalyzerOptions) -> Self {
        Self { provider, options }
    }

    /// Gemini-backed analyzer using the configured credential and settings.
    pub fn from_config(config: &Config) -> Self {
        let provider = GeminiProvider::from_config(&config.llm, config.gemini_api_key());
        Self::new(Arc::new(provider), AnalyzerOptions::from(config))
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Run one analysis.
    ///
    /// Fails with [`AnalysisError::Configuration`] before any network call
    /// when no credential is available, [`AnalysisError::MalformedResponse`]
    /// when the reply is not a JSON object, and passes transport failures
    /// through unchanged.
    pub async fn analyze(
        &self,
        tool: &ToolDefinition,
        inputs: &Inputs,
    ) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!(
            "analysis",
            tool = tool.id,
            request_id = %generate_request_id(),
            model = %self.options.model,
        );
        self.run(tool, inputs).instrument(span).await
    }

    async fn run(
        &self,
        tool: &ToolDefinition,
        inputs: &Inputs,
    ) -> Result<AnalysisResult, AnalysisError> {
        if !self.provider.has_credentials() {
            error!(provider = self.provider.name(), "Credential missing; request not sent");
            return Err(AnalysisError::credential_missing());
        }

        let prompt = build_prompt(tool, inputs, &self.options.context);
        let request = GenerateRequest::new(&self.options.model, prompt)
            .with_web_search(self.options.web_search)
            .with_temperature(self.options.temperature);

        let start = Instant::now();
        let response = self.provider.generate(request).await.map_err(|e| {
            error!(kind = ?e.kind, status = ?e.status_code, "Remote call failed: {e}");
            AnalysisError::Transport(e)
        })?;

        let mut result = parse_reply(&response.text).inspect_err(|_| {
            let excerpt = truncate_with_ellipsis(&sanitize_for_log(&response.text), MAX_LOGGED_REPLY_CHARS);
            error!(reply = %excerpt, "Failed to parse model reply as JSON");
        })?;
        result.sources = dedupe_sources(response.citations);

        info!(
            latency_ms = start.elapsed().as_millis() as u64,
            provider_latency_ms = response.latency_ms,
            sources = result.sources.len(),
            metrics = result.key_metrics.len(),
            "Analysis complete"
        );

        Ok(result)
    }
}
