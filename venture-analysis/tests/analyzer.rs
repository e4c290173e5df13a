//! End-to-end behavior of the analysis adapter with scripted providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use venture_analysis::{
    find_tool, AnalysisError, Analyzer, AnalyzerOptions, InputValue, Inputs, MetricStatus,
};
use venture_gateway::{
    Citation, GeminiProvider, GenerateRequest, GenerateResponse, Provider, ProviderError,
    ProviderErrorKind, TokenUsage,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Provider double that replies with fixed text and counts calls.
struct ScriptedProvider {
    credentials: bool,
    reply: Result<(String, Vec<Citation>), ProviderError>,
    delay: Duration,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl ScriptedProvider {
    fn replying(text: &str) -> Self {
        Self::with_citations(text, Vec::new())
    }

    fn with_citations(text: &str, citations: Vec<Citation>) -> Self {
        Self {
            credentials: true,
            reply: Ok((text.to_string(), citations)),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn failing(err: ProviderError) -> Self {
        Self {
            reply: Err(err),
            ..Self::replying("")
        }
    }

    fn without_credentials() -> Self {
        Self {
            credentials: false,
            ..Self::replying("{}")
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn has_credentials(&self) -> bool {
        self.credentials
    }

    fn supports_model(&self, _model: &str) -> bool {
        true
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let model = request.model.clone();
        *self.last_request.lock().unwrap() = Some(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let (text, citations) = self.reply.clone()?;
        Ok(GenerateResponse {
            provider: "scripted".into(),
            model,
            text,
            citations,
            usage: TokenUsage::default(),
            finish_reason: Some("STOP".into()),
            latency_ms: 1,
        })
    }
}

fn citation(uri: &str, title: &str) -> Citation {
    Citation {
        uri: Some(uri.into()),
        title: Some(title.into()),
    }
}

fn analyzer(provider: Arc<ScriptedProvider>) -> Analyzer {
    Analyzer::new(provider, AnalyzerOptions::default())
}

fn berkus_inputs() -> Inputs {
    let mut inputs = Inputs::new();
    inputs.insert("idea_val".into(), InputValue::Text("Counter-drone radar".into()));
    inputs.insert("max_val".into(), InputValue::Number(500000.0));
    inputs.insert("sales_val".into(), InputValue::Empty);
    inputs
}

#[tokio::test]
async fn missing_credential_fails_before_any_call() {
    let provider = Arc::new(ScriptedProvider::without_credentials());
    let err = analyzer(provider.clone())
        .analyze(find_tool("berkus").unwrap(), &berkus_inputs())
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Configuration(_)));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn successful_reply_is_fully_populated() {
    let provider = Arc::new(ScriptedProvider::replying(
        r#"{"analysisText":"Fair for KSA","keyMetrics":[{"label":"Pre-money","value":"$2.1M","status":"good"}]}"#,
    ));
    let result = analyzer(provider.clone())
        .analyze(find_tool("berkus").unwrap(), &berkus_inputs())
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(result.analysis_text, "Fair for KSA");
    assert_eq!(result.key_metrics[0].status, MetricStatus::Good);
    assert!(result.recommendations.is_empty());
    assert!(result.chart_data.is_empty());
    assert!(result.sources.is_empty());
}

#[tokio::test]
async fn request_carries_prompt_model_and_search_flag() {
    let provider = Arc::new(ScriptedProvider::replying("{}"));
    analyzer(provider.clone())
        .analyze(find_tool("berkus").unwrap(), &berkus_inputs())
        .await
        .unwrap();

    let request = provider.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.model, "gemini-2.5-flash");
    assert!(request.web_search);
    assert!(request.prompt.contains("The Berkus Method"));
    assert!(request.prompt.contains("Counter-drone radar"));
    assert!(request.prompt.contains("\"sales_val\": null"));
}

#[tokio::test]
async fn fenced_and_unfenced_replies_agree() {
    let body = r#"{"analysisText":"ok","recommendations":["a","b"]}"#;
    let tool = find_tool("dcf").unwrap();
    let inputs = Inputs::new();

    let mut results = Vec::new();
    for text in [body.to_string(), format!("```json\n{body}\n```"), format!("```\n{body}\n```")] {
        let provider = Arc::new(ScriptedProvider::replying(&text));
        results.push(analyzer(provider).analyze(tool, &inputs).await.unwrap());
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], results[2]);
    assert_eq!(results[0].recommendations, vec!["a", "b"]);
}

#[tokio::test]
async fn grounding_sources_are_filtered_and_deduplicated() {
    let mut citations = vec![
        citation("a", "X"),
        citation("b", "Y"),
        citation("a", "X2"),
    ];
    citations.push(Citation {
        uri: Some("c".into()),
        title: None,
    });
    let provider = Arc::new(ScriptedProvider::with_citations("{}", citations));

    let result = analyzer(provider)
        .analyze(find_tool("scorecard").unwrap(), &Inputs::new())
        .await
        .unwrap();

    let pairs: Vec<_> = result
        .sources
        .iter()
        .map(|s| (s.uri.as_str(), s.title.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a", "X"), ("b", "Y")]);
}

#[tokio::test]
async fn refusal_text_is_malformed() {
    let provider = Arc::new(ScriptedProvider::replying("Sorry, I can't help with that."));
    let err = analyzer(provider)
        .analyze(find_tool("vc-method").unwrap(), &Inputs::new())
        .await
        .unwrap_err();

    assert!(err.is_malformed());
    assert_eq!(
        err.to_string(),
        "Analysis failed to generate valid structured data. Please try again."
    );
}

#[tokio::test]
async fn empty_reply_defaults_every_field() {
    let provider = Arc::new(ScriptedProvider::replying(""));
    let result = analyzer(provider)
        .analyze(find_tool("book-value").unwrap(), &Inputs::new())
        .await
        .unwrap();

    assert_eq!(result.analysis_text, "No analysis provided.");
    assert!(result.key_metrics.is_empty());
}

#[tokio::test]
async fn transport_errors_pass_through_unchanged() {
    let original = ProviderError::new(
        "scripted",
        "gemini-2.5-flash",
        ProviderErrorKind::Quota,
        "Resource has been exhausted",
    )
    .with_status(429);
    let provider = Arc::new(ScriptedProvider::failing(original.clone()));

    let err = analyzer(provider.clone())
        .analyze(find_tool("first-chicago").unwrap(), &Inputs::new())
        .await
        .unwrap_err();

    assert_eq!(provider.calls(), 1);
    assert_eq!(err.to_string(), original.to_string());
    let inner = err.as_transport().unwrap();
    assert_eq!(inner.kind, ProviderErrorKind::Quota);
    assert_eq!(inner.status_code, Some(429));
}

#[tokio::test]
async fn concurrent_calls_proceed_independently() {
    let provider = Arc::new(ScriptedProvider {
        delay: Duration::from_millis(50),
        ..ScriptedProvider::replying(r#"{"analysisText":"parallel"}"#)
    });
    let analyzer = analyzer(provider.clone());
    let tool = find_tool("berkus").unwrap();
    let inputs = berkus_inputs();

    let (a, b) = tokio::join!(analyzer.analyze(tool, &inputs), analyzer.analyze(tool, &inputs));

    assert_eq!(a.unwrap().analysis_text, "parallel");
    assert_eq!(b.unwrap().analysis_text, "parallel");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn end_to_end_through_gemini() {
    let server = MockServer::start().await;
    let reply = "```json\n{\"analysisText\":\"Grounded\",\"chartData\":[{\"name\":\"R&D\",\"value\":300000}]}\n```";

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": reply }], "role": "model" },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://magnitt.example/ksa", "title": "KSA funding report" } },
                        { "web": { "uri": "https://magnitt.example/ksa", "title": "Duplicate" } },
                        { "retrievedContext": { "uri": "gs://ignored" } }
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_options(
        Some("test-key"),
        &format!("{}/v1beta", server.uri()),
        Duration::from_secs(5),
        Duration::from_secs(2),
    );
    let analyzer = Analyzer::new(Arc::new(provider), AnalyzerOptions::default());

    let result = analyzer
        .analyze(find_tool("cost-to-duplicate").unwrap(), &Inputs::new())
        .await
        .unwrap();

    assert_eq!(result.analysis_text, "Grounded");
    assert_eq!(result.chart_data.len(), 1);
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].title, "KSA funding report");
}
