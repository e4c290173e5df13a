//! Defensive parsing of the model reply.
//!
//! The model is asked for bare JSON but is not guaranteed to comply, so the
//! reply is unfenced, parsed, and then read field by field with a default for
//! anything missing or mis-shaped.

use std::collections::HashSet;

use serde_json::{Map, Value};
use venture_gateway::Citation;

use crate::error::AnalysisError;
use crate::types::{
    AnalysisResult, ChartPoint, GroundingSource, KeyMetric, MetricStatus, MetricValue,
};

/// Placeholder narrative when the reply carries none.
pub const NO_ANALYSIS_TEXT: &str = "No analysis provided.";

const FENCE: &str = "```";

/// Trim the reply and remove a surrounding markdown code fence.
///
/// Handles both a fence with a language tag (```` ```json ````) and a bare
/// fence. Text without a leading fence is only trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    // Drop an info string such as `json` when it sits alone before the body.
    let rest = match rest.find('\n') {
        Some(pos) if is_info_string(&rest[..pos]) => &rest[pos + 1..],
        None if is_info_string(rest.trim_end_matches(FENCE)) => "",
        _ => rest
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
            .trim_start_matches([' ', '\t']),
    };

    rest.strip_suffix(FENCE).unwrap_or(rest).trim()
}

fn is_info_string(s: &str) -> bool {
    s.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}

/// Parse reply text into a result. `sources` is left empty.
///
/// A reply with no text at all is treated as an empty object, so every
/// field defaults. Text that strips down to nothing is malformed.
pub fn parse_reply(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let body = if text.is_empty() { "{}" } else { strip_code_fence(text) };

    let value: Value = serde_json::from_str(body).map_err(|_| AnalysisError::MalformedResponse)?;
    let Value::Object(object) = value else {
        return Err(AnalysisError::MalformedResponse);
    };

    Ok(AnalysisResult {
        analysis_text: analysis_text(&object),
        key_metrics: array_of(&object, "keyMetrics", key_metric),
        recommendations: array_of(&object, "recommendations", |v| v.as_str().map(str::to_string)),
        chart_data: array_of(&object, "chartData", |v| {
            serde_json::from_value::<ChartPoint>(v.clone()).ok()
        }),
        sources: Vec::new(),
    })
}

fn analysis_text(object: &Map<String, Value>) -> String {
    object
        .get("analysisText")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_ANALYSIS_TEXT)
        .to_string()
}

/// Read an array field, keeping the entries `convert` accepts.
/// A missing or non-array field yields an empty list.
fn array_of<T>(
    object: &Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    match object.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(convert).collect(),
        _ => Vec::new(),
    }
}

fn key_metric(value: &Value) -> Option<KeyMetric> {
    let label = value.get("label")?.as_str()?.to_string();
    let value_field = match value.get("value")? {
        Value::String(s) => MetricValue::Text(s.clone()),
        Value::Number(n) => MetricValue::Number(n.as_f64()?),
        _ => return None,
    };
    let status = value
        .get("status")
        .and_then(Value::as_str)
        .map(MetricStatus::parse)
        .unwrap_or_default();

    Some(KeyMetric {
        label,
        value: value_field,
        status,
    })
}

/// Keep citations with both a URI and a title, first occurrence per URI wins.
pub fn dedupe_sources<I>(citations: I) -> Vec<GroundingSource>
where
    I: IntoIterator<Item = Citation>,
{
    let mut seen = HashSet::new();
    citations
        .into_iter()
        .filter_map(|c| match (c.uri, c.title) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => {
                Some(GroundingSource { uri, title })
            }
            _ => None,
        })
        .filter(|s| seen.insert(s.uri.clone()))
        .collect()
}
