//! Data model for valuation tools and analysis results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Tool definitions
// ============================================================================

/// Form field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
    Select,
    Textarea,
}

/// Default value for a form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Number(f64),
    Text(&'static str),
}

/// One form field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInput {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "has_no_options")]
    pub options: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

fn has_no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

impl ToolInput {
    /// A field with no placeholder, options, unit, or default.
    pub fn new(id: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            id,
            label,
            kind,
            placeholder: None,
            options: &[],
            unit: None,
            default_value: None,
        }
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn default_number(mut self, value: f64) -> Self {
        self.default_value = Some(DefaultValue::Number(value));
        self
    }

    pub fn default_text(mut self, value: &'static str) -> Self {
        self.default_value = Some(DefaultValue::Text(value));
        self
    }

    /// The field's default as a form value, if it has one.
    pub fn default_input(&self) -> Option<InputValue> {
        self.default_value.as_ref().map(|d| match d {
            DefaultValue::Number(n) => InputValue::Number(*n),
            DefaultValue::Text(t) => InputValue::Text((*t).to_string()),
        })
    }
}

/// Valuation method category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
    Financial,
    Market,
    Team,
    Product,
}

impl ToolCategory {
    pub const ALL: [Self; 4] = [Self::Financial, Self::Market, Self::Team, Self::Product];
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Financial => write!(f, "Financial"),
            Self::Market => write!(f, "Market"),
            Self::Team => write!(f, "Team"),
            Self::Product => write!(f, "Product"),
        }
    }
}

impl std::str::FromStr for ToolCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "financial" => Ok(Self::Financial),
            "market" => Ok(Self::Market),
            "team" => Ok(Self::Team),
            "product" => Ok(Self::Product),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

/// Expected shape of a result's chart data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartHint {
    Bar,
    Pie,
    Radar,
    Composed,
}

impl ChartHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Radar => "radar",
            Self::Composed => "composed",
        }
    }
}

impl std::fmt::Display for ChartHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One valuation method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
    /// Opaque icon reference resolved by the presentation layer
    pub icon: &'static str,
    pub inputs: Vec<ToolInput>,
    #[serde(rename = "chartType", skip_serializing_if = "Option::is_none")]
    pub chart_hint: Option<ChartHint>,
}

impl ToolDefinition {
    /// Look up a field by id.
    pub fn input(&self, id: &str) -> Option<&ToolInput> {
        self.inputs.iter().find(|i| i.id == id)
    }

    /// A form pre-filled with every field's default value.
    pub fn default_inputs(&self) -> Inputs {
        self.inputs
            .iter()
            .filter_map(|i| i.default_input().map(|v| (i.id.to_string(), v)))
            .collect()
    }
}

// ============================================================================
// Form values
// ============================================================================

/// A collected form value. Serializes as a bare JSON string, number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
    Empty,
}

impl InputValue {
    /// Tag raw form text according to the field kind.
    ///
    /// Number fields become `Number` when the text parses and otherwise keep
    /// the text as typed. Blank text is `Empty`.
    pub fn from_raw(kind: Option<InputKind>, raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match kind {
            Some(InputKind::Number) => trimmed
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map_or_else(|| Self::Text(raw.to_string()), Self::Number),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(t) => t.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl std::fmt::Display for InputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
            Self::Empty => Ok(()),
        }
    }
}

/// Mapping from field id to collected value.
pub type Inputs = BTreeMap<String, InputValue>;

// ============================================================================
// Analysis result
// ============================================================================

/// Verdict attached to a key metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Good,
    #[default]
    Neutral,
    Bad,
}

impl MetricStatus {
    /// Parse a status tag; anything unrecognized is `Neutral`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "good" => Self::Good,
            "bad" => Self::Bad,
            _ => Self::Neutral,
        }
    }
}

/// Metric value as returned by the model: text or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub label: String,
    pub value: MetricValue,
    #[serde(default)]
    pub status: MetricStatus,
}

/// One chart row. The variant follows the tool's chart hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartPoint {
    /// Radar: startup score `A` against benchmark `B` on one dimension
    Radar {
        subject: String,
        #[serde(rename = "A")]
        a: f64,
        #[serde(rename = "B")]
        b: f64,
        #[serde(rename = "fullMark", default = "default_full_mark")]
        full_mark: f64,
    },
    /// Bar / composed / pie: a named value with an optional benchmark
    Series {
        name: String,
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        benchmark: Option<f64>,
    },
}

fn default_full_mark() -> f64 {
    100.0
}

/// A web citation the model grounded its answer on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// Parsed outcome of one analysis. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analysis_text: String,
    #[serde(default)]
    pub key_metrics: Vec<KeyMetric>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub chart_data: Vec<ChartPoint>,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_fields_are_tagged_at_the_boundary() {
        assert_eq!(
            InputValue::from_raw(Some(InputKind::Number), "500000"),
            InputValue::Number(500000.0)
        );
        assert_eq!(
            InputValue::from_raw(Some(InputKind::Number), "1,250,000"),
            InputValue::Number(1_250_000.0)
        );
        assert_eq!(
            InputValue::from_raw(Some(InputKind::Number), "about 5M"),
            InputValue::Text("about 5M".into())
        );
        assert_eq!(
            InputValue::from_raw(Some(InputKind::Text), "42"),
            InputValue::Text("42".into())
        );
        assert_eq!(InputValue::from_raw(None, "   "), InputValue::Empty);
    }

    #[test]
    fn defaults_convert_to_form_values() {
        let stage = ToolInput::new("stage", "Stage", InputKind::Select)
            .options(&["Seed", "Series A"])
            .default_text("Seed");
        assert_eq!(stage.default_input(), Some(InputValue::Text("Seed".into())));
        assert_eq!(serde_json::to_value(&stage).unwrap()["defaultValue"], "Seed");

        let max = ToolInput::new("max_val", "Max", InputKind::Number).default_number(500000.0);
        assert_eq!(max.default_input(), Some(InputValue::Number(500000.0)));

        let bare = ToolInput::new("notes", "Notes", InputKind::Textarea);
        assert_eq!(bare.default_input(), None);
    }

    #[test]
    fn input_values_serialize_bare() {
        let mut inputs = Inputs::new();
        inputs.insert("a".into(), InputValue::Number(10.0));
        inputs.insert("b".into(), InputValue::Text("Fintech".into()));
        inputs.insert("c".into(), InputValue::Empty);
        assert_eq!(
            serde_json::to_value(&inputs).unwrap(),
            json!({ "a": 10.0, "b": "Fintech", "c": null })
        );

        let back: Inputs = serde_json::from_value(json!({ "a": 10, "b": "x", "c": null })).unwrap();
        assert_eq!(back["a"], InputValue::Number(10.0));
        assert_eq!(back["c"], InputValue::Empty);
    }

    #[test]
    fn chart_points_pick_shape_by_fields() {
        let radar: ChartPoint =
            serde_json::from_value(json!({ "subject": "Team", "A": 80, "B": 60, "fullMark": 100 }))
                .unwrap();
        assert!(matches!(radar, ChartPoint::Radar { .. }));

        let bar: ChartPoint =
            serde_json::from_value(json!({ "name": "Idea", "value": 400000, "benchmark": 350000 }))
                .unwrap();
        assert_eq!(
            bar,
            ChartPoint::Series {
                name: "Idea".into(),
                value: 400000.0,
                benchmark: Some(350000.0)
            }
        );

        let pie: ChartPoint = serde_json::from_value(json!({ "name": "R&D", "value": 3 })).unwrap();
        assert_eq!(
            serde_json::to_value(&pie).unwrap(),
            json!({ "name": "R&D", "value": 3.0 })
        );
    }

    #[test]
    fn metric_status_parse_is_lenient() {
        assert_eq!(MetricStatus::parse("GOOD"), MetricStatus::Good);
        assert_eq!(MetricStatus::parse("bad"), MetricStatus::Bad);
        assert_eq!(MetricStatus::parse("warning"), MetricStatus::Neutral);
    }

    #[test]
    fn analysis_result_uses_camel_case() {
        let result = AnalysisResult {
            analysis_text: "x".into(),
            key_metrics: vec![],
            recommendations: vec![],
            chart_data: vec![],
            sources: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("analysisText").is_some());
        assert!(value.get("keyMetrics").is_some());
        assert!(value.get("chartData").is_some());
    }
}
