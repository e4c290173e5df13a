//! Prompt construction for the analysis request.
//!
//! The prompt is a pure function of the tool, the collected inputs, and the
//! firm/market context, so identical arguments always produce identical text.

use venture_common::AnalysisConfig;

use crate::types::{ChartHint, Inputs, ToolDefinition};

/// Firm persona and target market woven into every prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub firm: String,
    pub market: String,
    pub region: String,
}

impl Default for PromptContext {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for PromptContext {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            firm: config.firm.clone(),
            market: config.market.clone(),
            region: config.region.clone(),
        }
    }
}

/// Sector named in the research instruction.
fn sector(inputs: &Inputs) -> String {
    inputs
        .get("industry")
        .filter(|v| !v.is_empty())
        .map_or_else(|| "relevant".to_string(), ToString::to_string)
}

/// Shape description for `chartData`, selected by the tool's chart hint.
pub fn chart_note(hint: Option<ChartHint>, market: &str) -> String {
    match hint.unwrap_or(ChartHint::Bar) {
        ChartHint::Pie => r#"Use simple objects { "name": "Category", "value": number }."#.to_string(),
        ChartHint::Bar => format!(
            r#"Use {{ "name": "Metric", "value": number, "benchmark": number (optional - representing {market} average) }}."#
        ),
        ChartHint::Radar => format!(
            r#"Use {{ "subject": "Dimension", "A": number (startup score 1-100), "B": number ({market} benchmark 1-100), "fullMark": 100 }}."#
        ),
        ChartHint::Composed => {
            r#"Use { "name": "Year/Category", "value": number, "benchmark": number (optional) }."#
                .to_string()
        }
    }
}

/// Build the full instruction block sent to the model.
pub fn build_prompt(tool: &ToolDefinition, inputs: &Inputs, ctx: &PromptContext) -> String {
    let inputs_json = serde_json::to_string_pretty(inputs).unwrap_or_else(|_| "{}".to_string());
    let hint = tool.chart_hint.unwrap_or(ChartHint::Bar);
    let PromptContext { firm, market, region } = ctx;
    let name = tool.name;
    let sector = sector(inputs);
    let note = chart_note(tool.chart_hint, market);

    format!(
        r#"You are a Senior Investment Analyst at "{firm}", a specialized venture arm in {market} targeting dual-use technology and R&D (TRL 1-7).

Task: Evaluate a startup using the "{name}" framework, with a STRICT FOCUS on the {market} market and the {region} ecosystem.

Inputs provided by the user:
{inputs_json}

Instructions:
1. CALCULATIONS: Perform all necessary math for the "{name}" method based on the inputs.
2. MARKET RESEARCH (MANDATORY - USE GOOGLE SEARCH):
   - Search for REAL-TIME benchmarks specifically in {market} and {region} for the {sector} sector.
   - Identify relevant national development programmes and sovereign investment focus areas in {market}.
   - Check for local regulatory impacts (investment licensing, capital market rules, local content requirements).
   - If {market}-specific financial data is private or unavailable, use global benchmarks but explicitly ADJUST them for the {market} risk/opportunity profile.
3. ANALYSIS:
   - Compare the startup's metrics against {market}/{region} standards.
   - Assess alignment with national priorities.
   - Highlight "Dual-Use" (Civilian + Defense/Security) potential if the technology allows.
   - Be critical: If the valuation is unrealistic for the {market} market, say so.

Output Format:
Return a valid JSON object ONLY, with the following structure (do not use Markdown code blocks for the JSON):
{{
  "analysisText": "A detailed paragraph (approx 150 words) summarizing the findings. MUST mention {market} market context, national priority relevance, and specific calculation details.",
  "keyMetrics": [
    {{ "label": "Metric Name", "value": "Metric Value", "status": "good" | "neutral" | "bad" }}
  ],
  "recommendations": [
    "Strategic recommendation 1 (Local Context)",
    "Strategic recommendation 2 (Operational/Financial)",
    "Strategic recommendation 3 (Risk Mitigation)"
  ],
  "chartData": [
    {{ "name": "Label 1", "value": 100, "benchmark": 80 }},
    {{ "name": "Label 2", "value": 200, "benchmark": 150 }}
  ]
}}

Note on chartData ('{hint}'):
{note}

Ensure the JSON is parseable.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_tool;
    use crate::types::InputValue;

    #[test]
    fn prompt_names_tool_and_embeds_inputs() {
        let tool = find_tool("berkus").unwrap();
        let mut inputs = Inputs::new();
        inputs.insert("idea_val".into(), InputValue::Text("Drone swarm logistics".into()));
        inputs.insert("max_val".into(), InputValue::Number(500000.0));
        inputs.insert("team_val".into(), InputValue::Empty);

        let prompt = build_prompt(tool, &inputs, &PromptContext::default());
        assert!(prompt.contains("\"The Berkus Method\" framework"));
        assert!(prompt.contains("\"idea_val\": \"Drone swarm logistics\""));
        assert!(prompt.contains("\"max_val\": 500000.0"));
        assert!(prompt.contains("\"team_val\": null"));
        assert!(prompt.contains("VentureSwords"));
        assert!(prompt.contains("Saudi Arabia (KSA)"));
        assert!(prompt.contains("for the relevant sector"));
    }

    #[test]
    fn industry_input_drives_research_sector() {
        let tool = find_tool("comparables").unwrap();
        let mut inputs = Inputs::new();
        inputs.insert("industry".into(), InputValue::Text("Fintech B2C".into()));
        let prompt = build_prompt(tool, &inputs, &PromptContext::default());
        assert!(prompt.contains("for the Fintech B2C sector"));

        inputs.insert("industry".into(), InputValue::Text("  ".into()));
        let prompt = build_prompt(tool, &inputs, &PromptContext::default());
        assert!(prompt.contains("for the relevant sector"));
    }

    #[test]
    fn one_chart_note_per_hint() {
        let radar = build_prompt(find_tool("scorecard").unwrap(), &Inputs::new(), &PromptContext::default());
        assert!(radar.contains("\"fullMark\": 100"));
        assert!(!radar.contains("\"Category\""));

        let pie = build_prompt(
            find_tool("cost-to-duplicate").unwrap(),
            &Inputs::new(),
            &PromptContext::default(),
        );
        assert!(pie.contains("\"name\": \"Category\""));
        assert!(!pie.contains("\"subject\""));
    }

    #[test]
    fn missing_hint_falls_back_to_bar() {
        assert_eq!(chart_note(None, "KSA"), chart_note(Some(ChartHint::Bar), "KSA"));
    }

    #[test]
    fn prompt_is_deterministic_and_context_aware() {
        let tool = find_tool("dcf").unwrap();
        let ctx = PromptContext {
            firm: "Falcon Capital".into(),
            market: "UAE".into(),
            region: "GCC".into(),
        };
        let a = build_prompt(tool, &Inputs::new(), &ctx);
        let b = build_prompt(tool, &Inputs::new(), &ctx);
        assert_eq!(a, b);
        assert!(a.contains("\"Falcon Capital\""));
        assert!(a.contains("the GCC ecosystem"));
        assert!(!a.contains("Saudi"));
    }
}
