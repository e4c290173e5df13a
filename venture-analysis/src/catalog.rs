//! Static catalog of valuation methods and their input forms.
//!
//! Built once on first access and never modified.

use once_cell::sync::Lazy;

use crate::types::{ChartHint, InputKind, ToolCategory, ToolDefinition, ToolInput};

const RISK_LEVELS: &[&str] = &[
    "Very Low (+2)",
    "Low (+1)",
    "Normal (0)",
    "High (-1)",
    "Very High (-2)",
];

const STAGES: &[&str] = &[
    "Idea Stage",
    "Prototype",
    "Alpha Testing",
    "Beta Testing",
    "First Revenue",
    "Growth",
];

const TEAM_STATUS: &[&str] = &["Founders Only", "Partial Team", "Complete Team"];

const ALLIANCES: &[&str] = &["None", "In Discussion", "Signed Partners"];

fn number(id: &'static str, label: &'static str, placeholder: &'static str) -> ToolInput {
    ToolInput::new(id, label, InputKind::Number).placeholder(placeholder)
}

fn textarea(id: &'static str, label: &'static str, placeholder: &'static str) -> ToolInput {
    ToolInput::new(id, label, InputKind::Textarea).placeholder(placeholder)
}

fn text(id: &'static str, label: &'static str, placeholder: &'static str) -> ToolInput {
    ToolInput::new(id, label, InputKind::Text).placeholder(placeholder)
}

fn select(id: &'static str, label: &'static str, options: &'static [&'static str]) -> ToolInput {
    ToolInput::new(id, label, InputKind::Select).options(options)
}

fn percent_score(id: &'static str, label: &'static str, placeholder: &'static str) -> ToolInput {
    number(id, label, placeholder).unit("%")
}

static TOOLS: Lazy<Vec<ToolDefinition>> = Lazy::new(|| {
    vec![
        ToolDefinition {
            id: "berkus",
            name: "The Berkus Method",
            description: "Best for pre-revenue startups. Assigns value based on 5 qualitative indicators: Idea, Prototype, Team, Relationships, and Sales.",
            category: ToolCategory::Financial,
            icon: "Trophy",
            chart_hint: Some(ChartHint::Bar),
            inputs: vec![
                textarea("idea_val", "Sound Idea Assessment", "Describe the basic value prop and market risk."),
                textarea("proto_val", "Product Prototype Status", "Is there a working prototype? Tech risk reduced?"),
                textarea("team_val", "Management Team Quality", "Experience and completeness of the team."),
                textarea("strat_val", "Strategic Relationships", "Partnerships, board members, or advisors."),
                textarea("sales_val", "Initial Sales / Rollout", "Any revenue or path to production?"),
                number("max_val", "Max Value per Category ($)", "500000").default_number(500_000.0),
            ],
        },
        ToolDefinition {
            id: "first-chicago",
            name: "The First Chicago Method",
            description: "Probability-weighted approach valuing a startup based on Success (Best), Failure (Worst), and Survival (Base) scenarios.",
            category: ToolCategory::Financial,
            icon: "BarChart2",
            chart_hint: Some(ChartHint::Bar),
            inputs: vec![
                number("success_val", "Success Case Valuation ($)", "100000000"),
                number("success_prob", "Success Probability (%)", "10"),
                number("survival_val", "Survival Case Valuation ($)", "10000000"),
                number("survival_prob", "Survival Probability (%)", "60"),
                number("failure_val", "Failure Case Valuation ($)", "0"),
                number("failure_prob", "Failure Probability (%)", "30"),
            ],
        },
        ToolDefinition {
            id: "vc-method",
            name: "Venture Capital Method",
            description: "Works backward from the investor's desired ROI at exit, utilizing terminal multiples and time to exit.",
            category: ToolCategory::Financial,
            icon: "Briefcase",
            chart_hint: Some(ChartHint::Composed),
            inputs: vec![
                number("exit_revenue", "Projected Revenue in Exit Year ($)", "50000000"),
                number("profit_margin", "Net Profit Margin at Exit (%)", "20"),
                number("pe_ratio", "Industry P/E Ratio", "15"),
                number("roi", "Desired ROI (Multiple, e.g. 10x)", "10"),
                number("years", "Years to Exit", "5"),
                number("investment", "Investment Amount ($)", "2000000"),
            ],
        },
        ToolDefinition {
            id: "scorecard",
            name: "Scorecard Method",
            description: "Compares the startup against funded competitors, adjusting average valuation based on weighted factors.",
            category: ToolCategory::Market,
            icon: "ClipboardCheck",
            chart_hint: Some(ChartHint::Radar),
            inputs: vec![
                number("avg_val", "Avg Pre-money of Comparables ($)", "6000000"),
                percent_score("team_score", "Strength of Team (Target 100%)", "125"),
                percent_score("size_score", "Size of Opportunity (Target 100%)", "100"),
                percent_score("tech_score", "Product/Technology (Target 100%)", "100"),
                percent_score("comp_score", "Competitive Environment (Target 100%)", "75"),
                percent_score("marketing_score", "Marketing/Partnerships (Target 100%)", "100"),
                percent_score("invest_score", "Need for Investment (Target 100%)", "100"),
            ],
        },
        ToolDefinition {
            id: "risk-summation",
            name: "Risk Factor Summation",
            description: "Evaluates 12 specific risk factors (management, political, competition) to adjust the base valuation.",
            category: ToolCategory::Market,
            icon: "AlertTriangle",
            chart_hint: Some(ChartHint::Bar),
            inputs: vec![
                number("base_val", "Base Valuation ($)", "5000000"),
                select("risk_mgmt", "Management Risk", RISK_LEVELS),
                select("risk_stage", "Stage of Business Risk", RISK_LEVELS),
                select("risk_legis", "Legislation/Political Risk", RISK_LEVELS),
                select("risk_mfg", "Manufacturing/Supply Risk", RISK_LEVELS),
                select("risk_sales", "Sales & Marketing Risk", RISK_LEVELS),
                select("risk_funding", "Funding/Capital Risk", RISK_LEVELS),
                select("risk_comp", "Competition Risk", RISK_LEVELS),
                select("risk_tech", "Technology Risk", RISK_LEVELS),
                select("risk_lit", "Litigation Risk", RISK_LEVELS),
                select("risk_intl", "International Risk", RISK_LEVELS),
                select("risk_rep", "Reputation Risk", RISK_LEVELS),
                number("val_per_point", "Value Adjustment per Point ($)", "250000")
                    .default_number(250_000.0),
            ],
        },
        ToolDefinition {
            id: "comparables",
            name: "Comparables Method",
            description: "Uses real market data from similar businesses that have recently exited or raised funds.",
            category: ToolCategory::Market,
            icon: "Scale",
            chart_hint: Some(ChartHint::Bar),
            inputs: vec![
                text("industry", "Industry / Sector", "e.g. Fintech B2C"),
                number("revenue", "Annual Revenue ($)", "1000000"),
                number("ebitda", "Annual EBITDA ($)", "200000"),
                textarea("comps", "Target Comparable Companies", "List known competitors or recent exits to benchmark against."),
            ],
        },
        ToolDefinition {
            id: "dcf",
            name: "Discounted Cash Flow",
            description: "Projects future cash flows and discounts them to a Present Value using WACC.",
            category: ToolCategory::Financial,
            icon: "TrendingDown",
            chart_hint: Some(ChartHint::Composed),
            inputs: vec![
                number("cf_y1", "Year 1 Cash Flow ($)", "100000"),
                number("cf_y2", "Year 2 Cash Flow ($)", "250000"),
                number("cf_y3", "Year 3 Cash Flow ($)", "500000"),
                number("cf_y4", "Year 4 Cash Flow ($)", "1000000"),
                number("cf_y5", "Year 5 Cash Flow ($)", "2500000"),
                number("wacc", "Discount Rate / WACC (%)", "25"),
                number("growth_rate", "Terminal Growth Rate (%)", "3"),
            ],
        },
        ToolDefinition {
            id: "cost-to-duplicate",
            name: "Cost-to-Duplicate",
            description: "Calculates the hard cost to rebuild the company from scratch (IP, Development, Personnel).",
            category: ToolCategory::Financial,
            icon: "Hammer",
            chart_hint: Some(ChartHint::Pie),
            inputs: vec![
                number("rd_cost", "R&D / Engineering Costs ($)", "300000"),
                number("ip_cost", "Patent / IP Costs ($)", "50000"),
                number("marketing_cost", "Marketing / Branding Costs ($)", "50000"),
                number("legal_cost", "Legal / Admin Costs ($)", "20000"),
                number("proto_cost", "Physical Prototype Costs ($)", "0"),
            ],
        },
        ToolDefinition {
            id: "valuation-by-stage",
            name: "Valuation by Stage",
            description: "Links valuation directly to the development cycle milestones and maturity.",
            category: ToolCategory::Product,
            icon: "Rocket",
            chart_hint: Some(ChartHint::Bar),
            inputs: vec![
                select("stage", "Current Stage", STAGES),
                text("industry", "Target Industry", "e.g. Biotech"),
                select("team_status", "Management Team", TEAM_STATUS),
                select("alliances", "Strategic Alliances", ALLIANCES),
            ],
        },
        ToolDefinition {
            id: "book-value",
            name: "The Book Value Method",
            description: "Strictly quantitative based on Balance Sheet: Assets minus Liabilities.",
            category: ToolCategory::Financial,
            icon: "BookOpen",
            chart_hint: Some(ChartHint::Bar),
            inputs: vec![
                number("tangible_assets", "Total Tangible Assets ($)", "500000"),
                number("liabilities", "Total Liabilities ($)", "150000"),
                number("intangible_assets", "Intangible Assets (Reference only)", "1000000"),
            ],
        },
    ]
});

/// All tools, in display order.
pub fn tools() -> &'static [ToolDefinition] {
    &TOOLS
}

/// Find a tool by id.
pub fn find_tool(id: &str) -> Option<&'static ToolDefinition> {
    TOOLS.iter().find(|t| t.id == id)
}

/// Tools in one category, in display order.
pub fn tools_in_category(category: ToolCategory) -> impl Iterator<Item = &'static ToolDefinition> {
    TOOLS.iter().filter(move |t| t.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tool_ids_are_unique() {
        let ids: HashSet<_> = tools().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), tools().len());
        assert_eq!(tools().len(), 10);
    }

    #[test]
    fn input_ids_are_unique_within_each_tool() {
        for tool in tools() {
            let ids: HashSet<_> = tool.inputs.iter().map(|i| i.id).collect();
            assert_eq!(ids.len(), tool.inputs.len(), "duplicate input id in {}", tool.id);
            assert!(!tool.inputs.is_empty(), "{} has no inputs", tool.id);
        }
    }

    #[test]
    fn select_fields_have_options() {
        for tool in tools() {
            for input in &tool.inputs {
                assert_eq!(
                    input.kind == InputKind::Select,
                    !input.options.is_empty(),
                    "{}.{}",
                    tool.id,
                    input.id
                );
            }
        }
    }

    #[test]
    fn find_tool_by_id() {
        let dcf = find_tool("dcf").unwrap();
        assert_eq!(dcf.name, "Discounted Cash Flow");
        assert_eq!(dcf.chart_hint, Some(ChartHint::Composed));
        assert!(find_tool("astrology").is_none());
    }

    #[test]
    fn category_filter() {
        let market: Vec<_> = tools_in_category(ToolCategory::Market).map(|t| t.id).collect();
        assert_eq!(market, vec!["scorecard", "risk-summation", "comparables"]);
        assert_eq!(tools_in_category(ToolCategory::Team).count(), 0);
    }

    #[test]
    fn defaults_seed_forms() {
        let berkus = find_tool("berkus").unwrap().default_inputs();
        assert_eq!(berkus.len(), 1);
        assert_eq!(
            berkus.get("max_val"),
            Some(&crate::types::InputValue::Number(500_000.0))
        );
        assert!(find_tool("dcf").unwrap().default_inputs().is_empty());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let value = serde_json::to_value(find_tool("scorecard").unwrap()).unwrap();
        assert_eq!(value["chartType"], "radar");
        assert_eq!(value["category"], "Market");
        assert_eq!(value["inputs"][1]["type"], "number");
        assert_eq!(value["inputs"][1]["unit"], "%");
    }
}
