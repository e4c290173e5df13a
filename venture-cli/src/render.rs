//! Plain-text rendering of tools, results, and saved reports.
//!
//! Everything here returns a `String` so command handlers decide where it goes.

use std::fmt::Write;

use console::style;
use venture_analysis::{
    AnalysisResult, ChartHint, ChartPoint, InputKind, MetricStatus, ToolDefinition,
};
use venture_memory::SavedReport;

/// Format a number with thousands separators; whole numbers lose the decimals.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let rounded = (n * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let whole = abs.trunc() as u64;
    let frac = ((abs - abs.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if frac == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac:02}")
    }
}

/// Format a millisecond timestamp as local-independent UTC text.
pub fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map_or_else(|| ms.to_string(), |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
}

fn truncate(s: &str, max: usize) -> String {
    venture_common::util::truncate_with_ellipsis(s, max)
}

/// One line per tool.
pub fn tool_list<'a, I>(tools: I) -> String
where
    I: IntoIterator<Item = &'a ToolDefinition>,
{
    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {:<10} {:<8} NAME", "ID", "CATEGORY", "CHART");
    let _ = writeln!(out, "{}", "-".repeat(72));
    for tool in tools {
        let chart = tool.chart_hint.map_or("-", |h| h.as_str());
        let _ = writeln!(
            out,
            "{:<20} {:<10} {:<8} {}",
            tool.id,
            tool.category.to_string(),
            chart,
            tool.name
        );
    }
    out
}

/// Full description of one tool and its form.
pub fn tool_detail(tool: &ToolDefinition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(tool.name).bold());
    let _ = writeln!(out, "{}", tool.description);
    let _ = writeln!(
        out,
        "Category: {}   Chart: {}",
        tool.category,
        tool.chart_hint.map_or("-", |h| h.as_str())
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Inputs:");
    for input in &tool.inputs {
        let kind = match input.kind {
            InputKind::Text => "text",
            InputKind::Number => "number",
            InputKind::Select => "select",
            InputKind::Textarea => "textarea",
        };
        let mut line = format!("  {:<18} {:<9} {}", input.id, kind, input.label);
        if let Some(unit) = input.unit {
            let _ = write!(line, " [{unit}]");
        }
        if let Some(default) = input.default_input() {
            let _ = write!(line, " (default: {default})");
        }
        let _ = writeln!(out, "{line}");
        if !input.options.is_empty() {
            let _ = writeln!(out, "  {:<18} options: {}", "", input.options.join(" | "));
        } else if let Some(hint) = input.placeholder {
            let _ = writeln!(out, "  {:<18} e.g. {}", "", truncate(hint, 60));
        }
    }
    out
}

fn status_marker(status: MetricStatus) -> String {
    match status {
        MetricStatus::Good => style("good").green().to_string(),
        MetricStatus::Neutral => style("neutral").yellow().to_string(),
        MetricStatus::Bad => style("bad").red().to_string(),
    }
}

/// Chart rows as a table whose columns follow the chart hint.
pub fn chart_table(hint: Option<ChartHint>, points: &[ChartPoint]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    match hint.unwrap_or(ChartHint::Bar) {
        ChartHint::Radar => {
            let _ = writeln!(out, "{:<28} {:>10} {:>10} {:>8}", "DIMENSION", "STARTUP", "BENCHMARK", "MAX");
            for point in points {
                let (label, a, b, max) = match point {
                    ChartPoint::Radar { subject, a, b, full_mark } => {
                        (subject.as_str(), *a, Some(*b), Some(*full_mark))
                    }
                    ChartPoint::Series { name, value, benchmark } => (name.as_str(), *value, *benchmark, None),
                };
                let _ = writeln!(
                    out,
                    "{:<28} {:>10} {:>10} {:>8}",
                    truncate(label, 28),
                    format_number(a),
                    b.map_or_else(|| "-".to_string(), format_number),
                    max.map_or_else(|| "-".to_string(), format_number)
                );
            }
        }
        ChartHint::Pie => {
            let total: f64 = points.iter().map(point_value).sum();
            let _ = writeln!(out, "{:<28} {:>16} {:>8}", "SEGMENT", "VALUE", "SHARE");
            for point in points {
                let value = point_value(point);
                let share = if total > 0.0 {
                    format!("{:.1}%", value / total * 100.0)
                } else {
                    "-".to_string()
                };
                let _ = writeln!(
                    out,
                    "{:<28} {:>16} {:>8}",
                    truncate(point_label(point), 28),
                    format_number(value),
                    share
                );
            }
        }
        ChartHint::Bar | ChartHint::Composed => {
            let _ = writeln!(out, "{:<28} {:>16} {:>16}", "ITEM", "VALUE", "BENCHMARK");
            for point in points {
                let benchmark = match point {
                    ChartPoint::Series { benchmark, .. } => *benchmark,
                    ChartPoint::Radar { b, .. } => Some(*b),
                };
                let _ = writeln!(
                    out,
                    "{:<28} {:>16} {:>16}",
                    truncate(point_label(point), 28),
                    format_number(point_value(point)),
                    benchmark.map_or_else(|| "-".to_string(), format_number)
                );
            }
        }
    }
    out
}

fn point_label(point: &ChartPoint) -> &str {
    match point {
        ChartPoint::Radar { subject, .. } => subject,
        ChartPoint::Series { name, .. } => name,
    }
}

fn point_value(point: &ChartPoint) -> f64 {
    match point {
        ChartPoint::Radar { a, .. } => *a,
        ChartPoint::Series { value, .. } => *value,
    }
}

/// Full result: narrative, metrics, chart, recommendations, and sources.
pub fn result(hint: Option<ChartHint>, result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("Analysis").bold());
    let _ = writeln!(out, "{}", result.analysis_text);

    if !result.key_metrics.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Key metrics").bold());
        for metric in &result.key_metrics {
            let _ = writeln!(
                out,
                "  {:<32} {:<24} {}",
                truncate(&metric.label, 32),
                metric.value.to_string(),
                status_marker(metric.status)
            );
        }
    }

    let chart = chart_table(hint, &result.chart_data);
    if !chart.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Chart data").bold());
        out.push_str(&chart);
    }

    if !result.recommendations.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Recommendations").bold());
        for (i, rec) in result.recommendations.iter().enumerate() {
            let _ = writeln!(out, "  {}. {rec}", i + 1);
        }
    }

    if !result.sources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Sources").bold());
        for source in &result.sources {
            let _ = writeln!(out, "  - {} <{}>", source.title, source.uri);
        }
    }
    out
}

/// One line per saved report.
pub fn report_list(reports: &[SavedReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<38} {:<22} TOOL", "ID", "SAVED");
    let _ = writeln!(out, "{}", "-".repeat(80));
    for report in reports {
        let _ = writeln!(
            out,
            "{:<38} {:<22} {}",
            report.id,
            format_timestamp(report.timestamp),
            report.tool_name
        );
    }
    out
}

/// Header, inputs, and result of one saved report.
pub fn report_detail(report: &SavedReport, hint: Option<ChartHint>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(&report.tool_name).bold());
    let _ = writeln!(out, "Report {}  saved {}", report.id, format_timestamp(report.timestamp));
    let _ = writeln!(out);
    let _ = writeln!(out, "Inputs:");
    for (id, value) in &report.inputs {
        let shown = if value.is_empty() {
            "(blank)".to_string()
        } else {
            truncate(&value.to_string(), 60)
        };
        let _ = writeln!(out, "  {id:<18} {shown}");
    }
    let _ = writeln!(out);
    out.push_str(&result(hint, &report.result));
    out
}
