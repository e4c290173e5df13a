//! `venture analyze` and the shared run-and-save flow.

use anyhow::{anyhow, Result};
use console::style;
use tracing::info;
use venture_analysis::form::{collect_inputs, missing_fields, parse_assignment};
use venture_analysis::{find_tool, Analyzer, Inputs, ToolDefinition};
use venture_common::Config;
use venture_memory::{open_report_store, NewReport};

use crate::render;

/// Output and persistence choices for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub save: bool,
    pub json: bool,
}

/// Resolve a tool id or explain how to list the valid ones.
pub fn lookup_tool(id: &str) -> Result<&'static ToolDefinition> {
    find_tool(id).ok_or_else(|| anyhow!("Unknown tool '{id}'. Run `venture tools` to see available tools."))
}

/// Parse `KEY=VALUE` arguments into typed inputs for `tool`.
pub fn inputs_from_args(tool: &ToolDefinition, args: &[String], defaults: bool) -> Result<Inputs> {
    let pairs = args
        .iter()
        .map(|arg| {
            parse_assignment(arg).ok_or_else(|| anyhow!("Invalid input '{arg}': expected KEY=VALUE"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(collect_inputs(tool, pairs, defaults))
}

pub async fn handle_command(
    config: &Config,
    id: &str,
    args: &[String],
    defaults: bool,
    options: RunOptions,
) -> Result<()> {
    let tool = lookup_tool(id)?;
    let inputs = inputs_from_args(tool, args, defaults)?;

    let missing = missing_fields(tool, &inputs);
    if !missing.is_empty() && !options.json {
        eprintln!(
            "{} blank fields are sent as-is: {}",
            style("note:").yellow(),
            missing.join(", ")
        );
    }

    run(config, tool, inputs, options).await
}

/// Run one analysis, print it, and optionally save it.
pub async fn run(
    config: &Config,
    tool: &'static ToolDefinition,
    inputs: Inputs,
    options: RunOptions,
) -> Result<()> {
    let analyzer = Analyzer::from_config(config);
    if !options.json {
        eprintln!("Analyzing with {}...", style(tool.name).cyan());
    }

    let result = analyzer.analyze(tool, &inputs).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::result(tool.chart_hint, &result));
    }

    if options.save {
        let store = open_report_store(&config.storage)?;
        let saved = store.save(NewReport::new(tool, inputs, result))?;
        info!(id = %saved.id, "Report saved");
        if !options.json {
            println!();
            println!("Saved report {}", style(&saved.id).green());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use venture_analysis::InputValue;

    #[test]
    fn test_inputs_from_args() {
        let tool = lookup_tool("berkus").unwrap();
        let args = vec!["idea_val=Drone defense".to_string(), "max_val=750000".to_string()];
        let inputs = inputs_from_args(tool, &args, false).unwrap();
        assert_eq!(inputs["idea_val"], InputValue::Text("Drone defense".into()));
        assert_eq!(inputs["max_val"], InputValue::Number(750_000.0));
    }

    #[test]
    fn test_defaults_flag_seeds_values() {
        let tool = lookup_tool("berkus").unwrap();
        let inputs = inputs_from_args(tool, &[], true).unwrap();
        assert_eq!(inputs["max_val"], InputValue::Number(500_000.0));
    }

    #[test]
    fn test_bad_assignment_is_rejected() {
        let tool = lookup_tool("dcf").unwrap();
        let err = inputs_from_args(tool, &["wacc".to_string()], false).unwrap_err();
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }

    #[test]
    fn test_unknown_tool() {
        let err = lookup_tool("tarot").unwrap_err();
        assert!(err.to_string().contains("venture tools"));
    }
}
