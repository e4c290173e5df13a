//! `venture reports` subcommands.

use anyhow::{bail, Result};
use venture_common::Config;
use venture_memory::{open_report_store, ReportStore};

use crate::analyze::{self, RunOptions};
use crate::render;
use crate::ReportCommands;

pub async fn handle_command(cmd: ReportCommands, config: &Config) -> Result<()> {
    let store = open_report_store(&config.storage)?;

    match cmd {
        ReportCommands::List { json } => list(&store, json),
        ReportCommands::Show { id, json } => show(&store, &id, json),
        ReportCommands::Delete { id } => {
            if store.delete(&id)? {
                println!("Deleted report {id}");
            } else {
                println!("No report with id {id}");
            }
            Ok(())
        }
        ReportCommands::Clear => {
            store.clear()?;
            println!("All saved reports removed.");
            Ok(())
        }
        ReportCommands::Rerun { id, save, json } => {
            let Some(report) = store.get(&id) else {
                bail!("No report with id {id}");
            };
            let tool = match report.tool() {
                Ok(tool) => tool,
                Err(_) => bail!(
                    "Tool '{}' is not available; the report can still be viewed with `venture reports show {id}`",
                    report.tool_id
                ),
            };
            analyze::run(config, tool, report.inputs, RunOptions { save, json }).await
        }
    }
}

fn list(store: &ReportStore, json: bool) -> Result<()> {
    let reports = store.get_all();
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    if reports.is_empty() {
        println!("No saved reports.");
        return Ok(());
    }
    print!("{}", render::report_list(&reports));
    Ok(())
}

fn show(store: &ReportStore, id: &str, json: bool) -> Result<()> {
    let Some(report) = store.get(id) else {
        bail!("No report with id {id}");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // The chart layout comes from the catalog; a retired tool falls back to the bar layout.
    let hint = report.tool().ok().and_then(|t| t.chart_hint);
    print!("{}", render::report_detail(&report, hint));
    Ok(())
}
