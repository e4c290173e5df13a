#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use venture_analysis::{tools, tools_in_category, ToolCategory};
use venture_common::logging::init_logging;
use venture_common::util::redact_secret;
use venture_common::Config;

mod analyze;
mod render;
mod reports;

/// `venture` - startup valuation analyses grounded in live market research.
#[derive(Parser, Debug)]
#[command(name = "venture")]
#[command(version)]
#[command(about = "Run startup valuation methods through a research-grounded analyst.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.ventureswords/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List valuation methods
    Tools {
        /// Only show one category (financial, market, team, product)
        #[arg(long)]
        category: Option<ToolCategory>,
    },

    /// Show a method's description and input form
    Tool {
        /// Tool id, e.g. berkus
        id: String,
    },

    /// Run a valuation method
    Analyze {
        /// Tool id, e.g. berkus
        id: String,

        /// Form value as KEY=VALUE (repeatable)
        #[arg(short = 'i', long = "input", value_name = "KEY=VALUE")]
        inputs: Vec<String>,

        /// Start from each field's default value
        #[arg(long)]
        defaults: bool,

        /// Save the report after a successful run
        #[arg(long)]
        save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage saved reports
    Reports {
        #[command(subcommand)]
        reports_command: ReportCommands,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        config_command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommands {
    /// List saved reports, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one saved report
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete one saved report
    Delete { id: String },
    /// Delete every saved report
    Clear,
    /// Run a saved report's tool again with the same inputs
    Rerun {
        id: String,
        /// Save the new result as a separate report
        #[arg(long)]
        save: bool,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration with the credential masked
    Show,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env_overrides();
    Ok(config)
}

fn show_config(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    shown.secrets.gemini = config.gemini_api_key().map(redact_secret);
    println!("{}", serde_json::to_string_pretty(&shown)?);
    if config.gemini_api_key().is_none() {
        eprintln!("No credential configured: set API_KEY or GEMINI_API_KEY.");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_logging(&config.observability.log_level, &config.observability.log_format);

    match cli.command {
        Commands::Tools { category } => {
            let listing = match category {
                Some(category) => render::tool_list(tools_in_category(category)),
                None => render::tool_list(tools()),
            };
            print!("{listing}");
            Ok(())
        }

        Commands::Tool { id } => {
            let tool = analyze::lookup_tool(&id)?;
            print!("{}", render::tool_detail(tool));
            Ok(())
        }

        Commands::Analyze {
            id,
            inputs,
            defaults,
            save,
            json,
        } => {
            analyze::handle_command(&config, &id, &inputs, defaults, analyze::RunOptions { save, json })
                .await
        }

        Commands::Reports { reports_command } => {
            reports::handle_command(reports_command, &config).await
        }

        Commands::Config { config_command } => match config_command {
            ConfigCommands::Show => show_config(&config),
        },
    }
}
