//! Venture Analysis - valuation tools and the analysis request adapter.
//!
//! - [`catalog`]: the static list of valuation methods and their forms
//! - [`prompt`]: builds the instruction block for one tool and its inputs
//! - [`parse`]: unfences and reads the model reply with per-field defaults
//! - [`Analyzer`]: runs one request end to end

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analyzer;
pub mod catalog;
pub mod error;
pub mod form;
pub mod parse;
pub mod prompt;
pub mod types;

pub use analyzer::{Analyzer, AnalyzerOptions};
pub use catalog::{find_tool, tools, tools_in_category};
pub use error::AnalysisError;
pub use prompt::PromptContext;
pub use types::{
    AnalysisResult, ChartHint, ChartPoint, GroundingSource, InputKind, InputValue, Inputs,
    KeyMetric, MetricStatus, MetricValue, ToolCategory, ToolDefinition, ToolInput,
};
