//! Venture Common - Shared configuration, errors, and logging for VentureSwords.
//!
//! This crate provides:
//! - Configuration types and loading (file + environment)
//! - Error types and handling utilities
//! - Logging setup
//! - Small utilities for log hygiene and display

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;

pub use config::{
    AnalysisConfig, Config, LlmConfig, ObservabilityConfig, SecretsConfig, StorageBackend,
    StorageConfig,
};
pub use error::{Error, Result, ResultExt};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, StorageBackend, StorageConfig};
    pub use crate::error::{Error, Result, ResultExt};
    pub use crate::logging::init_logging;
}
