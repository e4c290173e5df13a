//! Configuration management for VentureSwords.
//!
//! Configuration lives in a single file at `~/.ventureswords/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! ## Credential (→ secrets.gemini, first non-empty wins)
//! - `API_KEY`
//! - `GEMINI_API_KEY`
//! - `GOOGLE_API_KEY`
//!
//! ## Overrides
//! - `VENTURE_MODEL` → llm.model
//! - `VENTURE_GEMINI_BASE_URL` → llm.base_url
//! - `VENTURE_STORAGE_BACKEND` → storage.backend
//! - `VENTURE_STORAGE_PATH` → storage.path
//! - `VENTURE_LOG_LEVEL` → observability.log_level
//! - `VENTURE_LOG_FORMAT` → observability.log_format

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables consulted for the remote credential, in priority order.
pub const CREDENTIAL_ENV_VARS: &[&str] = &["API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".ventureswords"),
        |dirs| dirs.home_dir().join(".ventureswords"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Secrets
// ============================================================================

/// Credentials for remote services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// Gemini API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
}

// ============================================================================
// LLM
// ============================================================================

/// Remote generative model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model selector sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL (without the `/models/...` suffix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Enable the search-augmentation tool on requests
    #[serde(default = "default_true")]
    pub web_search: bool,

    /// Sampling temperature; the endpoint default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            web_search: true,
            temperature: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

// ============================================================================
// Analysis prompt context
// ============================================================================

/// Who the analyst works for and which market the benchmarks target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Firm the analyst persona works for
    #[serde(default = "default_firm")]
    pub firm: String,

    /// Primary jurisdiction for benchmarks and regulation
    #[serde(default = "default_market")]
    pub market: String,

    /// Wider region used when local data is thin
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            firm: default_firm(),
            market: default_market(),
            region: default_region(),
        }
    }
}

fn default_firm() -> String {
    "VentureSwords".into()
}

fn default_market() -> String {
    "Saudi Arabia (KSA)".into()
}

fn default_region() -> String {
    "MENA".into()
}

// ============================================================================
// Storage
// ============================================================================

/// Storage backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single-table SQLite key-value store
    #[default]
    Sqlite,
    /// One JSON file per key
    File,
    /// Process-local, lost on exit
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("Unknown storage backend: {other}")),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Local report storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file (sqlite) or directory (file); defaults under the config dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Fixed key under which the report list is stored
    #[serde(default = "default_namespace_key")]
    pub namespace_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            namespace_key: default_namespace_key(),
        }
    }
}

fn default_namespace_key() -> String {
    "ventureswords_mission_logs_v1".into()
}

impl StorageConfig {
    /// Resolve the on-disk location for the configured backend.
    ///
    /// `~` is expanded; without an explicit path the location sits in the config dir.
    pub fn resolved_path(&self) -> PathBuf {
        match self.path {
            Some(ref p) => PathBuf::from(shellexpand::tilde(p).into_owned()),
            None => match self.backend {
                StorageBackend::File => config_dir().join("store"),
                _ => config_dir().join("reports.db"),
            },
        }
    }
}

// ============================================================================
// Observability
// ============================================================================

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub secrets: SecretsConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply process environment overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides using an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = CREDENTIAL_ENV_VARS.iter().find_map(|&name| non_empty(name)) {
            self.secrets.gemini = Some(key);
        }

        if let Some(model) = non_empty("VENTURE_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = non_empty("VENTURE_GEMINI_BASE_URL") {
            self.llm.base_url = url;
        }

        if let Some(backend) = non_empty("VENTURE_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(b) => self.storage.backend = b,
                Err(e) => tracing::warn!("Ignoring VENTURE_STORAGE_BACKEND: {e}"),
            }
        }
        if let Some(path) = non_empty("VENTURE_STORAGE_PATH") {
            self.storage.path = Some(path);
        }

        if let Some(level) = non_empty("VENTURE_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = non_empty("VENTURE_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create config directory {}", dir.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// The configured credential, treating blank values as missing.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.secrets
            .gemini
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
