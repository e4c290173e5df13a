//! The local report store.
//!
//! Every saved report lives in one JSON array under a fixed namespace key,
//! newest first. The store is the only writer of that key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use venture_analysis::{find_tool, AnalysisResult, Inputs, ToolDefinition};
use venture_common::{Error, Result};

use crate::traits::Storage;

/// Namespace key used when none is configured.
pub const DEFAULT_NAMESPACE_KEY: &str = "ventureswords_mission_logs_v1";

/// A report to be saved. The store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub tool_id: String,
    pub tool_name: String,
    pub inputs: Inputs,
    pub result: AnalysisResult,
}

impl NewReport {
    pub fn new(tool: &ToolDefinition, inputs: Inputs, result: AnalysisResult) -> Self {
        Self {
            tool_id: tool.id.to_string(),
            tool_name: tool.name.to_string(),
            inputs,
            result,
        }
    }
}

/// A persisted report. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub id: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
    pub tool_id: String,
    pub tool_name: String,
    pub inputs: Inputs,
    pub result: AnalysisResult,
}

impl SavedReport {
    /// Resolve the originating tool in the catalog.
    ///
    /// The reference is by id only; a tool that no longer exists yields
    /// [`Error::NotFound`].
    pub fn tool(&self) -> Result<&'static ToolDefinition> {
        find_tool(&self.tool_id)
            .ok_or_else(|| Error::NotFound(format!("tool not available: {}", self.tool_id)))
    }

    /// Creation time as a UTC datetime.
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Durable log of saved reports over an injected [`Storage`].
pub struct ReportStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl ReportStore {
    pub fn new(storage: Arc<dyn Storage>, namespace_key: impl Into<String>) -> Self {
        Self {
            storage,
            key: namespace_key.into(),
        }
    }

    pub fn with_default_key(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, DEFAULT_NAMESPACE_KEY)
    }

    pub fn namespace_key(&self) -> &str {
        &self.key
    }

    /// Read the stored list. Backend errors propagate; absent or unparseable
    /// data reads as empty.
    fn load(&self) -> Result<Vec<SavedReport>> {
        let raw = match self.storage.get_item(&self.key).map_err(as_persistence)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(reports) => Ok(reports),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored reports are corrupt; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn store(&self, reports: &[SavedReport]) -> Result<()> {
        let json = serde_json::to_string(reports)?;
        self.storage.set_item(&self.key, &json).map_err(|e| {
            error!(backend = self.storage.name(), key = %self.key, error = %e, "Failed to write reports");
            as_persistence(e)
        })
    }

    /// Save a report, returning it with its generated id and timestamp.
    ///
    /// The new report is placed first. A backend read failure is returned
    /// rather than overwriting the existing list.
    pub fn save(&self, report: NewReport) -> Result<SavedReport> {
        let mut reports = self.load()?;

        let saved = SavedReport {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            tool_id: report.tool_id,
            tool_name: report.tool_name,
            inputs: report.inputs,
            result: report.result,
        };
        reports.insert(0, saved.clone());
        self.store(&reports)?;

        debug!(id = %saved.id, tool = %saved.tool_id, total = reports.len(), "Report saved");
        Ok(saved)
    }

    /// All saved reports, newest first. Read failures yield an empty list.
    pub fn get_all(&self) -> Vec<SavedReport> {
        self.load().unwrap_or_else(|e| {
            warn!(backend = self.storage.name(), error = %e, "Failed to read reports");
            Vec::new()
        })
    }

    /// One report by id.
    pub fn get(&self, id: &str) -> Option<SavedReport> {
        self.get_all().into_iter().find(|r| r.id == id)
    }

    /// Remove the report with `id` and rewrite the rest.
    ///
    /// Returns whether a report was removed; an unknown id leaves the stored
    /// reports unchanged. A backend read failure is returned without writing.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut reports = self.load()?;
        let before = reports.len();
        reports.retain(|r| r.id != id);
        self.store(&reports)?;
        Ok(reports.len() != before)
    }

    /// Remove the namespace key entirely.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key).map_err(|e| {
            error!(backend = self.storage.name(), key = %self.key, error = %e, "Failed to clear reports");
            as_persistence(e)
        })
    }
}

fn as_persistence(err: Error) -> Error {
    if err.is_persistence() {
        err
    } else {
        Error::Persistence(err.to_string())
    }
}
