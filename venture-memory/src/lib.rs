//! Venture Memory - durable storage for saved analysis reports.
//!
//! The [`ReportStore`] keeps every saved report in a single JSON array under
//! one namespace key, on top of a pluggable [`Storage`] backend:
//! - SQLite (`kv_store` table), the default
//! - One JSON file per key with file locking
//! - In-memory, for tests and throwaway sessions

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod file;
pub mod memory;
pub mod reports;
pub mod sqlite;
pub mod traits;

use std::sync::Arc;

use venture_common::{Result, StorageBackend, StorageConfig};

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use reports::{NewReport, ReportStore, SavedReport, DEFAULT_NAMESPACE_KEY};
pub use sqlite::SqliteStorage;
pub use traits::Storage;

/// Create the storage backend named in the configuration.
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStorage::open(&config.resolved_path())?),
        StorageBackend::File => Arc::new(FileStorage::new(&config.resolved_path())?),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    };
    tracing::debug!(backend = storage.name(), "Storage ready");
    Ok(storage)
}

/// Open the report store described by the configuration.
pub fn open_report_store(config: &StorageConfig) -> Result<ReportStore> {
    Ok(ReportStore::new(create_storage(config)?, config.namespace_key.clone()))
}
