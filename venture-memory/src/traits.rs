//! Host storage abstraction for the report store.

use venture_common::{Error, Result};

/// A string-keyed, string-valued durable store.
///
/// Mirrors the shape of browser local storage: a missing key reads as `None`
/// and removing a missing key succeeds. Implementations report failures as
/// [`Error::Persistence`].
pub trait Storage: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`. Readers see either the old or
    /// the new value, never a partial write.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Wrap a backend failure as [`Error::Persistence`].
pub(crate) fn persistence_error(action: &str, key: &str, err: impl std::fmt::Display) -> Error {
    Error::Persistence(format!("{action} '{key}': {err}"))
}
