//! Usage-state persistence.
//!
//! [`StateStore`] is the durability contract the flow controller needs:
//! `load` returns the zero-state when nothing was persisted, `save` is
//! atomic with respect to concurrent readers, `reset` restores the
//! zero-state and is idempotent. Two implementations ship with the crate:
//! a TOML file store and an adapter over any key-value store the host
//! already has.

mod file;
mod kv;

pub use file::TomlStateStore;
pub use kv::{KeyValueStore, KvStateStore, MemoryKvStore};

use std::path::PathBuf;

use crate::error::StorageError;
use crate::state::UsageState;

/// Durable store for the single [`UsageState`] record.
pub trait StateStore {
    /// Load the persisted state, or the zero-state if none exists.
    ///
    /// # Errors
    /// Returns an error if a persisted record exists but cannot be read
    /// or parsed. Callers should treat that as the zero-state for decision
    /// purposes and must not save over the existing data.
    fn load(&self) -> Result<UsageState, StorageError>;

    /// Persist the state. Completes (or fails) before returning; a reader
    /// never observes a partially written record.
    ///
    /// # Errors
    /// Returns an error if the write fails. The store does not retry.
    fn save(&self, state: &UsageState) -> Result<(), StorageError>;

    /// Restore the zero-state. Idempotent.
    ///
    /// # Errors
    /// Returns an error if the underlying deletion or write fails.
    fn reset(&self) -> Result<(), StorageError>;
}

/// Returns `~/.config/<app_name>/`, creating it if needed.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or the
/// directory cannot be created.
pub fn default_data_dir(app_name: &str) -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");
    let dir = base_dir.join(app_name);
    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
