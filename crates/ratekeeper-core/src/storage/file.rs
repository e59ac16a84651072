//! TOML file-backed state store.
//!
//! The record lives in a single small file. Saves write to a sibling
//! temporary file and rename it into place, so a concurrent reader sees
//! either the old record or the new one, never a torn write.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::StateStore;
use crate::error::StorageError;
use crate::state::UsageState;

/// State store persisting to a TOML file.
#[derive(Debug, Clone)]
pub struct TomlStateStore {
    path: PathBuf,
}

impl TomlStateStore {
    /// Use the given file path. The parent directory must already exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `~/.config/<app_name>/rating_state.toml`, creating the
    /// directory if needed.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be prepared.
    pub fn in_default_dir(app_name: &str) -> Result<Self, StorageError> {
        let dir = super::default_data_dir(app_name)?;
        Ok(Self::new(dir.join("rating_state.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for TomlStateStore {
    fn load(&self) -> Result<UsageState, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted state, using zero-state");
                return Ok(UsageState::default());
            }
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        toml::from_str(&content).map_err(|e| StorageError::ParseFailed(e.to_string()))
    }

    fn save(&self, state: &UsageState) -> Result<(), StorageError> {
        let content =
            toml::to_string(state).map_err(|e| StorageError::SerializeFailed(e.to_string()))?;

        let tmp = self.path.with_extension("toml.tmp");
        let write_err = |source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        std::fs::write(&tmp, content).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }

    fn reset(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::WriteFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
