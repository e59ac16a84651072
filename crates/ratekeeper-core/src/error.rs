//! Core error types for ratekeeper-core.
//!
//! This module defines the error hierarchy using thiserror. Storage and
//! policy failures are kept separate: storage errors surface at runtime
//! and are reported to the caller, policy errors only occur at
//! configuration time. Condition evaluation itself never fails.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ratekeeper-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Policy configuration errors
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),
}

/// Storage-specific errors.
///
/// A read failure means the caller should fall back to the zero-state for
/// decision purposes but must not write over whatever is on disk. A write
/// failure is surfaced so the host can retry or log; the store never
/// retries internally.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read the persisted state
    #[error("Failed to read usage state from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the persisted state
    #[error("Failed to write usage state to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted state exists but cannot be parsed
    #[error("Failed to parse usage state: {0}")]
    ParseFailed(String),

    /// Failed to serialize the state for persistence
    #[error("Failed to serialize usage state: {0}")]
    SerializeFailed(String),

    /// Underlying key-value store reported a failure
    #[error("Key-value store error for '{key}': {message}")]
    KeyValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// Policy configuration errors.
///
/// Reported by [`PolicyBuilder::build`](crate::policy::PolicyBuilder::build),
/// never during decision evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A threshold was configured with a negative value
    #[error("Invalid value for '{field}': must not be negative, got {value}")]
    NegativeThreshold { field: &'static str, value: i64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
