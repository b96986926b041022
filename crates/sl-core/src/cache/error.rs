//! Error types for the offline cache store

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while mirroring snapshots to disk
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to acquire file lock after multiple retries
    #[error("Failed to acquire lock on {path} after {retries} retries")]
    LockTimeout { path: PathBuf, retries: u32 },

    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize or parse JSON
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Stored checksum does not match the stored payload
    #[error("Checksum mismatch in {path}")]
    ChecksumMismatch { path: PathBuf },
}
