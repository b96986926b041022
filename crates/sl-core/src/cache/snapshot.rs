//! Checksummed snapshot files
//!
//! Every cache file is a small envelope around a JSON payload:
//!
//! ```json
//! {
//!   "fetchedAt": "2025-06-03T14:30:00Z",
//!   "checksum": "<blake3 hex of the serialized payload>",
//!   "data": { ... }
//! }
//! ```
//!
//! The checksum lets hydration reject a torn or hand-edited file instead of
//! adopting bad records. There is no merge protocol: a write replaces the
//! whole file (last write wins), so the atomicity needed is only
//! write-temp/fsync/rename under the cache lock.

use crate::cache::error::CacheError;
use crate::cache::lock::acquire_lock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;

const LOCK_RETRIES: u32 = 5;

/// Compute the BLAKE3 hex digest of serialized payload bytes.
pub fn compute_checksum(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

/// Atomically write `payload` to `path` inside a checksummed envelope.
///
/// Takes the sibling `.lock` file, writes to a `.tmp` sibling with fsync,
/// then renames over the destination.
pub fn write_snapshot<T: Serialize>(path: &Path, payload: &T) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CacheError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let lock_path = path.with_extension("lock");
    let tmp_path = path.with_extension("tmp");
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

    let data = serde_json::to_value(payload).map_err(|e| CacheError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    let data_bytes = serde_json::to_vec(&data).map_err(|e| CacheError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    let envelope = serde_json::json!({
        "fetchedAt": chrono::Utc::now().to_rfc3339(),
        "checksum": compute_checksum(&data_bytes),
        "data": data,
    });
    let content = serde_json::to_vec_pretty(&envelope).map_err(|e| CacheError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    {
        let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        tmp_file.write_all(&content).map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        tmp_file.sync_all().map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
    }

    fs::rename(&tmp_path, path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Read a checksummed envelope back into its payload.
///
/// # Errors
///
/// Returns `Io` when the file cannot be read, `Json` when the envelope or
/// payload does not parse, and `ChecksumMismatch` when the stored digest
/// does not cover the stored payload.
pub fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let content = fs::read(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let envelope: serde_json::Value =
        serde_json::from_slice(&content).map_err(|e| CacheError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    let stored_checksum = envelope
        .get("checksum")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let data = envelope
        .get("data")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    // Re-serialize the raw value (order preserved) to verify the digest
    let data_bytes = serde_json::to_vec(&data).map_err(|e| CacheError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    if compute_checksum(&data_bytes) != stored_checksum {
        return Err(CacheError::ChecksumMismatch {
            path: path.to_path_buf(),
        });
    }

    serde_json::from_value(data).map_err(|e| CacheError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}
