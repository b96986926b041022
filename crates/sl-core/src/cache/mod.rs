//! Offline cache mirror for gateway data
//!
//! The cache is a best-effort local copy of the last fetched state, used to
//! hydrate the providers before any network call resolves and to serve
//! reads when the gateway is unreachable. Key properties:
//!
//! - **Atomic replace**: write-temp/fsync/rename under an advisory lock
//! - **Corruption detection**: BLAKE3 checksum over the stored payload
//! - **Last write wins**: no merge protocol between overlapping refreshes
//! - **Never load-bearing**: every load failure degrades to "no cache"
//!
//! Layout under `<home>/.spend-ledger/cache/`:
//!
//! ```text
//! records.json   last fetched record snapshot (with its scope and window)
//! profile.json   last fetched user profile
//! groups.json    last fetched group list
//! ```

pub mod error;
pub mod lock;
pub mod snapshot;

pub use error::CacheError;

use crate::schema::{Group, SpendingRecord, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The record snapshot as mirrored to disk, tagged with the query it
/// answered so hydration can tell whether it matches the requested scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRecords {
    /// Scope key: `user:<email>` or `group:<id>`
    pub scope: String,
    /// Window start (RFC 3339, inclusive)
    #[serde(rename = "windowStart")]
    pub window_start: String,
    /// Window end (RFC 3339, exclusive)
    #[serde(rename = "windowEnd")]
    pub window_end: String,
    /// The records themselves
    pub records: Vec<SpendingRecord>,
}

/// Handle to one cache directory
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// A store rooted at `dir` (usually [`crate::home::cache_dir`]).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn records_path(&self) -> PathBuf {
        self.dir.join("records.json")
    }

    fn profile_path(&self) -> PathBuf {
        self.dir.join("profile.json")
    }

    fn groups_path(&self) -> PathBuf {
        self.dir.join("groups.json")
    }

    /// Mirror a record snapshot. Errors are the caller's to downgrade.
    pub fn store_records(&self, cached: &CachedRecords) -> Result<(), CacheError> {
        snapshot::write_snapshot(&self.records_path(), cached)
    }

    /// Load the mirrored record snapshot, or `None` when there is no usable
    /// cache (missing, unparseable, or failing its checksum).
    pub fn load_records(&self) -> Option<CachedRecords> {
        load_or_none(&self.records_path())
    }

    /// Mirror the user profile.
    pub fn store_profile(&self, profile: &UserProfile) -> Result<(), CacheError> {
        snapshot::write_snapshot(&self.profile_path(), profile)
    }

    /// Load the mirrored user profile, if usable.
    pub fn load_profile(&self) -> Option<UserProfile> {
        load_or_none(&self.profile_path())
    }

    /// Mirror the group list.
    pub fn store_groups(&self, groups: &[Group]) -> Result<(), CacheError> {
        snapshot::write_snapshot(&self.groups_path(), &groups.to_vec())
    }

    /// Load the mirrored group list, if usable.
    pub fn load_groups(&self) -> Option<Vec<Group>> {
        load_or_none(&self.groups_path())
    }
}

fn load_or_none<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    match snapshot::read_snapshot(path) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("No usable cache at {path:?}: {e}");
            None
        }
    }
}
