//! Canonical home directory resolution for spend-ledger
//!
//! Provides a single source of truth for home directory resolution across
//! both sl crates. The `SL_HOME` environment variable supports custom
//! deployments and, above all, tests: integration tests pin it to a tempdir
//! so cache and config reads never touch the real home.
//!
//! # Precedence
//!
//! 1. `SL_HOME` environment variable (if set and non-empty)
//! 2. `dirs::home_dir()` platform default

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the home directory for spend-ledger operations.
///
/// # Errors
///
/// Returns an error if `SL_HOME` is not set and the platform home directory
/// cannot be determined via `dirs::home_dir()`.
pub fn get_home_dir() -> Result<PathBuf> {
    // Check SL_HOME first (useful for testing and custom deployments)
    if let Ok(home) = std::env::var("SL_HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    dirs::home_dir().context("Could not determine home directory")
}
