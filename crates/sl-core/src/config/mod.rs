//! Configuration resolution
//!
//! Resolves configuration from multiple sources with priority:
//! 1. Command-line flags (passed as parameters)
//! 2. Environment variables
//! 3. Project-local config (.sl.toml)
//! 4. Global config (~/.config/spend-ledger/config.toml)
//! 5. Defaults

mod types;

pub use types::{CacheConfig, Config, CoreConfig, DisplayConfig, GatewayConfig, OutputFormat};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Command-line overrides for configuration
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Override identity email
    pub email: Option<String>,
    /// Override default group scope
    pub group: Option<String>,
    /// Override output format
    pub format: Option<OutputFormat>,
    /// Override gateway base URL
    pub gateway_url: Option<String>,
}

/// Resolve configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Command-line overrides
/// 2. Environment variables (`SL_EMAIL`, `SL_GATEWAY_URL`, `SL_GROUP`)
/// 3. Project-local config (.sl.toml in current dir or a parent up to git root)
/// 4. Global config (~/.config/spend-ledger/config.toml)
/// 5. Defaults
pub fn resolve_config(
    overrides: &ConfigOverrides,
    current_dir: &Path,
    home_dir: &Path,
) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    // 4. Try global config
    let global_config_path = home_dir.join(".config/spend-ledger/config.toml");
    if global_config_path.exists() {
        if let Ok(file_config) = load_config_file(&global_config_path) {
            merge_config(&mut config, file_config);
        } else {
            warn!("Failed to parse global config at {global_config_path:?}");
        }
    }

    // 3. Try project-local config (current dir or git root)
    if let Some(local_config) = find_project_local_config(current_dir) {
        if let Ok(file_config) = load_config_file(&local_config) {
            merge_config(&mut config, file_config);
        } else {
            warn!("Failed to parse project config at {local_config:?}");
        }
    }

    // 2. Apply environment variables
    apply_env_overrides(&mut config);

    // 1. Apply command-line overrides
    apply_cli_overrides(&mut config, overrides);

    Ok(config)
}

/// Find a project-local config file
///
/// Searches current directory and parent directories up to git root
fn find_project_local_config(current_dir: &Path) -> Option<PathBuf> {
    let mut dir = current_dir;

    loop {
        let config_path = dir.join(".sl.toml");
        if config_path.exists() {
            return Some(config_path);
        }

        // Stop at git root
        if dir.join(".git").exists() {
            break;
        }

        dir = dir.parent()?;
    }

    None
}

/// Load config from a TOML file
fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

/// Merge file config into base config
fn merge_config(base: &mut Config, file: Config) {
    if !file.core.email.is_empty() {
        base.core.email = file.core.email;
    }
    if !file.core.default_group.is_empty() {
        base.core.default_group = file.core.default_group;
    }

    base.display = file.display;
    base.gateway = file.gateway;
    base.cache = file.cache;
}

/// Apply environment variable overrides
fn apply_env_overrides(config: &mut Config) {
    if let Ok(email) = std::env::var("SL_EMAIL") {
        config.core.email = email;
    }

    if let Ok(group) = std::env::var("SL_GROUP") {
        config.core.default_group = group;
    }

    if let Ok(url) = std::env::var("SL_GATEWAY_URL") {
        config.gateway.base_url = url;
    }
}

/// Apply command-line overrides
fn apply_cli_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(ref email) = overrides.email {
        config.core.email = email.clone();
    }

    if let Some(ref group) = overrides.group {
        config.core.default_group = group.clone();
    }

    if let Some(format) = overrides.format {
        config.display.format = format;
    }

    if let Some(ref url) = overrides.gateway_url {
        config.gateway.base_url = url.clone();
    }
}
