//! Command context: config resolution, gateway/store construction, and the
//! shared fetch-with-offline-fallback path

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use spend_ledger_core::cache::CacheStore;
use spend_ledger_core::config::{Config, ConfigOverrides, OutputFormat, resolve_config};
use spend_ledger_core::gateway::{Gateway, Scope};
use spend_ledger_core::home;
use spend_ledger_core::provider::SpendingProvider;
use spend_ledger_core::schema::SpendingRecord;
use std::path::PathBuf;
use tracing::debug;

/// Everything a command needs to talk to the gateway and the cache
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    /// Resolved home directory
    pub home_dir: PathBuf,
}

impl AppContext {
    /// Resolve config relative to the current directory and home.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let home_dir = home::get_home_dir()?;
        let current_dir = std::env::current_dir()?;
        let config = resolve_config(overrides, &current_dir, &home_dir)?;
        Ok(Self { config, home_dir })
    }

    /// The configured identity email.
    ///
    /// # Errors
    ///
    /// Bails when no email is configured; every gateway interaction needs
    /// an owner identity.
    pub fn require_email(&self) -> Result<String> {
        let email = self.config.core.email.trim();
        if email.is_empty() {
            anyhow::bail!(
                "No identity email configured (set SL_EMAIL or [core] email in config.toml)"
            );
        }
        Ok(email.to_string())
    }

    /// A gateway client for the configured base URL.
    pub fn gateway(&self) -> Result<Gateway> {
        Gateway::new(&self.config.gateway).context("Could not build gateway client")
    }

    /// Whether a command should emit JSON: its `--json` flag, or the
    /// configured default output format.
    pub fn json_output(&self, flag: bool) -> bool {
        flag || self.config.display.format == OutputFormat::Json
    }

    /// The offline cache store, unless disabled by config.
    pub fn store(&self) -> Option<CacheStore> {
        if self.config.cache.disabled {
            return None;
        }
        Some(CacheStore::new(
            self.home_dir.join(".spend-ledger/cache"),
        ))
    }

    /// The scope a command runs under: an explicit `--group` wins, then the
    /// configured default group, then the personal scope.
    pub fn resolve_scope(&self, group_flag: Option<&str>) -> Result<Scope> {
        let group = group_flag
            .map(str::to_string)
            .unwrap_or_else(|| self.config.core.default_group.clone());
        if group.is_empty() {
            Ok(Scope::Personal {
                email: self.require_email()?,
            })
        } else {
            Ok(Scope::Group { id: group })
        }
    }

    /// Fetch one month of records for a scope, falling back to the offline
    /// cache when the gateway is unreachable.
    ///
    /// Returns the records and whether they are fresh (`false` = served
    /// from cache). The fallback only engages when the cache actually held
    /// something; with neither gateway nor cache the command fails.
    pub fn month_records(
        &self,
        scope: &Scope,
        year: i32,
        month: u32,
    ) -> Result<(Vec<SpendingRecord>, bool)> {
        let gateway = self.gateway()?;
        let provider = SpendingProvider::new(gateway, self.store());
        let hydrated = provider.hydrate();

        let window = spend_ledger_core::dates::month_window(year, month)
            .with_context(|| format!("Invalid month: {year}-{month}"))?;

        match provider.sync(scope, Some((window.0.as_str(), window.1.as_str()))) {
            Ok(_) => Ok((provider.records(), true)),
            Err(e) => {
                debug!("Gateway refresh failed: {e}");
                if hydrated {
                    eprintln!("Warning: gateway unreachable; showing cached data");
                    Ok((provider.records(), false))
                } else {
                    anyhow::bail!(
                        "Could not load records (gateway unreachable and no cache; \
                         run with SL_LOG=debug for details)"
                    )
                }
            }
        }
    }
}

/// `(year, month)` for a command's date flags, defaulting to the current
/// local month.
pub fn resolve_month(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    let today = Local::now().date_naive();
    (
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn context_with(email: &str, default_group: &str) -> AppContext {
        let mut config = Config::default();
        config.core.email = email.to_string();
        config.core.default_group = default_group.to_string();
        AppContext {
            config,
            home_dir: PathBuf::from("/tmp"),
        }
    }

    #[test]
    #[serial]
    fn test_require_email_missing() {
        let ctx = context_with("", "");
        assert!(ctx.require_email().is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_scope_personal_by_default() {
        let ctx = context_with("ana@example.com", "");
        let scope = ctx.resolve_scope(None).unwrap();
        assert_eq!(scope.cache_key(), "user:ana@example.com");
    }

    #[test]
    #[serial]
    fn test_resolve_scope_flag_beats_config_default() {
        let ctx = context_with("ana@example.com", "grp-default");
        assert_eq!(
            ctx.resolve_scope(None).unwrap().cache_key(),
            "group:grp-default"
        );
        assert_eq!(
            ctx.resolve_scope(Some("grp-flag")).unwrap().cache_key(),
            "group:grp-flag"
        );
    }

    #[test]
    #[serial]
    fn test_resolve_month_defaults_to_today() {
        let (year, month) = resolve_month(None, None);
        let today = Local::now().date_naive();
        assert_eq!(year, today.year());
        assert_eq!(month, today.month());

        assert_eq!(resolve_month(Some(2024), Some(2)), (2024, 2));
    }

    #[test]
    #[serial]
    fn test_store_disabled_by_config() {
        let mut ctx = context_with("ana@example.com", "");
        assert!(ctx.store().is_some());
        ctx.config.cache.disabled = true;
        assert!(ctx.store().is_none());
    }
}
