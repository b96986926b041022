//! Sync command: force-refresh the offline cache

use anyhow::Result;
use clap::Args;
use spend_ledger_core::config::ConfigOverrides;
use spend_ledger_core::dates::month_window;
use spend_ledger_core::provider::{GroupProvider, SpendingProvider, SyncOutcome, UserConfigProvider};
use tracing::debug;

use crate::commands::budget::default_name;
use crate::util::settings::{AppContext, resolve_month};

/// Force-refresh the offline cache from the gateway
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Group scope for the record snapshot (default: configured, else personal)
    #[arg(long)]
    group: Option<String>,

    /// Year of the record window (default: current)
    #[arg(long)]
    year: Option<i32>,

    /// Month of the record window, 1-12 (default: current)
    #[arg(long)]
    month: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the sync command
pub fn execute(args: SyncArgs) -> Result<()> {
    let ctx = AppContext::load(&ConfigOverrides::default())?;
    let email = ctx.require_email()?;
    let scope = ctx.resolve_scope(args.group.as_deref())?;
    let (year, month) = resolve_month(args.year, args.month);
    let window = month_window(year, month)
        .ok_or_else(|| anyhow::anyhow!("Invalid month: {year}-{month}"))?;

    let gateway = ctx.gateway()?;

    // Records
    let records = SpendingProvider::new(gateway.clone(), ctx.store());
    let record_count = match records.sync(&scope, Some((window.0.as_str(), window.1.as_str()))) {
        Ok(SyncOutcome::Refreshed { count, mirrored }) => {
            if !mirrored {
                eprintln!("Warning: records were fetched but the cache mirror failed");
            }
            count
        }
        Ok(SyncOutcome::Superseded) => 0,
        Err(e) => {
            debug!("Record refresh failed: {e}");
            anyhow::bail!(
                "Could not refresh records (gateway error; run with SL_LOG=debug for details)"
            );
        }
    };

    // Profile
    let users = UserConfigProvider::new(gateway.clone(), ctx.store());
    let profile = match users.ensure_user(&default_name(&email), &email) {
        Ok(profile) => profile,
        Err(e) => {
            debug!("Profile refresh failed: {e}");
            anyhow::bail!(
                "Could not refresh the profile (gateway error; run with SL_LOG=debug for details)"
            );
        }
    };

    // Groups
    let groups = GroupProvider::new(gateway, ctx.store());
    let group_count = match groups.sync(&profile.groups) {
        Ok(groups) => groups.len(),
        Err(e) => {
            debug!("Group refresh failed: {e}");
            anyhow::bail!(
                "Could not refresh groups (gateway error; run with SL_LOG=debug for details)"
            );
        }
    };

    if ctx.json_output(args.json) {
        let output = serde_json::json!({
            "scope": scope.cache_key(),
            "year": year,
            "month": month,
            "records": record_count,
            "groups": group_count,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Synced {} ({year}-{month:02}): {record_count} records, {group_count} groups, profile {}",
            scope.cache_key(),
            profile.email,
        );
    }

    Ok(())
}
