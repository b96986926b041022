//! Remove command: delete a record by id

use anyhow::Result;
use clap::Args;
use spend_ledger_core::config::ConfigOverrides;
use tracing::debug;

use crate::util::settings::AppContext;

/// Remove a record by id
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Id of the record to remove
    id: String,

    /// The group the record lives in (for the cache refresh)
    #[arg(long)]
    group: Option<String>,

    /// Date of the removed record (YYYY-MM-DD; refreshes that month's cache)
    #[arg(long)]
    date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the remove command
pub fn execute(args: RemoveArgs) -> Result<()> {
    let ctx = AppContext::load(&ConfigOverrides::default())?;

    let gateway = ctx.gateway()?;
    if let Err(e) = gateway.delete_record(&args.id) {
        debug!("DELETE /items failed: {e}");
        anyhow::bail!(
            "Could not remove the record (gateway error; run with SL_LOG=debug for details)"
        );
    }

    if let Some(ref date) = args.date {
        super::add::refresh_after_mutation(&ctx, args.group.as_deref(), date);
    }

    if args.json {
        let output = serde_json::json!({
            "action": "remove",
            "id": args.id,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Removed record {}", args.id);
    }

    Ok(())
}
