//! Add command: record an income or outcome (insert or edit)

use anyhow::Result;
use chrono::Local;
use clap::{Args, ValueEnum};
use spend_ledger_core::config::ConfigOverrides;
use spend_ledger_core::dates;
use spend_ledger_core::schema::{Necessity, SpendingKind, SpendingRecord};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::util::format::money;
use crate::util::settings::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Income,
    Outcome,
}

impl From<KindArg> for SpendingKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Income => SpendingKind::Income,
            KindArg::Outcome => SpendingKind::Outcome,
        }
    }
}

/// Record an income or outcome
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Amount in the ledger currency
    amount: f64,

    /// Free-text description
    description: Option<String>,

    /// Category code (e.g. food, transport, salary)
    #[arg(long, default_value = "other")]
    category: String,

    /// Direction of the record
    #[arg(long, value_enum, default_value = "outcome")]
    kind: KindArg,

    /// Mark as a discretionary (non-necessary) expense
    #[arg(long)]
    want: bool,

    /// Date of the transaction (YYYY-MM-DD; default today)
    #[arg(long)]
    date: Option<String>,

    /// Record into a group instead of the personal ledger
    #[arg(long)]
    group: Option<String>,

    /// Edit an existing record instead of inserting a new one
    #[arg(long)]
    id: Option<String>,

    /// Override identity email
    #[arg(long)]
    email: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Show what would be written without actually writing
    #[arg(long)]
    dry_run: bool,
}

/// Execute the add command
pub fn execute(args: AddArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        email: args.email.clone(),
        ..Default::default()
    };
    let ctx = AppContext::load(&overrides)?;
    let email = ctx.require_email()?;

    let date = match args.date.as_deref() {
        Some(raw) => {
            let parsed = dates::parse_date(raw)
                .ok_or_else(|| anyhow::anyhow!("Unrecognized date: {raw} (expected YYYY-MM-DD)"))?;
            format!("{}T00:00:00Z", parsed.format("%Y-%m-%d"))
        }
        None => format!(
            "{}T00:00:00Z",
            Local::now().date_naive().format("%Y-%m-%d")
        ),
    };

    let group_id = args
        .group
        .clone()
        .or_else(|| {
            let default = ctx.config.core.default_group.clone();
            (!default.is_empty()).then_some(default)
        })
        .filter(|g| !g.is_empty());

    let record = SpendingRecord {
        id: args
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        user_token: email,
        kind: args.kind.into(),
        necessity: if args.want {
            Necessity::NotNeed
        } else {
            Necessity::Need
        },
        category: args.category.clone(),
        description: args.description.clone().unwrap_or_default(),
        amount: args.amount,
        date,
        group_id,
        unknown_fields: HashMap::new(),
    };

    if args.dry_run {
        if args.json {
            let output = serde_json::json!({
                "action": "add",
                "record": record,
                "dry_run": true,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Dry run - would upsert record:");
            println!("  {} {} ({})", record.kind.as_str(), money(record.amount), record.category);
            println!("  date: {}", dates::format_full(&record.date));
            if let Some(ref group) = record.group_id {
                println!("  group: {group}");
            }
        }
        return Ok(());
    }

    let gateway = ctx.gateway()?;
    if let Err(e) = gateway.put_record(&record) {
        debug!("PUT /items failed: {e}");
        anyhow::bail!("Could not save the record (gateway error; run with SL_LOG=debug for details)");
    }

    // Refresh the cached snapshot for the month the record landed in, the
    // way the UI re-queried after every mutation. Best-effort: the record
    // is already saved.
    refresh_after_mutation(&ctx, record.group_id.as_deref(), &record.date);

    if args.json {
        let output = serde_json::json!({
            "action": "add",
            "id": record.id,
            "kind": record.kind.as_str(),
            "amount": record.amount,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let verb = if args.id.is_some() { "Updated" } else { "Recorded" };
        println!(
            "{verb} {} {}{} ({}) on {}",
            record.kind.as_str(),
            ctx.config.display.currency,
            money(record.amount),
            record.category,
            dates::format_full(&record.date),
        );
    }

    Ok(())
}

/// Re-fetch the month window containing `date` so the offline cache
/// reflects the mutation. Failures only log.
pub(crate) fn refresh_after_mutation(ctx: &AppContext, group: Option<&str>, date: &str) {
    use chrono::Datelike;
    use spend_ledger_core::gateway::Scope;
    use spend_ledger_core::provider::SpendingProvider;

    let Some(parsed) = dates::parse_date(date) else {
        return;
    };
    // The record's own group tag decides the scope here; the configured
    // default group must not leak into a personal mutation.
    let scope = match group {
        Some(id) => Scope::Group { id: id.to_string() },
        None => match ctx.require_email() {
            Ok(email) => Scope::Personal { email },
            Err(_) => return,
        },
    };
    let Ok(gateway) = ctx.gateway() else {
        return;
    };
    let Some(window) = dates::month_window(parsed.year(), parsed.month()) else {
        return;
    };

    let provider = SpendingProvider::new(gateway, ctx.store());
    if let Err(e) = provider.sync(&scope, Some((window.0.as_str(), window.1.as_str()))) {
        debug!("Post-mutation refresh failed: {e}");
    }
}
