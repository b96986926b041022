//! List command: browse records with view filters

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use spend_ledger_core::config::ConfigOverrides;
use spend_ledger_core::dates::{self, DateFilter};
use spend_ledger_core::provider::RecordFilter;
use spend_ledger_core::schema::{Necessity, SpendingKind, SpendingRecord};

use crate::commands::add::KindArg;
use crate::util::format::money;
use crate::util::settings::{AppContext, resolve_month};

/// List records for a scope and date filter
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Group scope (default: configured group, else personal)
    #[arg(long)]
    group: Option<String>,

    /// Only records owned by this member email
    #[arg(long)]
    member: Option<String>,

    /// Year of the window (default: current)
    #[arg(long)]
    year: Option<i32>,

    /// Month of the window, 1-12 (default: current)
    #[arg(long)]
    month: Option<u32>,

    /// Narrow to a single day of the month, 1-31
    #[arg(long)]
    day: Option<u32>,

    /// Only records of this kind
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Only discretionary records
    #[arg(long, conflicts_with = "need")]
    want: bool,

    /// Only necessary records
    #[arg(long, conflicts_with = "want")]
    need: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the list command
pub fn execute(args: ListArgs) -> Result<()> {
    let ctx = AppContext::load(&ConfigOverrides::default())?;
    let scope = ctx.resolve_scope(args.group.as_deref())?;
    let (year, month) = resolve_month(args.year, args.month);

    let (records, fresh) = ctx.month_records(&scope, year, month)?;

    let (anchor, granularity) = match args.day {
        Some(day) => (
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| anyhow::anyhow!("Invalid day: {year}-{month}-{day}"))?,
            DateFilter::Day,
        ),
        None => (
            NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| anyhow::anyhow!("Invalid month: {year}-{month}"))?,
            DateFilter::Month,
        ),
    };

    let filter = RecordFilter {
        member_email: args.member.as_deref(),
        scope: Some(&scope),
        anchor: Some((anchor, granularity)),
        kind: args.kind.map(SpendingKind::from),
        necessity: if args.want {
            Some(Necessity::NotNeed)
        } else if args.need {
            Some(Necessity::Need)
        } else {
            None
        },
    };
    let filtered: Vec<SpendingRecord> = records.iter().filter(|r| filter.matches(r)).cloned().collect();

    if ctx.json_output(args.json) {
        let output = serde_json::json!({
            "scope": scope.cache_key(),
            "fresh": fresh,
            "records": filtered,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if filtered.is_empty() {
        println!("No records for {year}-{month:02}");
        return Ok(());
    }

    let currency = &ctx.config.display.currency;
    let mut total_income = 0.0;
    let mut total_outcome = 0.0;
    for record in &filtered {
        let marker = match (record.kind, record.necessity) {
            (SpendingKind::Income, _) => "+",
            (_, Necessity::Need) => " ",
            (_, Necessity::NotNeed) => "*",
        };
        match record.kind {
            SpendingKind::Income => total_income += record.amount,
            SpendingKind::Outcome => total_outcome += record.amount,
        }
        println!(
            "{:>5} {} {:<13} {:>12} {:<24} {}",
            dates::format_short(&record.date),
            marker,
            record.category,
            format!("{currency}{}", money(record.amount)),
            record.description,
            record.id,
        );
    }
    println!(
        "Total: income {currency}{} / outcome {currency}{} ({} records; * = discretionary)",
        money(total_income),
        money(total_outcome),
        filtered.len(),
    );

    Ok(())
}
