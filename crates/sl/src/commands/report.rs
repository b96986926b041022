//! Report command: monthly aggregate breakdowns

use anyhow::Result;
use clap::Args;
use spend_ledger_core::config::ConfigOverrides;
use spend_ledger_core::report::{category_breakdown, expense_totals, round2};

use crate::util::format::{money, pct};
use crate::util::settings::{AppContext, resolve_month};

/// Aggregate breakdowns for a month
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Group scope (default: configured group, else personal)
    #[arg(long)]
    group: Option<String>,

    /// Year of the month to report (default: current)
    #[arg(long)]
    year: Option<i32>,

    /// Month to report, 1-12 (default: current)
    #[arg(long)]
    month: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the report command
pub fn execute(args: ReportArgs) -> Result<()> {
    let ctx = AppContext::load(&ConfigOverrides::default())?;
    let scope = ctx.resolve_scope(args.group.as_deref())?;
    let (year, month) = resolve_month(args.year, args.month);

    let (records, fresh) = ctx.month_records(&scope, year, month)?;

    let totals = expense_totals(&records);
    let breakdown = category_breakdown(&records);

    if ctx.json_output(args.json) {
        let categories = |side: &spend_ledger_core::report::KindBreakdown| {
            side.list
                .iter()
                .map(|slice| {
                    serde_json::json!({
                        "code": slice.code,
                        "label": slice.label,
                        "total": round2(slice.total),
                        "share": round2(side.share_of(slice)),
                        "necessaryShare": round2(slice.necessary_share()),
                    })
                })
                .collect::<Vec<_>>()
        };
        let output = serde_json::json!({
            "scope": scope.cache_key(),
            "fresh": fresh,
            "year": year,
            "month": month,
            "income": {
                "total": round2(totals.income),
                "share": round2(totals.income_share()),
                "categories": categories(&breakdown.income),
            },
            "outcome": {
                "total": round2(totals.outcome),
                "share": round2(totals.outcome_share()),
                "necessaryShare": round2(breakdown.outcome.necessary_share()),
                "unnecessaryShare": round2(breakdown.outcome.unnecessary_share()),
                "categories": categories(&breakdown.outcome),
            },
            "surplus": round2(totals.surplus()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let currency = &ctx.config.display.currency;
    println!("Report for {year}-{month:02} ({})", scope.cache_key());
    if records.is_empty() {
        println!("No records.");
        return Ok(());
    }

    println!();
    println!("Income / outcome split");
    println!(
        "  income   {currency}{:>12}  {}",
        money(totals.income),
        pct(totals.income_share())
    );
    println!(
        "  outcome  {currency}{:>12}  {}",
        money(totals.outcome),
        pct(totals.outcome_share())
    );
    println!("  surplus  {currency}{:>12}", money(totals.surplus()));

    if !breakdown.outcome.list.is_empty() {
        println!();
        println!("Outcome by category ({currency}{})", money(breakdown.outcome.total));
        for slice in &breakdown.outcome.list {
            println!(
                "  {:<18} {currency}{:>12}  {:>7}  necessary {}",
                slice.label,
                money(slice.total),
                pct(breakdown.outcome.share_of(slice)),
                pct(slice.necessary_share()),
            );
        }
        println!(
            "  necessary {} / discretionary {} of all outcome",
            pct(breakdown.outcome.necessary_share()),
            pct(breakdown.outcome.unnecessary_share()),
        );
    }

    if !breakdown.income.list.is_empty() {
        println!();
        println!("Income by category ({currency}{})", money(breakdown.income.total));
        for slice in &breakdown.income.list {
            println!(
                "  {:<18} {currency}{:>12}  {:>7}",
                slice.label,
                money(slice.total),
                pct(breakdown.income.share_of(slice)),
            );
        }
    }

    Ok(())
}
