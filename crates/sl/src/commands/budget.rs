//! Budget command: yearly budgets and per-category allocations

use anyhow::Result;
use clap::{Args, Subcommand};
use spend_ledger_core::config::ConfigOverrides;
use spend_ledger_core::provider::RecordFilter;
use spend_ledger_core::report::{recompute_percentages, round2, usage_gauge};
use spend_ledger_core::schema::{Allocation, MONTHS_PER_YEAR, SpendingKind, UserProfile};

use crate::commands::user::load_profile;
use crate::util::format::{money, pct};
use crate::util::settings::{AppContext, resolve_month};

/// Show or edit yearly budgets and allocations
#[derive(Args, Debug)]
pub struct BudgetArgs {
    #[command(subcommand)]
    action: BudgetAction,
}

#[derive(Subcommand, Debug)]
enum BudgetAction {
    /// Show the month's budget gauge and the allocation plan
    Show {
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,

        /// Month, 1-12 (default: current)
        #[arg(long)]
        month: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the budget for one month (1-12)
    SetMonth {
        /// Month, 1-12
        month: u32,
        /// Budget amount
        amount: f64,
    },

    /// Add an allocation line item
    AllocAdd {
        /// Category name for the line item
        name: String,
        /// Planned yearly amount
        amount: f64,
    },

    /// Change an allocation's amount
    AllocSet {
        /// Allocation id (see `budget show`)
        id: u32,
        /// New amount
        amount: f64,
    },

    /// Remove an allocation line item
    AllocRemove {
        /// Allocation id (see `budget show`)
        id: u32,
    },
}

/// Execute the budget command
pub fn execute(args: BudgetArgs) -> Result<()> {
    let ctx = AppContext::load(&ConfigOverrides::default())?;

    match args.action {
        BudgetAction::Show { year, month, json } => show(&ctx, year, month, json),
        BudgetAction::SetMonth { month, amount } => set_month(&ctx, month, amount),
        BudgetAction::AllocAdd { name, amount } => {
            edit_allocations(&ctx, |allocations| {
                let id = allocations.iter().map(|a| a.id).max().unwrap_or(0) + 1;
                allocations.push(Allocation {
                    id,
                    name: name.clone(),
                    budget: amount,
                    percentage: 0.0,
                });
                Ok(())
            })
        }
        BudgetAction::AllocSet { id, amount } => {
            edit_allocations(&ctx, |allocations| {
                let Some(allocation) = allocations.iter_mut().find(|a| a.id == id) else {
                    anyhow::bail!("No allocation with id {id}");
                };
                allocation.budget = amount;
                Ok(())
            })
        }
        BudgetAction::AllocRemove { id } => {
            edit_allocations(&ctx, |allocations| {
                let before = allocations.len();
                allocations.retain(|a| a.id != id);
                if allocations.len() == before {
                    anyhow::bail!("No allocation with id {id}");
                }
                Ok(())
            })
        }
    }
}

fn show(ctx: &AppContext, year: Option<i32>, month: Option<u32>, json: bool) -> Result<()> {
    let (profile, _fresh) = load_profile(ctx)?;
    let (year, month) = resolve_month(year, month);

    // The gauge compares the month's personal outcome against its budget
    let email = ctx.require_email()?;
    let scope = spend_ledger_core::gateway::Scope::Personal { email };
    let usage = match ctx.month_records(&scope, year, month) {
        Ok((records, _)) => {
            let filter = RecordFilter {
                kind: Some(SpendingKind::Outcome),
                ..Default::default()
            };
            records
                .iter()
                .filter(|r| filter.matches(r))
                .map(|r| r.amount)
                .sum()
        }
        Err(_) => 0.0,
    };

    let month0 = (month - 1) as usize;
    let gauge = usage_gauge(profile.budget_for_month(month0), usage);

    let allocations = profile.allocations.clone().unwrap_or_default();
    let total_allocated: f64 = allocations.iter().map(|a| a.budget).sum();

    if ctx.json_output(json) {
        let output = serde_json::json!({
            "year": year,
            "month": month,
            "gauge": {
                "budget": round2(gauge.budget),
                "usage": round2(gauge.usage),
                "percentUsed": round2(gauge.percent_used),
            },
            "budgetList": profile.budget_list,
            "allocations": allocations,
            "totalAllocated": round2(total_allocated),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let currency = &ctx.config.display.currency;
    println!("Budget for {year}-{month:02}");
    println!(
        "  spent {currency}{} of {currency}{} ({} used)",
        money(gauge.usage),
        money(gauge.budget),
        pct(gauge.percent_used),
    );

    if let Some(ref budget_list) = profile.budget_list {
        println!();
        println!("Monthly budgets");
        for (i, amount) in budget_list.iter().enumerate().take(MONTHS_PER_YEAR) {
            println!("  {:>2}  {currency}{:>12}", i + 1, money(*amount));
        }
    }

    if allocations.is_empty() {
        println!();
        println!("No allocations planned (add one with `sl budget alloc-add`)");
    } else {
        println!();
        println!(
            "Allocations (total {currency}{}, about {currency}{} / month)",
            money(total_allocated),
            money(round2(total_allocated / MONTHS_PER_YEAR as f64)),
        );
        for allocation in &allocations {
            println!(
                "  {:>3}  {:<18} {currency}{:>12}  {:>7}",
                allocation.id,
                allocation.name,
                money(allocation.budget),
                pct(allocation.percentage),
            );
        }
    }

    Ok(())
}

fn set_month(ctx: &AppContext, month: u32, amount: f64) -> Result<()> {
    if !(1..=MONTHS_PER_YEAR as u32).contains(&month) {
        anyhow::bail!("Month must be 1-12, got {month}");
    }

    update_profile(ctx, |profile| {
        let list = profile
            .budget_list
            .get_or_insert_with(|| vec![0.0; MONTHS_PER_YEAR]);
        list.resize(MONTHS_PER_YEAR, 0.0);
        list[(month - 1) as usize] = amount;
        Ok(())
    })?;

    println!("Budget for month {month} set to {amount}");
    Ok(())
}

fn edit_allocations(
    ctx: &AppContext,
    edit: impl FnOnce(&mut Vec<Allocation>) -> Result<()>,
) -> Result<()> {
    let updated = update_profile(ctx, |profile| {
        let mut allocations = profile.allocations.take().unwrap_or_default();
        edit(&mut allocations)?;
        recompute_percentages(&mut allocations);
        profile.allocations = Some(allocations);
        Ok(())
    })?;

    let allocations = updated.allocations.unwrap_or_default();
    let total: f64 = allocations.iter().map(|a| a.budget).sum();
    println!("Allocation plan saved ({} items, total {})", allocations.len(), money(total));
    Ok(())
}

/// Fetch the fresh profile, apply an edit, push it, and return the
/// gateway's view of the result. Mutations never run against the cache.
fn update_profile(
    ctx: &AppContext,
    edit: impl FnOnce(&mut UserProfile) -> Result<()>,
) -> Result<UserProfile> {
    use spend_ledger_core::provider::UserConfigProvider;
    use tracing::debug;

    let email = ctx.require_email()?;
    let provider = UserConfigProvider::new(ctx.gateway()?, ctx.store());

    let mut profile = match provider.ensure_user(&default_name(&email), &email) {
        Ok(profile) => profile,
        Err(e) => {
            debug!("Profile fetch failed: {e}");
            anyhow::bail!(
                "Could not load the profile (gateway error; run with SL_LOG=debug for details)"
            );
        }
    };

    edit(&mut profile)?;

    match provider.update(&profile) {
        Ok(updated) => Ok(updated),
        Err(e) => {
            debug!("Profile update failed: {e}");
            anyhow::bail!(
                "Could not save the profile (gateway error; run with SL_LOG=debug for details)"
            );
        }
    }
}

pub(crate) fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
