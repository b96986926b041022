//! Budget usage and allocation math

use crate::report::percent;
use crate::schema::Allocation;

/// Monthly budget usage for gauge display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageGauge {
    /// Effective budget (falls back to usage when no budget is set)
    pub budget: f64,
    /// Amount spent
    pub usage: f64,
    /// Usage as a share of the effective budget, 0..
    pub percent_used: f64,
}

/// Build the usage gauge for one month.
///
/// A zero or missing budget uses the spent amount as the denominator, so an
/// unbudgeted month reads as fully used rather than dividing by zero.
pub fn usage_gauge(budget: Option<f64>, usage: f64) -> UsageGauge {
    let effective = match budget {
        Some(b) if b != 0.0 => b,
        _ => usage,
    };
    UsageGauge {
        budget: effective,
        usage,
        percent_used: percent(usage, effective),
    }
}

/// Recompute every allocation's percentage of the list total.
///
/// Percentages are `budget * 100 / total`, 0 across the board when the
/// total is 0; they sum to 100 whenever any budget is non-zero.
pub fn recompute_percentages(allocations: &mut [Allocation]) {
    let total: f64 = allocations.iter().map(|a| a.budget).sum();
    for allocation in allocations {
        allocation.percentage = percent(allocation.budget, total);
    }
}
