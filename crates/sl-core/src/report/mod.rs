//! Aggregation over record lists for report display
//!
//! Pure one-pass reductions; no special numeric semantics beyond rounding
//! at the display edge. Percentage math is shared by every sub-report:
//! a part of a zero whole is 0%, never NaN.

mod budget;
mod categories;
mod summary;

pub use budget::{UsageGauge, recompute_percentages, usage_gauge};
pub use categories::{CategoryBreakdown, CategorySlice, KindBreakdown, category_breakdown};
pub use summary::{ExpenseTotals, expense_totals};

/// `part` as a percentage of `whole`, 0 when `whole` is 0.
pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part * 100.0 / whole }
}

/// Round to two decimals for display.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_zero_whole_is_zero() {
        assert_eq!(percent(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_percent_basic() {
        assert_eq!(percent(25.0, 200.0), 12.5);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345), 12.35);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(-0.005), -0.01);
    }
}
