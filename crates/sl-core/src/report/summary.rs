//! Income/outcome totals

use crate::report::percent;
use crate::schema::{SpendingKind, SpendingRecord};

/// Totals of a record list by direction
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpenseTotals {
    /// Sum of income amounts
    pub income: f64,
    /// Sum of outcome amounts
    pub outcome: f64,
}

impl ExpenseTotals {
    /// Income minus outcome.
    pub fn surplus(&self) -> f64 {
        self.income - self.outcome
    }

    /// Income share of the combined total, 0..=100.
    pub fn income_share(&self) -> f64 {
        percent(self.income, self.income + self.outcome)
    }

    /// Outcome share of the combined total, 0..=100.
    pub fn outcome_share(&self) -> f64 {
        percent(self.outcome, self.income + self.outcome)
    }
}

/// One-pass totals over a record list.
pub fn expense_totals(records: &[SpendingRecord]) -> ExpenseTotals {
    records.iter().fold(ExpenseTotals::default(), |mut acc, r| {
        match r.kind {
            SpendingKind::Income => acc.income += r.amount,
            SpendingKind::Outcome => acc.outcome += r.amount,
        }
        acc
    })
}
