//! Per-category breakdowns for chart-style display

use crate::report::percent;
use crate::schema::{Necessity, SpendingKind, SpendingRecord, category_label};

/// One category's slice of a breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    /// Category code as stored on records
    pub code: String,
    /// Display label for the code
    pub label: String,
    /// Category total
    pub total: f64,
    /// Share spent on necessary records
    pub necessary: f64,
    /// Share spent on discretionary records
    pub unnecessary: f64,
}

impl CategorySlice {
    /// Necessary share of the category total, 0..=100.
    pub fn necessary_share(&self) -> f64 {
        percent(self.necessary, self.total)
    }

    /// Discretionary share of the category total, 0..=100.
    pub fn unnecessary_share(&self) -> f64 {
        percent(self.unnecessary, self.total)
    }
}

/// Breakdown of one direction (income or outcome)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindBreakdown {
    /// Slices in first-seen order
    pub list: Vec<CategorySlice>,
    /// Direction total (sum of all slices)
    pub total: f64,
    /// Necessary share of the direction total
    pub necessary: f64,
    /// Discretionary share of the direction total
    pub unnecessary: f64,
}

impl KindBreakdown {
    /// A slice's share of the direction total, 0..=100.
    pub fn share_of(&self, slice: &CategorySlice) -> f64 {
        percent(slice.total, self.total)
    }

    /// Necessary share of the direction total, 0..=100.
    pub fn necessary_share(&self) -> f64 {
        percent(self.necessary, self.necessary + self.unnecessary)
    }

    /// Discretionary share of the direction total, 0..=100.
    pub fn unnecessary_share(&self) -> f64 {
        percent(self.unnecessary, self.necessary + self.unnecessary)
    }
}

/// Both directions of a breakdown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    /// Income side
    pub income: KindBreakdown,
    /// Outcome side
    pub outcome: KindBreakdown,
}

/// Reduce a record list into per-category totals for both directions.
pub fn category_breakdown(records: &[SpendingRecord]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();

    for record in records {
        let side = match record.kind {
            SpendingKind::Income => &mut breakdown.income,
            SpendingKind::Outcome => &mut breakdown.outcome,
        };

        side.total += record.amount;
        match record.necessity {
            Necessity::Need => side.necessary += record.amount,
            Necessity::NotNeed => side.unnecessary += record.amount,
        }

        let slice = match side.list.iter_mut().find(|s| s.code == record.category) {
            Some(slice) => slice,
            None => {
                side.list.push(CategorySlice {
                    code: record.category.clone(),
                    label: category_label(&record.category).to_string(),
                    total: 0.0,
                    necessary: 0.0,
                    unnecessary: 0.0,
                });
                side.list.last_mut().expect("just pushed")
            }
        };
        slice.total += record.amount;
        match record.necessity {
            Necessity::Need => slice.necessary += record.amount,
            Necessity::NotNeed => slice.unnecessary += record.amount,
        }
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(kind: SpendingKind, necessity: Necessity, category: &str, amount: f64) -> SpendingRecord {
        SpendingRecord {
            id: "r".to_string(),
            user_token: "ana@example.com".to_string(),
            kind,
            necessity,
            category: category.to_string(),
            description: String::new(),
            amount,
            date: "2025-06-03T00:00:00Z".to_string(),
            group_id: None,
            unknown_fields: HashMap::new(),
        }
    }

    #[test]
    fn test_category_totals_sum_to_side_total() {
        let records = vec![
            record(SpendingKind::Outcome, Necessity::Need, "food", 300.0),
            record(SpendingKind::Outcome, Necessity::NotNeed, "food", 100.0),
            record(SpendingKind::Outcome, Necessity::Need, "transport", 50.0),
            record(SpendingKind::Income, Necessity::Need, "salary", 1000.0),
        ];

        let breakdown = category_breakdown(&records);
        assert_eq!(breakdown.outcome.total, 450.0);
        assert_eq!(breakdown.income.total, 1000.0);

        let slice_sum: f64 = breakdown.outcome.list.iter().map(|s| s.total).sum();
        assert_eq!(slice_sum, breakdown.outcome.total);
    }

    #[test]
    fn test_necessity_split() {
        let records = vec![
            record(SpendingKind::Outcome, Necessity::Need, "food", 300.0),
            record(SpendingKind::Outcome, Necessity::NotNeed, "entertainment", 100.0),
        ];

        let breakdown = category_breakdown(&records);
        assert_eq!(breakdown.outcome.necessary, 300.0);
        assert_eq!(breakdown.outcome.unnecessary, 100.0);
        assert_eq!(breakdown.outcome.necessary_share(), 75.0);
        assert_eq!(breakdown.outcome.unnecessary_share(), 25.0);
    }

    #[test]
    fn test_slice_shares() {
        let records = vec![
            record(SpendingKind::Outcome, Necessity::Need, "food", 60.0),
            record(SpendingKind::Outcome, Necessity::NotNeed, "food", 40.0),
        ];

        let breakdown = category_breakdown(&records);
        let food = &breakdown.outcome.list[0];
        assert_eq!(food.necessary_share(), 60.0);
        assert_eq!(food.unnecessary_share(), 40.0);
        assert_eq!(breakdown.outcome.share_of(food), 100.0);
    }

    #[test]
    fn test_unknown_category_labels_as_code() {
        let records = vec![record(SpendingKind::Outcome, Necessity::Need, "crypto", 10.0)];
        let breakdown = category_breakdown(&records);
        assert_eq!(breakdown.outcome.list[0].label, "crypto");
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        let records = vec![
            record(SpendingKind::Outcome, Necessity::Need, "transport", 1.0),
            record(SpendingKind::Outcome, Necessity::Need, "food", 1.0),
            record(SpendingKind::Outcome, Necessity::Need, "transport", 1.0),
        ];
        let breakdown = category_breakdown(&records);
        let codes: Vec<&str> = breakdown.outcome.list.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["transport", "food"]);
    }

    #[test]
    fn test_empty_input() {
        let breakdown = category_breakdown(&[]);
        assert!(breakdown.income.list.is_empty());
        assert!(breakdown.outcome.list.is_empty());
        assert_eq!(breakdown.outcome.necessary_share(), 0.0);
    }
}
