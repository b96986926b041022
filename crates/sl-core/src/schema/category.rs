//! Category code tables
//!
//! Category codes are open-ended strings on the wire; these tables are the
//! named set the CLI offers and the labels reports print. An unknown code
//! still aggregates, it just prints as-is.

/// A category code/label pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Stable code stored on records
    pub code: &'static str,
    /// Human-readable label
    pub label: &'static str,
}

/// Outcome categories
pub const OUTCOME_CATEGORIES: &[Category] = &[
    Category { code: "food", label: "Food" },
    Category { code: "drink", label: "Drinks" },
    Category { code: "transport", label: "Transport" },
    Category { code: "clothing", label: "Clothing" },
    Category { code: "home", label: "Household" },
    Category { code: "phone", label: "Phone & Internet" },
    Category { code: "entertainment", label: "Entertainment" },
    Category { code: "education", label: "Education" },
    Category { code: "medical", label: "Medical" },
    Category { code: "insurance", label: "Insurance" },
    Category { code: "other", label: "Other" },
];

/// Income categories
pub const INCOME_CATEGORIES: &[Category] = &[
    Category { code: "salary", label: "Salary" },
    Category { code: "bonus", label: "Bonus" },
    Category { code: "investment", label: "Investment" },
    Category { code: "refund", label: "Refund" },
    Category { code: "other", label: "Other" },
];

/// Label for a category code, falling back to the code itself.
pub fn category_label(code: &str) -> &str {
    OUTCOME_CATEGORIES
        .iter()
        .chain(INCOME_CATEGORIES.iter())
        .find(|c| c.code == code)
        .map(|c| c.label)
        .unwrap_or(code)
}
