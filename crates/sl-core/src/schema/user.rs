//! User profile schema

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of entries in a yearly budget list.
pub const MONTHS_PER_YEAR: usize = 12;

/// A planned budget line item for a category
///
/// `percentage` is derived from the allocation list it lives in; see
/// [`crate::report::recompute_percentages`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Ordinal id within the user's allocation list
    pub id: u32,
    /// Category name for the line item
    pub name: String,
    /// Planned yearly amount
    pub budget: f64,
    /// Share of the total planned budget, 0..=100
    pub percentage: f64,
}

/// A user profile as stored by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Email, the primary key for user lookups and record ownership
    pub email: String,

    /// Avatar URL
    pub image: String,

    /// Ids of the groups the user belongs to
    #[serde(default)]
    pub groups: Vec<String>,

    /// Monthly budgets, one entry per month (12 entries when present)
    #[serde(rename = "budgetList", default, skip_serializing_if = "Option::is_none")]
    pub budget_list: Option<Vec<f64>>,

    /// Yearly budget allocations per category
    #[serde(rename = "allocation", default, skip_serializing_if = "Option::is_none")]
    pub allocations: Option<Vec<Allocation>>,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl UserProfile {
    /// A fresh profile for a first-time user (no groups, no budgets yet).
    pub fn new_default(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            image: String::new(),
            groups: Vec::new(),
            budget_list: None,
            allocations: None,
            unknown_fields: HashMap::new(),
        }
    }

    /// Budget for a zero-based month index, if a budget list is set.
    ///
    /// Out-of-range indices and short lists yield `None` rather than a panic;
    /// profiles written by older clients may carry fewer than 12 entries.
    pub fn budget_for_month(&self, month0: usize) -> Option<f64> {
        self.budget_list.as_ref()?.get(month0).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_roundtrip_minimal() {
        let json = r#"{
            "name": "Ana",
            "email": "ana@example.com",
            "image": "https://example.com/a.png"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Ana");
        assert!(profile.groups.is_empty());
        assert!(profile.budget_list.is_none());
        assert!(profile.allocations.is_none());

        let serialized = serde_json::to_string(&profile).unwrap();
        assert!(!serialized.contains("budgetList"));
        assert!(!serialized.contains("allocation"));
    }

    #[test]
    fn test_profile_wire_names() {
        let json = r#"{
            "name": "Ana",
            "email": "ana@example.com",
            "image": "",
            "groups": ["grp-1"],
            "budgetList": [0, 0, 1000, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            "allocation": [
                {"id": 1, "name": "food", "budget": 6000, "percentage": 60},
                {"id": 2, "name": "transport", "budget": 4000, "percentage": 40}
            ]
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.groups, vec!["grp-1".to_string()]);
        assert_eq!(profile.budget_for_month(2), Some(1000.0));
        assert_eq!(profile.budget_for_month(3), Some(0.0));
        let allocations = profile.allocations.as_ref().unwrap();
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].name, "food");

        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("budgetList").is_some());
        assert!(value.get("allocation").is_some());
        assert!(value.get("allocations").is_none());
    }

    #[test]
    fn test_budget_for_month_out_of_range() {
        let mut profile = UserProfile::new_default("Ana", "ana@example.com");
        assert_eq!(profile.budget_for_month(0), None);

        profile.budget_list = Some(vec![100.0, 200.0]);
        assert_eq!(profile.budget_for_month(1), Some(200.0));
        assert_eq!(profile.budget_for_month(5), None);
        assert_eq!(profile.budget_for_month(12), None);
    }

    #[test]
    fn test_profile_preserves_unknown_fields() {
        let json = r#"{
            "name": "Ana",
            "email": "ana@example.com",
            "image": "",
            "locale": "zh-TW"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.unknown_fields.contains_key("locale"));

        let serialized = serde_json::to_string(&profile).unwrap();
        assert!(serialized.contains("zh-TW"));
    }
}
