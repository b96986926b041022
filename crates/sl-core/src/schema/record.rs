//! Spending record schema
//!
//! One income or outcome transaction as stored by the remote gateway. The
//! wire format keeps the gateway's historical field spellings (`type`,
//! `groupId`, `user-token`), so this struct renames rather than reshapes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction of a spending record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendingKind {
    /// Money coming in
    Income,
    /// Money going out
    Outcome,
}

impl SpendingKind {
    /// Lowercase label used by CLI flags and report headings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingKind::Income => "income",
            SpendingKind::Outcome => "outcome",
        }
    }
}

/// Whether an outcome was a necessary expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Necessity {
    /// A necessary expense (rent, groceries, ...)
    Need,
    /// A discretionary expense
    NotNeed,
}

/// One income or outcome transaction
///
/// Records are exchanged with the gateway via `PUT /items` (upsert) and
/// `GET /items` (list by scope/time window).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingRecord {
    /// Unique record id (UUID string)
    pub id: String,

    /// Email of the owning member
    #[serde(rename = "user-token")]
    pub user_token: String,

    /// Income or outcome
    #[serde(rename = "type")]
    pub kind: SpendingKind,

    /// Necessary or discretionary
    pub necessity: Necessity,

    /// Category code (see [`crate::schema::category`])
    pub category: String,

    /// Free-text description
    pub description: String,

    /// Amount in the ledger currency
    pub amount: f64,

    /// ISO 8601 date the transaction happened
    pub date: String,

    /// Group the record belongs to; absent for personal records
    #[serde(rename = "groupId", default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl SpendingRecord {
    /// Returns `true` when the record carries a non-empty group tag.
    ///
    /// The gateway historically stored both a missing `groupId` and an empty
    /// string for personal records; both mean "personal" here.
    pub fn is_grouped(&self) -> bool {
        self.group_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Returns `true` when the record belongs to the given scope value
    /// (`None` = personal scope).
    pub fn in_group(&self, group_id: Option<&str>) -> bool {
        match group_id {
            Some(id) => self.group_id.as_deref() == Some(id),
            None => !self.is_grouped(),
        }
    }
}
