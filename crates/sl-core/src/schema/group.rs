//! Group schema

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A member as embedded in a group document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    /// Display name
    pub name: String,
    /// Email (matches records' `user-token`)
    pub email: String,
    /// Avatar URL
    pub image: String,
}

/// A shared household/unit whose members' records can be viewed jointly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique group id (UUID string)
    pub id: String,

    /// Display name
    pub name: String,

    /// Member summaries
    #[serde(default)]
    pub users: Vec<MemberSummary>,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Group {
    /// Returns `true` when `email` is a member of this group.
    pub fn has_member(&self, email: &str) -> bool {
        self.users.iter().any(|m| m.email == email)
    }
}
