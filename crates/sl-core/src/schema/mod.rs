//! Wire-facing schemas for the items/groups/users gateway
//!
//! All types preserve unknown JSON fields so a newer gateway can add fields
//! without this client dropping them on read-modify-write.

pub mod category;
pub mod group;
pub mod record;
pub mod user;

pub use category::{Category, INCOME_CATEGORIES, OUTCOME_CATEGORIES, category_label};
pub use group::{Group, MemberSummary};
pub use record::{Necessity, SpendingKind, SpendingRecord};
pub use user::{Allocation, UserProfile, MONTHS_PER_YEAR};
