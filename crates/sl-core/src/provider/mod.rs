//! Sync providers: the state holders between the gateway and any front-end
//!
//! Each provider owns an in-memory snapshot of one slice of remote state
//! (records, the user profile, the group list), hydrates it from the
//! offline cache before any network call resolves, refreshes it from the
//! gateway on demand, and mirrors refreshed state back to the cache on a
//! best-effort basis.
//!
//! Synchronization model (deliberately thin):
//! - fetch → replace snapshot → best-effort cache write
//! - a generation counter aborts stale hydrations and in-flight refreshes;
//!   between overlapping refreshes the last response to resolve wins
//! - no merge logic, no retries, no conflict resolution
//!
//! The `*Source` traits are the seam to the gateway; [`Gateway`] implements
//! all of them, and tests substitute scripted fakes.

pub mod error;
pub mod groups;
pub mod spending;
pub mod user_config;

pub use error::ProviderError;
pub use groups::GroupProvider;
pub use spending::{RecordFilter, SpendingProvider, SyncOutcome};
pub use user_config::UserConfigProvider;

use crate::gateway::{Gateway, GatewayError, Scope};
use crate::schema::{Group, SpendingRecord, UserProfile};

/// Record-listing side of the gateway
pub trait RecordSource {
    /// Fetch records for a scope and optional `[start, end)` window.
    fn fetch_records(
        &self,
        scope: &Scope,
        window: Option<(&str, &str)>,
    ) -> Result<Vec<SpendingRecord>, GatewayError>;
}

impl RecordSource for Gateway {
    fn fetch_records(
        &self,
        scope: &Scope,
        window: Option<(&str, &str)>,
    ) -> Result<Vec<SpendingRecord>, GatewayError> {
        self.list_records(scope, window)
    }
}

/// User-profile side of the gateway
pub trait UserSource {
    /// Fetch a profile by email, `None` when the gateway has no profile.
    fn fetch_user(&self, email: &str) -> Result<Option<UserProfile>, GatewayError>;
    /// Upsert a profile.
    fn push_user(&self, profile: &UserProfile) -> Result<(), GatewayError>;
}

impl UserSource for Gateway {
    fn fetch_user(&self, email: &str) -> Result<Option<UserProfile>, GatewayError> {
        self.get_user(email)
    }

    fn push_user(&self, profile: &UserProfile) -> Result<(), GatewayError> {
        self.put_user(profile)
    }
}

/// Group side of the gateway
pub trait GroupSource {
    /// Fetch groups by id; unknown ids are absent from the result.
    fn fetch_groups(&self, ids: &[String]) -> Result<Vec<Group>, GatewayError>;
    /// Upsert a group.
    fn push_group(&self, group: &Group) -> Result<(), GatewayError>;
    /// Remove a group by id.
    fn remove_group(&self, id: &str) -> Result<(), GatewayError>;
}

impl GroupSource for Gateway {
    fn fetch_groups(&self, ids: &[String]) -> Result<Vec<Group>, GatewayError> {
        self.get_groups(ids)
    }

    fn push_group(&self, group: &Group) -> Result<(), GatewayError> {
        self.put_group(group)
    }

    fn remove_group(&self, id: &str) -> Result<(), GatewayError> {
        self.delete_group(id)
    }
}
