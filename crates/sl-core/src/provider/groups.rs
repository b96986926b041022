//! Group provider
//!
//! Holds the group list for the signed-in user and implements the two
//! membership-maintenance flows the original application ran from its
//! dashboard: creating a group (new group document + the creator's profile
//! gains the id) and deleting one (every member's profile drops the id,
//! then the group document goes away).

use crate::cache::CacheStore;
use crate::provider::{GroupSource, ProviderError, UserSource};
use crate::schema::{Group, MemberSummary, UserProfile};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// The group provider
#[derive(Debug)]
pub struct GroupProvider<S> {
    source: S,
    store: Option<CacheStore>,
    state: Mutex<Vec<Group>>,
}

impl<S: GroupSource> GroupProvider<S> {
    /// A provider over `source`, mirroring to `store` when given.
    pub fn new(source: S, store: Option<CacheStore>) -> Self {
        Self {
            source,
            store,
            state: Mutex::new(Vec::new()),
        }
    }

    /// Adopt the cached group list when nothing fresher is loaded yet.
    /// Returns `true` when the cached list was adopted.
    pub fn hydrate(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let Some(groups) = store.load_groups() else {
            return false;
        };
        let mut state = self.state.lock().expect("provider state poisoned");
        if !state.is_empty() {
            return false;
        }
        debug!("Hydrated {} groups from cache", groups.len());
        *state = groups;
        true
    }

    /// Refresh the group list for the given ids and mirror it.
    pub fn sync(&self, ids: &[String]) -> Result<Vec<Group>, ProviderError> {
        let groups = self.source.fetch_groups(ids)?;
        self.adopt(groups.clone());
        Ok(groups)
    }

    /// Clone of the current group list.
    pub fn groups(&self) -> Vec<Group> {
        self.state.lock().expect("provider state poisoned").clone()
    }

    fn adopt(&self, groups: Vec<Group>) {
        if let Some(store) = &self.store
            && let Err(e) = store.store_groups(&groups)
        {
            warn!("Group cache mirror failed: {e}");
        }
        *self.state.lock().expect("provider state poisoned") = groups;
    }
}

impl<S: GroupSource + UserSource> GroupProvider<S> {
    /// Create a group owned by `creator` and return the group together
    /// with the creator's updated profile.
    ///
    /// The group document is written first; the creator's profile then
    /// gains the new id. The refreshed list covers all of the creator's
    /// groups including the new one.
    pub fn create(
        &self,
        name: &str,
        creator: &UserProfile,
    ) -> Result<(Group, UserProfile), ProviderError> {
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            users: vec![MemberSummary {
                name: creator.name.clone(),
                email: creator.email.clone(),
                image: creator.image.clone(),
            }],
            unknown_fields: HashMap::new(),
        };
        self.source.push_group(&group)?;

        let mut updated = creator.clone();
        updated.groups.push(group.id.clone());
        self.source.push_user(&updated)?;

        self.sync(&updated.groups)?;
        Ok((group, updated))
    }

    /// Delete a group, removing its id from every member's profile first.
    ///
    /// Members whose profile cannot be fetched are skipped with a warning —
    /// the original behaviour is best-effort eviction, not a transaction.
    pub fn delete(&self, id: &str, remaining_ids: &[String]) -> Result<(), ProviderError> {
        let group = self
            .source
            .fetch_groups(&[id.to_string()])?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| ProviderError::GroupNotFound { id: id.to_string() })?;

        for member in &group.users {
            match self.source.fetch_user(&member.email) {
                Ok(Some(mut profile)) => {
                    profile.groups.retain(|g| g != id);
                    if let Err(e) = self.source.push_user(&profile) {
                        warn!("Could not update {}: {e}", member.email);
                    }
                }
                Ok(None) => {
                    warn!("Member {} has no profile; skipping", member.email);
                }
                Err(e) => {
                    warn!("Could not fetch {}: {e}", member.email);
                }
            }
        }

        self.source.remove_group(id)?;
        self.sync(remaining_ids)?;
        Ok(())
    }
}
