//! User-config provider
//!
//! Holds the signed-in user's profile. First contact follows the original
//! application's flow: fetch by email; when the gateway has no profile yet,
//! create a default one and fetch again. Profile mutations (budgets,
//! allocations, group membership) push the whole profile and re-fetch, so
//! the snapshot always reflects what the gateway accepted.

use crate::cache::CacheStore;
use crate::provider::{ProviderError, UserSource};
use crate::schema::UserProfile;
use std::sync::Mutex;
use tracing::{debug, warn};

/// The user-config provider
#[derive(Debug)]
pub struct UserConfigProvider<S> {
    source: S,
    store: Option<CacheStore>,
    state: Mutex<Option<UserProfile>>,
}

impl<S: UserSource> UserConfigProvider<S> {
    /// A provider over `source`, mirroring to `store` when given.
    pub fn new(source: S, store: Option<CacheStore>) -> Self {
        Self {
            source,
            store,
            state: Mutex::new(None),
        }
    }

    /// Adopt the cached profile when nothing fresher is loaded yet.
    /// Returns `true` when the cached profile was adopted.
    pub fn hydrate(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let Some(profile) = store.load_profile() else {
            return false;
        };
        let mut state = self.state.lock().expect("provider state poisoned");
        if state.is_some() {
            return false;
        }
        debug!("Hydrated profile for {} from cache", profile.email);
        *state = Some(profile);
        true
    }

    /// Fetch the profile for `email`, creating a default one on first
    /// contact.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ProfileUnavailable`] when the gateway still
    /// reports no profile after the create, and [`ProviderError::Gateway`]
    /// for transport failures.
    pub fn ensure_user(&self, name: &str, email: &str) -> Result<UserProfile, ProviderError> {
        if let Some(profile) = self.source.fetch_user(email)? {
            self.adopt(profile.clone());
            return Ok(profile);
        }

        debug!("No profile for {email}; creating a default one");
        self.source.push_user(&UserProfile::new_default(name, email))?;

        match self.source.fetch_user(email)? {
            Some(profile) => {
                self.adopt(profile.clone());
                Ok(profile)
            }
            None => Err(ProviderError::ProfileUnavailable {
                email: email.to_string(),
            }),
        }
    }

    /// Push an updated profile and re-fetch it.
    ///
    /// The returned profile is what the gateway handed back, not the input:
    /// the gateway may normalize fields this client doesn't know about.
    pub fn update(&self, profile: &UserProfile) -> Result<UserProfile, ProviderError> {
        self.source.push_user(profile)?;
        match self.source.fetch_user(&profile.email)? {
            Some(refreshed) => {
                self.adopt(refreshed.clone());
                Ok(refreshed)
            }
            None => Err(ProviderError::ProfileUnavailable {
                email: profile.email.clone(),
            }),
        }
    }

    /// Clone of the current profile snapshot, if any.
    pub fn profile(&self) -> Option<UserProfile> {
        self.state.lock().expect("provider state poisoned").clone()
    }

    fn adopt(&self, profile: UserProfile) {
        if let Some(store) = &self.store
            && let Err(e) = store.store_profile(&profile)
        {
            warn!("Profile cache mirror failed: {e}");
        }
        *self.state.lock().expect("provider state poisoned") = Some(profile);
    }
}
