//! Error types for the provider layer

use crate::gateway::GatewayError;
use thiserror::Error;

/// Errors surfaced by the sync providers
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The gateway call behind a refresh or mutation failed
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A profile could not be fetched even after creating a default one
    #[error("Profile for {email} could not be loaded or created")]
    ProfileUnavailable { email: String },

    /// An operation referenced a group the gateway doesn't know
    #[error("Group {id} not found")]
    GroupNotFound { id: String },
}
