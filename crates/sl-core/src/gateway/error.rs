//! Error types for the remote gateway client

use thiserror::Error;

/// Errors from talking to the items/groups/users gateway
///
/// These stay structured inside the library; the CLI collapses them to a
/// generic failure line and leaves the detail to tracing.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, TLS, body decode)
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status
    #[error("Gateway returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    /// The gateway answered 200 with a body this client cannot use
    #[error("Unexpected gateway response from {endpoint}: {message}")]
    UnexpectedBody { endpoint: String, message: String },
}
