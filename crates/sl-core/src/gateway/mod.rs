//! Synchronous client for the items/groups/users REST gateway
//!
//! The gateway is an opaque external collaborator speaking JSON:
//!
//! - `PUT /items` — upsert a spending record
//! - `GET /items?groupId=&email=&startDate=&endDate=` — list by scope/time
//! - `DELETE /items?id=` — remove a record
//! - `GET/PUT /users`, `GET/PUT/DELETE /groups` — analogous shapes
//!
//! Requests are blocking with a short timeout; there are no retries. The
//! providers layer decides what a failure means (usually: keep the cached
//! snapshot and tell the user the refresh failed).

pub mod error;
mod groups;
mod items;
mod users;

pub use error::GatewayError;

use crate::config::GatewayConfig;
use std::time::Duration;

/// The query axis a record listing runs under
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// One member's personal records (group-tagged records excluded)
    Personal {
        /// The member's email
        email: String,
    },
    /// One group's shared records
    Group {
        /// The group id
        id: String,
    },
}

impl Scope {
    /// Stable key used to tag cache snapshots with the scope they answer.
    pub fn cache_key(&self) -> String {
        match self {
            Scope::Personal { email } => format!("user:{email}"),
            Scope::Group { id } => format!("group:{id}"),
        }
    }

    /// The group id of a group scope, `None` for personal scopes.
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Scope::Personal { .. } => None,
            Scope::Group { id } => Some(id),
        }
    }
}

/// Blocking HTTP client bound to one gateway base URL
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl Gateway {
    /// Build a client from gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn http(&self) -> &reqwest::blocking::Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn check_status(
        response: reqwest::blocking::Response,
        endpoint: &str,
    ) -> Result<reqwest::blocking::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            })
        }
    }
}
