//! `/users` endpoint: fetch and upsert user profiles

use crate::gateway::{Gateway, GatewayError};
use crate::schema::UserProfile;

impl Gateway {
    /// Fetch a profile by email.
    ///
    /// Returns `Ok(None)` when the gateway has no profile for the email —
    /// either a 404, or a 200 whose body carries no usable `email` field
    /// (the gateway answers `{}` for unknown users).
    pub fn get_user(&self, email: &str) -> Result<Option<UserProfile>, GatewayError> {
        let endpoint = self.url("users");
        let response = self
            .http()
            .get(&endpoint)
            .query(&[("email", email)])
            .send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(response, "GET /users")?;

        let value: serde_json::Value = response.json()?;
        let has_email = value
            .get("email")
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.is_empty());
        if !has_email {
            return Ok(None);
        }

        let profile =
            serde_json::from_value(value).map_err(|e| GatewayError::UnexpectedBody {
                endpoint: "GET /users".to_string(),
                message: e.to_string(),
            })?;
        Ok(Some(profile))
    }

    /// Upsert a profile.
    pub fn put_user(&self, profile: &UserProfile) -> Result<(), GatewayError> {
        let endpoint = self.url("users");
        let response = self.http().put(&endpoint).json(profile).send()?;
        Self::check_status(response, "PUT /users")?;
        Ok(())
    }
}
