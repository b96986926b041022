//! `/groups` endpoint: group CRUD

use crate::gateway::{Gateway, GatewayError};
use crate::schema::Group;

impl Gateway {
    /// Fetch groups by id. Ids are sent comma-joined; unknown ids are
    /// simply absent from the response.
    pub fn get_groups(&self, ids: &[String]) -> Result<Vec<Group>, GatewayError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let endpoint = self.url("groups");
        let response = self
            .http()
            .get(&endpoint)
            .query(&[("id", ids.join(","))])
            .send()?;
        let response = Self::check_status(response, "GET /groups")?;
        let groups: Vec<Group> = response.json()?;
        Ok(groups)
    }

    /// Fetch a single group, `None` when the gateway doesn't know the id.
    pub fn get_group(&self, id: &str) -> Result<Option<Group>, GatewayError> {
        let groups = self.get_groups(&[id.to_string()])?;
        Ok(groups.into_iter().find(|g| g.id == id))
    }

    /// Upsert a group.
    pub fn put_group(&self, group: &Group) -> Result<(), GatewayError> {
        let endpoint = self.url("groups");
        let response = self.http().put(&endpoint).json(group).send()?;
        Self::check_status(response, "PUT /groups")?;
        Ok(())
    }

    /// Remove a group by id. Member profiles still referencing the id are
    /// the caller's responsibility (see the group provider).
    pub fn delete_group(&self, id: &str) -> Result<(), GatewayError> {
        let endpoint = self.url("groups");
        let response = self.http().delete(&endpoint).query(&[("id", id)]).send()?;
        Self::check_status(response, "DELETE /groups")?;
        Ok(())
    }
}
