//! `/items` endpoint: list, upsert, delete spending records

use crate::dates;
use crate::gateway::{Gateway, GatewayError, Scope};
use crate::schema::SpendingRecord;
use tracing::debug;

impl Gateway {
    /// List records for a scope, optionally bounded to a `[start, end)`
    /// window of RFC 3339 timestamps.
    ///
    /// The listing is normalized client-side: records come back newest
    /// first, and a personal scope excludes group-tagged records (the
    /// gateway historically returns a member's group records alongside
    /// their personal ones).
    pub fn list_records(
        &self,
        scope: &Scope,
        window: Option<(&str, &str)>,
    ) -> Result<Vec<SpendingRecord>, GatewayError> {
        let endpoint = self.url("items");
        let mut request = self.http().get(&endpoint);

        request = match scope {
            Scope::Group { id } => request.query(&[("groupId", id.as_str())]),
            Scope::Personal { email } => request.query(&[("email", email.as_str())]),
        };
        if let Some((start, end)) = window {
            request = request.query(&[("startDate", start), ("endDate", end)]);
        }

        let response = Self::check_status(request.send()?, "GET /items")?;
        let records: Vec<SpendingRecord> = response.json()?;
        debug!("Fetched {} records for {}", records.len(), scope.cache_key());

        Ok(normalize_listing(scope, records))
    }

    /// Upsert a record (insert and edit share `PUT /items`).
    pub fn put_record(&self, record: &SpendingRecord) -> Result<(), GatewayError> {
        let endpoint = self.url("items");
        let response = self.http().put(&endpoint).json(record).send()?;
        Self::check_status(response, "PUT /items")?;
        Ok(())
    }

    /// Remove a record by id.
    pub fn delete_record(&self, id: &str) -> Result<(), GatewayError> {
        let endpoint = self.url("items");
        let response = self.http().delete(&endpoint).query(&[("id", id)]).send()?;
        Self::check_status(response, "DELETE /items")?;
        Ok(())
    }
}

/// Sort newest-first; drop group-tagged records from personal listings.
fn normalize_listing(scope: &Scope, mut records: Vec<SpendingRecord>) -> Vec<SpendingRecord> {
    if matches!(scope, Scope::Personal { .. }) {
        records.retain(|r| !r.is_grouped());
    }
    records.sort_by(|a, b| dates::cmp_desc(&a.date, &b.date));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Necessity, SpendingKind};
    use std::collections::HashMap;

    fn record(id: &str, date: &str, group_id: Option<&str>) -> SpendingRecord {
        SpendingRecord {
            id: id.to_string(),
            user_token: "ana@example.com".to_string(),
            kind: SpendingKind::Outcome,
            necessity: Necessity::Need,
            category: "food".to_string(),
            description: String::new(),
            amount: 10.0,
            date: date.to_string(),
            group_id: group_id.map(str::to_string),
            unknown_fields: HashMap::new(),
        }
    }

    #[test]
    fn test_normalize_personal_drops_grouped_records() {
        let scope = Scope::Personal {
            email: "ana@example.com".to_string(),
        };
        let records = vec![
            record("a", "2025-06-01T00:00:00Z", None),
            record("b", "2025-06-02T00:00:00Z", Some("grp-1")),
            record("c", "2025-06-03T00:00:00Z", Some("")),
        ];

        let normalized = normalize_listing(&scope, records);
        let ids: Vec<&str> = normalized.iter().map(|r| r.id.as_str()).collect();
        // "b" is grouped; "c" has an empty groupId and counts as personal
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_normalize_group_keeps_everything() {
        let scope = Scope::Group {
            id: "grp-1".to_string(),
        };
        let records = vec![
            record("a", "2025-06-01T00:00:00Z", Some("grp-1")),
            record("b", "2025-06-02T00:00:00Z", Some("grp-1")),
        ];

        let normalized = normalize_listing(&scope, records);
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn test_normalize_sorts_newest_first() {
        let scope = Scope::Group {
            id: "grp-1".to_string(),
        };
        let records = vec![
            record("old", "2025-06-01T00:00:00Z", Some("grp-1")),
            record("new", "2025-06-20T00:00:00Z", Some("grp-1")),
            record("mid", "2025-06-10T00:00:00Z", Some("grp-1")),
        ];

        let normalized = normalize_listing(&scope, records);
        let ids: Vec<&str> = normalized.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
