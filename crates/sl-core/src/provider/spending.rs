//! Spending data provider
//!
//! Holds the record snapshot every view filter reads from. The lifecycle
//! mirrors the original application's data provider: hydrate from the
//! offline store on startup, then refresh per scope/window on demand,
//! replacing the snapshot wholesale and mirroring it back to disk.

use crate::cache::{CacheStore, CachedRecords};
use crate::dates::{self, DateFilter};
use crate::gateway::Scope;
use crate::provider::{ProviderError, RecordSource};
use crate::schema::{Necessity, SpendingKind, SpendingRecord};
use chrono::NaiveDate;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Outcome of a provider refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The snapshot was replaced with fresh gateway data
    Refreshed {
        /// Number of records in the new snapshot
        count: usize,
        /// Whether the offline mirror was written successfully
        mirrored: bool,
    },
    /// A newer refresh started while this one was in flight; its result
    /// was discarded (last response to resolve wins)
    Superseded,
}

/// View filter over the provider snapshot
///
/// All axes are optional; an empty filter passes everything. Filtering is
/// pure and runs against the in-memory snapshot, so many simultaneous
/// views can slice the same data without further I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFilter<'a> {
    /// Only records owned by this member email
    pub member_email: Option<&'a str>,
    /// Only records in this scope (personal scope excludes group records)
    pub scope: Option<&'a Scope>,
    /// Only records matching this date anchor at the given granularity
    pub anchor: Option<(NaiveDate, DateFilter)>,
    /// Only records of this kind
    pub kind: Option<SpendingKind>,
    /// Only records of this necessity
    pub necessity: Option<Necessity>,
}

impl RecordFilter<'_> {
    /// Whether a record passes every set axis.
    pub fn matches(&self, record: &SpendingRecord) -> bool {
        if let Some(email) = self.member_email
            && !email.is_empty()
            && record.user_token != email
        {
            return false;
        }
        if let Some(scope) = self.scope
            && !record.in_group(scope.group_id())
        {
            return false;
        }
        if let Some((anchor, granularity)) = self.anchor
            && !dates::matches(&record.date, anchor, granularity)
        {
            return false;
        }
        if let Some(kind) = self.kind
            && record.kind != kind
        {
            return false;
        }
        if let Some(necessity) = self.necessity
            && record.necessity != necessity
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Default)]
struct State {
    records: Vec<SpendingRecord>,
    scope_key: Option<String>,
    /// True once a gateway refresh has populated the snapshot (as opposed
    /// to a cache hydration or nothing at all)
    fresh: bool,
}

/// The spending data provider
#[derive(Debug)]
pub struct SpendingProvider<S> {
    source: S,
    store: Option<CacheStore>,
    state: Mutex<State>,
    generation: AtomicU64,
}

impl<S: RecordSource> SpendingProvider<S> {
    /// A provider over `source`, mirroring to `store` when given.
    pub fn new(source: S, store: Option<CacheStore>) -> Self {
        Self {
            source,
            store,
            state: Mutex::new(State::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Opportunistically adopt the offline snapshot.
    ///
    /// Called before any network refresh resolves. The adoption is aborted
    /// when a refresh starts (or completes) in the meantime — the cache
    /// must never clobber fresher gateway data. Returns `true` when the
    /// cached snapshot was adopted.
    pub fn hydrate(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let generation_at_start = self.generation.load(Ordering::SeqCst);

        let Some(cached) = store.load_records() else {
            return false;
        };

        let mut state = self.state.lock().expect("provider state poisoned");
        if state.fresh || self.generation.load(Ordering::SeqCst) != generation_at_start {
            debug!("Discarding cache hydration: a refresh superseded it");
            return false;
        }
        debug!(
            "Hydrated {} records from cache ({})",
            cached.records.len(),
            cached.scope
        );
        state.records = cached.records;
        state.scope_key = Some(cached.scope);
        true
    }

    /// Refresh the snapshot from the gateway for a scope and window.
    ///
    /// Replaces the in-memory state and mirrors it to the offline store;
    /// a mirror failure is reported in the outcome but never fails the
    /// refresh. A refresh that loses the race to a newer one returns
    /// [`SyncOutcome::Superseded`] and leaves the state alone.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Gateway`] when the fetch itself fails; the
    /// previous snapshot (cached or fresh) stays intact.
    pub fn sync(
        &self,
        scope: &Scope,
        window: Option<(&str, &str)>,
    ) -> Result<SyncOutcome, ProviderError> {
        // Starting a refresh invalidates any pending hydration and any
        // slower refresh still in flight.
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let records = self.source.fetch_records(scope, window)?;

        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!("Discarding refresh for {}: superseded", scope.cache_key());
            return Ok(SyncOutcome::Superseded);
        }

        let count = records.len();
        {
            let mut state = self.state.lock().expect("provider state poisoned");
            // Re-check under the lock so two finished refreshes can't
            // interleave their state writes out of order.
            if self.generation.load(Ordering::SeqCst) != my_generation {
                return Ok(SyncOutcome::Superseded);
            }
            state.records = records.clone();
            state.scope_key = Some(scope.cache_key());
            state.fresh = true;
        }

        let mirrored = self.mirror(scope, window, records);
        Ok(SyncOutcome::Refreshed { count, mirrored })
    }

    fn mirror(
        &self,
        scope: &Scope,
        window: Option<(&str, &str)>,
        records: Vec<SpendingRecord>,
    ) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        let (window_start, window_end) = match window {
            Some((start, end)) => (start.to_string(), end.to_string()),
            None => (String::new(), String::new()),
        };
        let cached = CachedRecords {
            scope: scope.cache_key(),
            window_start,
            window_end,
            records,
        };
        match store.store_records(&cached) {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache mirror failed: {e}");
                false
            }
        }
    }

    /// Clone of the current snapshot.
    pub fn records(&self) -> Vec<SpendingRecord> {
        self.state
            .lock()
            .expect("provider state poisoned")
            .records
            .clone()
    }

    /// Records passing a view filter.
    pub fn filtered(&self, filter: &RecordFilter<'_>) -> Vec<SpendingRecord> {
        self.state
            .lock()
            .expect("provider state poisoned")
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Whether the snapshot came from the gateway (vs cache or nothing).
    pub fn is_fresh(&self) -> bool {
        self.state.lock().expect("provider state poisoned").fresh
    }

    /// The cache key of the scope the snapshot answers, if any.
    pub fn scope_key(&self) -> Option<String> {
        self.state
            .lock()
            .expect("provider state poisoned")
            .scope_key
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use std::collections::HashMap;
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex as StdMutex};
    use tempfile::TempDir;

    fn record(id: &str, date: &str) -> SpendingRecord {
        SpendingRecord {
            id: id.to_string(),
            user_token: "ana@example.com".to_string(),
            kind: SpendingKind::Outcome,
            necessity: Necessity::Need,
            category: "food".to_string(),
            description: String::new(),
            amount: 100.0,
            date: date.to_string(),
            group_id: None,
            unknown_fields: HashMap::new(),
        }
    }

    fn personal_scope() -> Scope {
        Scope::Personal {
            email: "ana@example.com".to_string(),
        }
    }

    /// Scripted record source: pops one canned response per fetch. The
    /// optional gate makes the *first* fetch announce itself and then block
    /// until released, so tests can order overlapping refreshes.
    struct FakeSource {
        responses: StdMutex<Vec<Result<Vec<SpendingRecord>, GatewayError>>>,
        gate: StdMutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
        calls: AtomicU64,
    }

    impl FakeSource {
        fn with_responses(responses: Vec<Result<Vec<SpendingRecord>, GatewayError>>) -> Self {
            Self {
                responses: StdMutex::new(responses),
                gate: StdMutex::new(None),
                calls: AtomicU64::new(0),
            }
        }

        fn gateway_down() -> GatewayError {
            GatewayError::Status {
                status: 503,
                endpoint: "GET /items".to_string(),
            }
        }
    }

    impl RecordSource for FakeSource {
        fn fetch_records(
            &self,
            _scope: &Scope,
            _window: Option<(&str, &str)>,
        ) -> Result<Vec<SpendingRecord>, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            // Pop the response before blocking so later calls get later
            // responses regardless of how long this one is held.
            let response = self.responses.lock().unwrap().remove(0);
            if call == 1 {
                let gate = self.gate.lock().unwrap().take();
                if let Some((started_tx, release_rx)) = gate {
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                }
            }
            response
        }
    }

    #[test]
    fn test_sync_replaces_snapshot_and_mirrors() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        let source = FakeSource::with_responses(vec![Ok(vec![
            record("rec-1", "2025-06-03T00:00:00Z"),
            record("rec-2", "2025-06-02T00:00:00Z"),
        ])]);
        let provider = SpendingProvider::new(source, Some(store.clone()));

        let outcome = provider
            .sync(
                &personal_scope(),
                Some(("2025-06-01T00:00:00Z", "2025-07-01T00:00:00Z")),
            )
            .unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::Refreshed {
                count: 2,
                mirrored: true
            }
        );
        assert_eq!(provider.records().len(), 2);
        assert!(provider.is_fresh());
        assert_eq!(
            provider.scope_key().as_deref(),
            Some("user:ana@example.com")
        );

        // Mirror landed on disk
        let cached = store.load_records().unwrap();
        assert_eq!(cached.records.len(), 2);
        assert_eq!(cached.window_start, "2025-06-01T00:00:00Z");
    }

    #[test]
    fn test_failed_sync_keeps_previous_snapshot() {
        let source = FakeSource::with_responses(vec![
            Ok(vec![record("rec-1", "2025-06-03T00:00:00Z")]),
            Err(FakeSource::gateway_down()),
        ]);
        let provider = SpendingProvider::new(source, None);

        provider.sync(&personal_scope(), None).unwrap();
        let err = provider.sync(&personal_scope(), None).unwrap_err();
        assert!(matches!(err, ProviderError::Gateway(_)));

        // Old data stays
        assert_eq!(provider.records().len(), 1);
        assert_eq!(provider.records()[0].id, "rec-1");
    }

    #[test]
    fn test_hydrate_adopts_cache_before_any_sync() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        store
            .store_records(&CachedRecords {
                scope: "user:ana@example.com".to_string(),
                window_start: String::new(),
                window_end: String::new(),
                records: vec![record("cached-1", "2025-05-20T00:00:00Z")],
            })
            .unwrap();

        let source = FakeSource::with_responses(vec![]);
        let provider = SpendingProvider::new(source, Some(store));

        assert!(provider.hydrate());
        assert_eq!(provider.records().len(), 1);
        assert!(!provider.is_fresh());
    }

    #[test]
    fn test_hydrate_after_sync_is_discarded() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        store
            .store_records(&CachedRecords {
                scope: "user:ana@example.com".to_string(),
                window_start: String::new(),
                window_end: String::new(),
                records: vec![record("cached-1", "2025-05-20T00:00:00Z")],
            })
            .unwrap();

        let source =
            FakeSource::with_responses(vec![Ok(vec![record("fresh-1", "2025-06-03T00:00:00Z")])]);
        let provider = SpendingProvider::new(source, Some(store));

        provider.sync(&personal_scope(), None).unwrap();
        // The late hydration must not clobber fresh data
        assert!(!provider.hydrate());
        assert_eq!(provider.records()[0].id, "fresh-1");
    }

    #[test]
    fn test_slow_refresh_is_superseded_by_newer_one() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let source = FakeSource::with_responses(vec![
            Ok(vec![record("slow-1", "2025-06-01T00:00:00Z")]),
            Ok(vec![record("fast-1", "2025-06-02T00:00:00Z")]),
        ]);
        *source.gate.lock().unwrap() = Some((started_tx, release_rx));

        let provider = Arc::new(SpendingProvider::new(source, None));

        // Slow refresh: announces itself, then blocks inside fetch
        let slow = {
            let provider = Arc::clone(&provider);
            std::thread::spawn(move || provider.sync(&personal_scope(), None).unwrap())
        };
        started_rx.recv().unwrap();

        // Fast refresh completes while the slow one is still in flight
        let outcome = provider.sync(&personal_scope(), None).unwrap();
        assert!(matches!(outcome, SyncOutcome::Refreshed { count: 1, .. }));

        // Unblock the slow refresh; its (older) result must be discarded
        release_tx.send(()).unwrap();
        assert_eq!(slow.join().unwrap(), SyncOutcome::Superseded);
        assert_eq!(provider.records()[0].id, "fast-1");
    }

    #[test]
    fn test_filter_axes() {
        let mut grouped = record("grp-rec", "2025-06-03T00:00:00Z");
        grouped.group_id = Some("grp-1".to_string());
        grouped.user_token = "bo@example.com".to_string();
        grouped.kind = SpendingKind::Income;
        grouped.necessity = Necessity::NotNeed;

        let personal = record("personal-rec", "2025-05-03T00:00:00Z");

        let source = FakeSource::with_responses(vec![Ok(vec![grouped, personal])]);
        let provider = SpendingProvider::new(source, None);
        provider
            .sync(
                &Scope::Group {
                    id: "grp-1".to_string(),
                },
                None,
            )
            .unwrap();

        // Member axis
        let by_member = provider.filtered(&RecordFilter {
            member_email: Some("bo@example.com"),
            ..Default::default()
        });
        assert_eq!(by_member.len(), 1);
        assert_eq!(by_member[0].id, "grp-rec");

        // Empty member email means "everyone"
        let all = provider.filtered(&RecordFilter {
            member_email: Some(""),
            ..Default::default()
        });
        assert_eq!(all.len(), 2);

        // Scope axis
        let group_scope = Scope::Group {
            id: "grp-1".to_string(),
        };
        let in_group = provider.filtered(&RecordFilter {
            scope: Some(&group_scope),
            ..Default::default()
        });
        assert_eq!(in_group.len(), 1);

        // Date axis
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let by_day = provider.filtered(&RecordFilter {
            anchor: Some((anchor, DateFilter::Day)),
            ..Default::default()
        });
        assert_eq!(by_day.len(), 1);
        assert_eq!(by_day[0].id, "grp-rec");

        // Kind and necessity axes
        let by_kind = provider.filtered(&RecordFilter {
            kind: Some(SpendingKind::Income),
            ..Default::default()
        });
        assert_eq!(by_kind.len(), 1);
        let by_necessity = provider.filtered(&RecordFilter {
            necessity: Some(Necessity::Need),
            ..Default::default()
        });
        assert_eq!(by_necessity.len(), 1);
        assert_eq!(by_necessity[0].id, "personal-rec");
    }

    #[test]
    fn test_mirror_failure_does_not_fail_sync() {
        let temp = TempDir::new().unwrap();
        // Point the store at a path that is a *file*, so writes fail
        let bogus = temp.path().join("not-a-dir");
        std::fs::write(&bogus, b"x").unwrap();
        let store = CacheStore::new(bogus.join("cache"));

        let source =
            FakeSource::with_responses(vec![Ok(vec![record("rec-1", "2025-06-03T00:00:00Z")])]);
        let provider = SpendingProvider::new(source, Some(store));

        let outcome = provider.sync(&personal_scope(), None).unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::Refreshed {
                count: 1,
                mirrored: false
            }
        );
        assert_eq!(provider.records().len(), 1);
    }
}
