//! Integration tests for the offline fallback paths
//!
//! The gateway URL points at a closed loopback port, so every network call
//! fails immediately; commands must degrade to the cache seeded under a
//! tempdir `SL_HOME` (or fail cleanly when there is no cache).

use assert_cmd::Command;
use chrono::{Datelike, Local};
use predicates::prelude::*;
use spend_ledger_core::cache::{CacheStore, CachedRecords};
use spend_ledger_core::schema::{Necessity, SpendingKind, SpendingRecord, UserProfile};
use std::collections::HashMap;
use tempfile::TempDir;

const DEAD_GATEWAY: &str = "http://127.0.0.1:1";
const EMAIL: &str = "ana@example.com";

fn sl_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sl").unwrap();
    cmd.env("SL_HOME", temp_dir.path())
        .env("SL_EMAIL", EMAIL)
        .env("SL_GATEWAY_URL", DEAD_GATEWAY)
        .env_remove("SL_GROUP")
        .current_dir(temp_dir.path());
    cmd
}

fn cache_store(temp_dir: &TempDir) -> CacheStore {
    CacheStore::new(temp_dir.path().join(".spend-ledger/cache"))
}

/// A record dated inside the current month so default filters keep it.
fn current_month_record(id: &str, description: &str, amount: f64) -> SpendingRecord {
    let today = Local::now().date_naive();
    SpendingRecord {
        id: id.to_string(),
        user_token: EMAIL.to_string(),
        kind: SpendingKind::Outcome,
        necessity: Necessity::Need,
        category: "food".to_string(),
        description: description.to_string(),
        amount,
        date: format!("{}T00:00:00Z", today.format("%Y-%m-%d")),
        group_id: None,
        unknown_fields: HashMap::new(),
    }
}

fn seed_records(temp_dir: &TempDir, records: Vec<SpendingRecord>) {
    let today = Local::now().date_naive();
    let window =
        spend_ledger_core::dates::month_window(today.year(), today.month()).unwrap();
    cache_store(temp_dir)
        .store_records(&CachedRecords {
            scope: format!("user:{EMAIL}"),
            window_start: window.0,
            window_end: window.1,
            records,
        })
        .unwrap();
}

#[test]
fn test_list_falls_back_to_cache() {
    let temp_dir = TempDir::new().unwrap();
    seed_records(
        &temp_dir,
        vec![current_month_record("rec-1", "groceries", 420.0)],
    );

    sl_cmd(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("groceries"))
        .stderr(predicate::str::contains("gateway unreachable"));
}

#[test]
fn test_list_without_cache_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();

    sl_cmd(&temp_dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load records"));
}

#[test]
fn test_list_json_marks_cached_data_as_stale() {
    let temp_dir = TempDir::new().unwrap();
    seed_records(
        &temp_dir,
        vec![current_month_record("rec-1", "groceries", 420.0)],
    );

    let output = sl_cmd(&temp_dir)
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["fresh"], false);
    assert_eq!(parsed["records"][0]["id"], "rec-1");
    assert_eq!(parsed["records"][0]["user-token"], EMAIL);
}

#[test]
fn test_report_aggregates_cached_records() {
    let temp_dir = TempDir::new().unwrap();
    let mut fun = current_month_record("rec-2", "cinema", 100.0);
    fun.category = "entertainment".to_string();
    fun.necessity = Necessity::NotNeed;
    seed_records(
        &temp_dir,
        vec![current_month_record("rec-1", "groceries", 300.0), fun],
    );

    let output = sl_cmd(&temp_dir)
        .args(["report", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["outcome"]["total"], 400.0);
    // Category totals must sum to the outcome total
    let categories = parsed["outcome"]["categories"].as_array().unwrap();
    let sum: f64 = categories
        .iter()
        .map(|c| c["total"].as_f64().unwrap())
        .sum();
    assert_eq!(sum, 400.0);
    // 300 of 400 was necessary
    assert_eq!(parsed["outcome"]["necessaryShare"], 75.0);
}

#[test]
fn test_user_falls_back_to_cached_profile() {
    let temp_dir = TempDir::new().unwrap();
    let mut profile = UserProfile::new_default("Ana", EMAIL);
    profile.groups = vec!["grp-1".to_string()];
    cache_store(&temp_dir).store_profile(&profile).unwrap();

    sl_cmd(&temp_dir)
        .arg("user")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana <ana@example.com>"))
        .stdout(predicate::str::contains("grp-1"))
        .stderr(predicate::str::contains("gateway unreachable"));
}

#[test]
fn test_user_without_cache_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();

    sl_cmd(&temp_dir)
        .arg("user")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load the profile"));
}

#[test]
fn test_group_create_refuses_offline() {
    let temp_dir = TempDir::new().unwrap();
    cache_store(&temp_dir)
        .store_profile(&UserProfile::new_default("Ana", EMAIL))
        .unwrap();

    sl_cmd(&temp_dir)
        .args(["group", "create", "Flat 12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gateway is unreachable"));
}

#[test]
fn test_missing_email_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("sl").unwrap();
    cmd.env("SL_HOME", temp_dir.path())
        .env_remove("SL_EMAIL")
        .env_remove("SL_GROUP")
        .env("SL_GATEWAY_URL", DEAD_GATEWAY)
        .current_dir(temp_dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No identity email configured"));
}

#[test]
fn test_corrupt_cache_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let cache_dir = temp_dir.path().join(".spend-ledger/cache");
    std::fs::create_dir_all(&cache_dir).unwrap();
    std::fs::write(cache_dir.join("records.json"), b"{ torn write").unwrap();

    // Corrupt cache must behave exactly like no cache
    sl_cmd(&temp_dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load records"));
}
