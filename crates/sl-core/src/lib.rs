//! Core types and sync machinery for spend-ledger (sl)
//!
//! This crate provides the data model and synchronization layer for a
//! personal/group expense ledger backed by a remote items/groups/users
//! gateway and a local offline cache.
//!
//! All wire-facing schema types are designed to:
//! - Preserve unknown fields for forward compatibility
//! - Use proper serde configuration for the gateway's camelCase field names
//! - Support round-trip serialization without data loss

pub mod cache;
pub mod config;
pub mod dates;
pub mod gateway;
pub mod home;
pub mod logging;
pub mod provider;
pub mod report;
pub mod schema;

pub use schema::{
    Allocation, Group, MemberSummary, Necessity, SpendingKind, SpendingRecord, UserProfile,
};

// Re-export toml for config table access
pub use toml;
