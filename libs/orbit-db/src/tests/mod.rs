//! Integration tests against in-memory `SQLite`.
//!
//! Organized as:
//! - `support`: shared manager/entity/seeding utilities
//! - `pagination_sqlite`: pagination engine and repository behavior
//! - `lifecycle_sqlite`: manager state machine and session release

#![cfg(feature = "sqlite")]
#![cfg_attr(coverage_nightly, coverage(off))]

mod support;

mod lifecycle_sqlite;
