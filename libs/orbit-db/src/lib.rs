#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Orbit database access core.
//!
//! This crate turns an arbitrary `SeaORM` select into a bounded, paginated,
//! optionally-transformed result set while managing the lifecycle of the
//! unit of work (session) that executes it:
//!
//! - [`DbManager`] owns the connection pool with an explicit
//!   configure → ready → teardown lifecycle (dependency-injected, no global
//!   state);
//! - [`DbSession`] is a scoped unit of work whose release is guaranteed on
//!   every exit path, cancellation included;
//! - [`Repository`] is the façade: paginate within a caller-supplied session,
//!   or let the convenience path manage one internally;
//! - the pagination engine in [`paginate`](mod@paginate) computes the total
//!   row count independently of the page slice and applies offset/limit
//!   bounds, feeding each fetched row through an optional [`Transformer`].
//!
//! # Features
//! - `pg`, `mysql`, `sqlite`: enable the corresponding `SeaORM`/`SQLx`
//!   backends (`sqlite` is on by default)
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use orbit_db::{DbConfig, DbManager, PageParams, Repository};
//! # async fn demo<E: sea_orm::EntityTrait>() -> orbit_db::Result<()>
//! # where E::Model: Send + Sync {
//! let manager = Arc::new(DbManager::new());
//! manager.configure(&DbConfig::new("sqlite::memory:")).await?;
//!
//! let repo = Repository::new(Arc::clone(&manager));
//! let page = repo
//!     .paginate_query(E::find(), PageParams::new(1, 20))
//!     .await?;
//! println!("{} of {} rows", page.len(), page.total);
//!
//! manager.teardown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod handle;
pub mod manager;
pub mod paginate;
pub mod repository;
pub mod session;

pub use config::{DbConfig, PoolCfg, redact_dsn};
pub use handle::{DbEngine, DbHandle};
pub use manager::DbManager;
pub use paginate::{TransformError, Transformer};
pub use repository::Repository;
pub use session::DbSession;

// Pagination value types are re-exported so callers that never touch the
// page crate directly still get a complete API surface here.
pub use orbit_page::{DEFAULT_PAGE_SIZE, Page, PageError, PageParams};

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the data-access core.
///
/// The four operational classes callers branch on:
/// - configuration: [`DbError::NotConfigured`] / [`DbError::AlreadyConfigured`]
/// - validation: [`DbError::Page`], surfaced before any storage access
/// - storage: [`DbError::Storage`], propagated unchanged and never retried
///   here (retry policy belongs to the caller or a resilience layer)
/// - transformation: [`DbError::Transform`], distinct from storage so
///   "query failed" and "result shape mismatch" stay distinguishable
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database manager is not configured")]
    NotConfigured,

    #[error("database manager is already configured; tear it down first")]
    AlreadyConfigured,

    #[error("unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Page(#[from] orbit_page::PageError),

    #[error(transparent)]
    Storage(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests;
