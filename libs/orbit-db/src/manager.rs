//! Explicit connection lifecycle.

use parking_lot::RwLock;
use sea_orm::{ConnectionTrait, EntityTrait, Schema};
use tracing::info;

use crate::config::DbConfig;
use crate::handle::DbHandle;
use crate::session::DbSession;
use crate::{DbError, Result};

/// Dependency-injected connection manager.
///
/// Owns the process's pool behind an explicit state machine:
/// unconfigured → [`configure`](DbManager::configure) → ready →
/// [`teardown`](DbManager::teardown) → unconfigured (re-configurable).
/// Construct one per process (or per test), wrap it in an `Arc`, and hand it
/// to the repositories that need it; there is no hidden global state.
///
/// The manager itself is safe to share: independent sessions may be acquired
/// concurrently against the pooled connections.
#[derive(Debug, Default)]
pub struct DbManager {
    handle: RwLock<Option<DbHandle>>,
}

impl DbManager {
    /// A fresh, unconfigured manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Connect the pool described by `cfg` and move to the ready state.
    ///
    /// # Errors
    /// Returns [`DbError::AlreadyConfigured`] if the manager is already
    /// ready (tear it down first), or any connection error from the driver.
    pub async fn configure(&self, cfg: &DbConfig) -> Result<()> {
        if self.handle.read().is_some() {
            return Err(DbError::AlreadyConfigured);
        }

        let handle = DbHandle::connect(cfg).await?;

        let mut slot = self.handle.write();
        if slot.is_some() {
            // Lost a configure race; the freshly built pool closes on drop.
            return Err(DbError::AlreadyConfigured);
        }
        *slot = Some(handle);
        Ok(())
    }

    /// Whether the manager currently holds a connected pool.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.handle.read().is_some()
    }

    fn handle(&self) -> Result<DbHandle> {
        self.handle
            .read()
            .as_ref()
            .cloned()
            .ok_or(DbError::NotConfigured)
    }

    /// Create the table for entity `E` if it does not exist yet.
    ///
    /// Safe to call repeatedly; an existing table is left untouched.
    ///
    /// # Errors
    /// Returns [`DbError::NotConfigured`] before `configure`, or the
    /// driver's error if the DDL statement fails.
    pub async fn init_schema<E: EntityTrait>(&self, entity: E) -> Result<()> {
        let handle = self.handle()?;
        let conn = handle.conn();

        let backend = conn.get_database_backend();
        let mut stmt = Schema::new(backend).create_table_from_entity(entity);
        stmt.if_not_exists();
        conn.execute(backend.build(&stmt)).await?;
        Ok(())
    }

    /// Acquire a scoped session bound to this manager's pool.
    ///
    /// # Errors
    /// Returns [`DbError::NotConfigured`] before `configure` or after
    /// `teardown`, or the driver's error if the transaction cannot start.
    pub async fn session(&self) -> Result<DbSession> {
        let handle = self.handle()?;
        handle.begin().await
    }

    /// Close the pool and reset to the unconfigured state.
    ///
    /// After teardown a fresh [`configure`](DbManager::configure) is
    /// required before reuse.
    ///
    /// # Errors
    /// Returns [`DbError::NotConfigured`] if there is nothing to tear down,
    /// or the driver's error if closing the pool fails.
    pub async fn teardown(&self) -> Result<()> {
        let handle = self.handle.write().take().ok_or(DbError::NotConfigured)?;
        handle.close().await?;
        info!("database pool torn down");
        Ok(())
    }
}
