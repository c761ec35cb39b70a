//! Connected database handle.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, TransactionTrait};
use tracing::info;

use crate::config::{DbConfig, redact_dsn};
use crate::session::DbSession;
use crate::{DbError, Result};

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    MySql,
    Sqlite,
}

impl DbEngine {
    fn enabled(self) -> bool {
        match self {
            DbEngine::Postgres => cfg!(feature = "pg"),
            DbEngine::MySql => cfg!(feature = "mysql"),
            DbEngine::Sqlite => cfg!(feature = "sqlite"),
        }
    }

    fn feature_name(self) -> &'static str {
        match self {
            DbEngine::Postgres => "pg",
            DbEngine::MySql => "mysql",
            DbEngine::Sqlite => "sqlite",
        }
    }
}

/// One connected pool plus the metadata needed for diagnostics.
///
/// The handle is cheap to clone; clones share the same pool.
#[derive(Clone, Debug)]
pub struct DbHandle {
    engine: DbEngine,
    conn: DatabaseConnection,
    dsn: String,
}

impl DbHandle {
    /// Detect engine by DSN.
    ///
    /// Note: we only check scheme prefixes and don't mutate the tail
    /// (credentials etc.).
    ///
    /// # Errors
    /// Returns [`DbError::UnknownDsn`] if the DSN scheme is not recognized.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        // Trim only leading spaces/newlines to be forgiving with env files.
        let s = dsn.trim_start();

        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("mysql://") {
            Ok(DbEngine::MySql)
        } else if s.starts_with("sqlite:") || s.starts_with("sqlite://") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(dsn.to_owned()))
        }
    }

    /// Connect and build handle.
    ///
    /// # Errors
    /// Returns [`DbError::UnknownDsn`] for an unrecognized scheme,
    /// [`DbError::FeatureDisabled`] when the engine's cargo feature is off,
    /// and [`DbError::Storage`] if the connection itself fails.
    pub async fn connect(cfg: &DbConfig) -> Result<Self> {
        let engine = Self::detect(&cfg.dsn)?;
        if !engine.enabled() {
            return Err(DbError::FeatureDisabled(engine.feature_name()));
        }

        let mut opts = ConnectOptions::new(&cfg.dsn);
        if let Some(n) = cfg.pool.max_conns {
            opts.max_connections(n);
        }
        if let Some(n) = cfg.pool.min_conns {
            opts.min_connections(n);
        }
        if let Some(t) = cfg.pool.acquire_timeout {
            opts.acquire_timeout(t);
        }
        if let Some(t) = cfg.pool.idle_timeout {
            opts.idle_timeout(t);
        }
        if let Some(t) = cfg.pool.max_lifetime {
            opts.max_lifetime(t);
        }
        opts.sqlx_logging(cfg.pool.sqlx_logging);

        let conn = Database::connect(opts).await?;
        info!(dsn = %redact_dsn(&cfg.dsn), "database pool connected");

        Ok(Self {
            engine,
            conn,
            dsn: cfg.dsn.clone(),
        })
    }

    /// Get the backend.
    #[must_use]
    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    /// Get the DSN used for this connection.
    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Raw connection, for schema setup and ad-hoc use.
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Begin a scoped session (one transaction).
    ///
    /// # Errors
    /// Returns an error if the transaction cannot be started.
    pub async fn begin(&self) -> Result<DbSession> {
        let txn = self.conn.begin().await?;
        Ok(DbSession::new(txn))
    }

    /// Graceful pool close. (Dropping the pool also closes it; this just
    /// makes it explicit.)
    ///
    /// # Errors
    /// Returns an error if the underlying pool close fails.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}
