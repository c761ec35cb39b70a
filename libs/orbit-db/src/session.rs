//! Scoped unit of work.

use sea_orm::DatabaseTransaction;

use crate::Result;

/// A scoped unit of work bound to one logical operation.
///
/// Wraps a single database transaction. All reads and writes issued through
/// [`DbSession::conn`] share its transactional context until the session is
/// committed or rolled back. A session is exclusively owned: it is not
/// `Clone`, and commit/rollback consume it, so exactly one logical operation
/// can be in flight against it at a time.
///
/// Dropping a session that was neither committed nor rolled back rolls the
/// transaction back and returns the connection to the pool. That makes
/// release deterministic on every exit path: normal return, early return,
/// error propagation, and task cancellation.
#[derive(Debug)]
pub struct DbSession {
    txn: DatabaseTransaction,
}

impl DbSession {
    pub(crate) fn new(txn: DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// The transaction to execute queries against within this session.
    #[must_use]
    pub fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commit the unit of work and release the underlying connection.
    ///
    /// # Errors
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<()> {
        self.txn.commit().await?;
        Ok(())
    }

    /// Roll the unit of work back and release the underlying connection.
    ///
    /// # Errors
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}
