//! Repository façade over the manager, sessions and the pagination engine.

use std::sync::Arc;

use orbit_page::{Page, PageParams};
use sea_orm::{EntityTrait, Select};

use crate::Result;
use crate::manager::DbManager;
use crate::paginate::{self, Transformer};
use crate::session::DbSession;

/// Data-access façade bound to one [`DbManager`].
///
/// Queries are built by the caller (any `SeaORM` select, filtered and
/// ordered as needed); the repository only decides how they execute: within
/// a caller-supplied session, or within one it manages itself.
#[derive(Clone, Debug)]
pub struct Repository {
    manager: Arc<DbManager>,
}

impl Repository {
    #[must_use]
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }

    /// Acquire a session from the configured manager.
    ///
    /// Pass-through acquisition with no pooling policy of its own. The caller
    /// owns the returned session and decides when (and whether) to commit.
    ///
    /// # Errors
    /// Returns [`DbError::NotConfigured`](crate::DbError::NotConfigured)
    /// while the manager is unconfigured.
    pub async fn session(&self) -> Result<DbSession> {
        self.manager.session().await
    }

    /// Paginate within an existing, caller-supplied session.
    ///
    /// The caller keeps control of transaction boundaries before and after
    /// this call, and remains responsible for releasing the session.
    ///
    /// # Errors
    /// See [`paginate::paginate`].
    pub async fn paginate<E>(
        &self,
        session: &DbSession,
        query: Select<E>,
        params: PageParams,
    ) -> Result<Page<E::Model>>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        paginate::paginate(session.conn(), query, params).await
    }

    /// Like [`Repository::paginate`], with every row fed through
    /// `transformer`.
    ///
    /// # Errors
    /// See [`paginate::paginate_with`].
    pub async fn paginate_with<E, T>(
        &self,
        session: &DbSession,
        query: Select<E>,
        params: PageParams,
        transformer: &T,
    ) -> Result<Page<T::Output>>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
        T: Transformer<E::Model> + ?Sized,
    {
        paginate::paginate_with(session.conn(), query, params, transformer).await
    }

    /// Convenience path: paginate inside an internally-acquired session.
    ///
    /// Equivalent to [`Repository::session`] + [`Repository::paginate`] with
    /// guaranteed release: commit on success, best-effort rollback on
    /// failure, and rollback-on-drop if the calling task is cancelled
    /// mid-flight. Use this when there is nothing else to batch into the
    /// same transaction.
    ///
    /// # Errors
    /// See [`paginate::paginate`]; also fails if the session cannot be
    /// acquired or committed.
    pub async fn paginate_query<E>(
        &self,
        query: Select<E>,
        params: PageParams,
    ) -> Result<Page<E::Model>>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        let session = self.session().await?;
        match paginate::paginate(session.conn(), query, params).await {
            Ok(page) => {
                session.commit().await?;
                Ok(page)
            }
            Err(err) => {
                // Best-effort rollback; preserve the original error.
                let _ = session.rollback().await;
                Err(err)
            }
        }
    }

    /// Like [`Repository::paginate_query`], with every row fed through
    /// `transformer`.
    ///
    /// # Errors
    /// See [`paginate::paginate_with`]; also fails if the session cannot be
    /// acquired or committed.
    pub async fn paginate_query_with<E, T>(
        &self,
        query: Select<E>,
        params: PageParams,
        transformer: &T,
    ) -> Result<Page<T::Output>>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
        T: Transformer<E::Model> + ?Sized,
    {
        let session = self.session().await?;
        match paginate::paginate_with(session.conn(), query, params, transformer).await {
            Ok(page) => {
                session.commit().await?;
                Ok(page)
            }
            Err(err) => {
                let _ = session.rollback().await;
                Err(err)
            }
        }
    }
}
