//! Pagination engine and per-row transformation.
//!
//! Given a caller-built select, a page request and an optional transformer,
//! the engine issues two round trips against the supplied connection: a
//! `COUNT` derived from the select's predicate, then an offset/limit fetch
//! preserving the select's declared ordering. The count always runs first.
//!
//! Two properties are deliberate and documented rather than fixed here:
//!
//! - the count and the fetch share no snapshot, so under concurrent writes
//!   `total` and `items` can disagree (the classic offset-pagination race);
//!   acceptable for the admin-style listing this layer targets;
//! - ordering is the caller's responsibility; an unordered select yields
//!   storage-defined page boundaries.

use orbit_page::{Page, PageParams};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect, Select};
use tracing::debug;

use crate::Result;

/// Error produced when a fetched row cannot be converted into its external
/// representation.
#[derive(Debug, thiserror::Error)]
#[error("transformation failed: {message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Pure per-row mapping from a fetched entity to an external representation.
///
/// Invoked once per row, in order, on already-fetched in-memory data.
/// Implementations must not re-query storage and must not need the
/// originating session: outputs stay usable after the session is released.
/// An entity whose attribute set is a superset of what the representation
/// needs is fine: transformers project, they don't reshape queries.
///
/// Any `Fn(M) -> Result<T, TransformError>` implements this trait, so plain
/// functions and closures work as transformers.
pub trait Transformer<M> {
    type Output;

    /// Convert one entity into one representation.
    ///
    /// # Errors
    /// Returns [`TransformError`] when the row does not fit the
    /// representation.
    fn transform(&self, model: M) -> std::result::Result<Self::Output, TransformError>;
}

impl<M, T, F> Transformer<M> for F
where
    F: Fn(M) -> std::result::Result<T, TransformError>,
{
    type Output = T;

    fn transform(&self, model: M) -> std::result::Result<T, TransformError> {
        self(model)
    }
}

/// Count, then fetch one bounded slice. Shared by both entry points so the
/// query logic exists exactly once.
async fn count_and_fetch<E, C>(
    conn: &C,
    query: Select<E>,
    params: PageParams,
) -> Result<(u64, Vec<E::Model>)>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    params.validate()?;

    // COUNT over the same predicate, indifferent to the page slice.
    let total = query.clone().count(conn).await?;

    // An offset at or past `total` simply yields zero rows; that is a valid
    // outcome, not an error.
    let rows = query
        .offset(params.offset())
        .limit(params.size)
        .all(conn)
        .await?;

    debug!(
        page = params.page,
        size = params.size,
        total,
        rows = rows.len(),
        "executed paginated query"
    );
    Ok((total, rows))
}

/// Execute `query` as one bounded page of native entities.
///
/// # Errors
/// Returns [`DbError::Page`](crate::DbError::Page) for invalid `params`
/// (before any storage access) and [`DbError::Storage`](crate::DbError::Storage)
/// if the count or fetch fails.
pub async fn paginate<E, C>(conn: &C, query: Select<E>, params: PageParams) -> Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let (total, rows) = count_and_fetch(conn, query, params).await?;
    Ok(Page::new(rows, total, params))
}

/// Execute `query` as one bounded page, feeding every fetched row through
/// `transformer`.
///
/// # Errors
/// As [`paginate`], plus [`DbError::Transform`](crate::DbError::Transform)
/// when the transformer rejects a row.
pub async fn paginate_with<E, C, T>(
    conn: &C,
    query: Select<E>,
    params: PageParams,
    transformer: &T,
) -> Result<Page<T::Output>>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
    T: Transformer<E::Model> + ?Sized,
{
    let (total, rows) = count_and_fetch(conn, query, params).await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(transformer.transform(row)?);
    }
    Ok(Page::new(items, total, params))
}
