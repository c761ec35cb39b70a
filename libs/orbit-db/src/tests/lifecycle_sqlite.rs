use std::time::Duration;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::support::{self, item};
use crate::config::{DbConfig, PoolCfg};
use crate::manager::DbManager;
use crate::repository::Repository;
use crate::{DbError, PageParams};

#[tokio::test]
async fn operations_before_configure_fail_with_not_configured() {
    let manager = DbManager::new();
    assert!(!manager.is_configured());

    assert!(matches!(
        manager.session().await.unwrap_err(),
        DbError::NotConfigured
    ));
    assert!(matches!(
        manager.init_schema(item::Entity).await.unwrap_err(),
        DbError::NotConfigured
    ));
    assert!(matches!(
        manager.teardown().await.unwrap_err(),
        DbError::NotConfigured
    ));
}

#[tokio::test]
async fn configure_twice_is_rejected_and_keeps_the_pool_alive() {
    let manager = support::setup_manager().await.unwrap();

    let err = manager.configure(&support::memory_config()).await.unwrap_err();
    assert!(matches!(err, DbError::AlreadyConfigured));

    // The original pool is untouched.
    let session = manager.session().await.unwrap();
    session.rollback().await.unwrap();
}

#[tokio::test]
async fn teardown_resets_and_reconfigure_works() {
    let manager = support::setup_manager().await.unwrap();
    manager.teardown().await.unwrap();
    assert!(!manager.is_configured());

    assert!(matches!(
        manager.session().await.unwrap_err(),
        DbError::NotConfigured
    ));

    // A fresh configure is required before reuse, and suffices.
    manager.configure(&support::memory_config()).await.unwrap();
    manager.init_schema(item::Entity).await.unwrap();
    let session = manager.session().await.unwrap();
    session.commit().await.unwrap();

    manager.teardown().await.unwrap();
}

#[tokio::test]
async fn init_schema_is_idempotent() {
    let manager = support::setup_manager().await.unwrap();

    // Table already exists; the second call must be a no-op, not an error.
    manager.init_schema(item::Entity).await.unwrap();

    support::seed_items(&manager, 3).await.unwrap();
    manager.init_schema(item::Entity).await.unwrap();

    let session = manager.session().await.unwrap();
    let rows = item::Entity::find().all(session.conn()).await.unwrap();
    session.rollback().await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn dropped_session_rolls_back_and_releases_the_connection() {
    let manager = support::setup_manager().await.unwrap();
    support::seed_items(&manager, 3).await.unwrap();

    {
        let session = manager.session().await.unwrap();
        item::Entity::delete_many()
            .filter(item::Column::Id.gte(1))
            .exec(session.conn())
            .await
            .unwrap();
        // Dropped without commit: the delete must not stick, and the single
        // pooled connection must come back.
    }

    let session = manager.session().await.unwrap();
    let rows = item::Entity::find().all(session.conn()).await.unwrap();
    session.rollback().await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn connect_failures_are_typed() {
    let manager = DbManager::new();

    let err = manager
        .configure(&DbConfig::new("unknown://nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UnknownDsn(_)));
    assert!(!manager.is_configured());

    #[cfg(not(feature = "pg"))]
    {
        let err = manager
            .configure(&DbConfig::new("postgres://localhost/app"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::FeatureDisabled("pg")));
    }
}

#[tokio::test]
async fn file_backed_database_survives_a_manager_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let dsn = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("orbit.db").display()
    );
    let cfg = DbConfig {
        dsn,
        pool: PoolCfg {
            max_conns: Some(1),
            acquire_timeout: Some(Duration::from_secs(5)),
            ..PoolCfg::default()
        },
    };

    let manager = DbManager::new();
    manager.configure(&cfg).await.unwrap();
    manager.init_schema(item::Entity).await.unwrap();
    support::seed_items(&manager, 5).await.unwrap();
    manager.teardown().await.unwrap();

    // Same file, fresh pool: the data is still there.
    manager.configure(&cfg).await.unwrap();
    let repo = Repository::new(std::sync::Arc::new(manager));
    let page = repo
        .paginate_query(item::Entity::find(), PageParams::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.total, 5);
}
