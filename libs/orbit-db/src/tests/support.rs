//! Shared test utilities: an in-memory pool, a test entity and seed data.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{EntityTrait, Set};

use crate::config::{DbConfig, PoolCfg};
use crate::manager::DbManager;
use crate::repository::Repository;
use crate::Result;

pub mod item {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "items")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Single-connection in-memory pool.
///
/// One connection keeps the in-memory database alive for the manager's
/// lifetime, and doubles as a leak detector: a session that is never
/// released starves the next acquire until the timeout below trips.
pub fn memory_config() -> DbConfig {
    DbConfig {
        dsn: "sqlite::memory:".to_owned(),
        pool: PoolCfg {
            max_conns: Some(1),
            min_conns: Some(1),
            acquire_timeout: Some(Duration::from_secs(5)),
            ..PoolCfg::default()
        },
    }
}

pub async fn setup_manager() -> Result<Arc<DbManager>> {
    let manager = DbManager::new();
    manager.configure(&memory_config()).await?;
    manager.init_schema(item::Entity).await?;
    Ok(Arc::new(manager))
}

/// Insert rows named "Item 01".."Item NN" with monotonic ids.
pub async fn seed_items(manager: &DbManager, count: i64) -> Result<()> {
    let session = manager.session().await?;
    for i in 1..=count {
        item::Entity::insert(item::ActiveModel {
            id: Set(i),
            name: Set(format!("Item {i:02}")),
        })
        .exec(session.conn())
        .await?;
    }
    session.commit().await
}

/// A repository over a fresh manager seeded with 25 items.
pub async fn seeded_repo() -> Result<Repository> {
    let manager = setup_manager().await?;
    seed_items(&manager, 25).await?;
    Ok(Repository::new(manager))
}
