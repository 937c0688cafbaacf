//! Transaction-scoped units of work

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::store::{db_err, SeaOrmStore, SeaOrmUnitOfWork};
use crate::domain::repositories::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::DomainResult;

/// Opens a [`SeaOrmUnitOfWork`] per call on the shared pool.
#[derive(Clone)]
pub struct SeaOrmUnitOfWorkFactory {
    db: DatabaseConnection,
}

impl SeaOrmUnitOfWorkFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWorkFactory for SeaOrmUnitOfWorkFactory {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmStore::new(txn)))
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.conn.commit().await.map_err(db_err)
    }
}
