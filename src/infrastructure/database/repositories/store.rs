//! Connection-generic SeaORM store
//!
//! One `SeaOrmStore` implements every domain store over any
//! [`ConnectionTrait`]: a pooled [`DatabaseConnection`] for plain reads, a
//! [`DatabaseTransaction`] for a unit of work.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr};

use crate::domain::account::AccountLedger;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::session::SessionStore;
use crate::domain::tariff::TariffStore;
use crate::domain::vehicle::VehicleDirectory;
use crate::domain::DomainError;

/// Stores over the shared pool; each call runs in its own implicit transaction.
pub type SeaOrmRepositoryProvider = SeaOrmStore<DatabaseConnection>;

/// Stores bound to one open transaction.
pub type SeaOrmUnitOfWork = SeaOrmStore<DatabaseTransaction>;

pub struct SeaOrmStore<C> {
    pub(super) conn: C,
}

impl<C> SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

impl<C> RepositoryProvider for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    fn sessions(&self) -> &dyn SessionStore {
        self
    }

    fn accounts(&self) -> &dyn AccountLedger {
        self
    }

    fn tariffs(&self) -> &dyn TariffStore {
        self
    }

    fn vehicles(&self) -> &dyn VehicleDirectory {
        self
    }
}

// ── Error mapping ───────────────────────────────────────────────

/// SQLite reports writer contention as "database is locked"; PostgreSQL
/// as a lock timeout or serialization failure.
fn is_contention(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked")
        || msg.contains("could not serialize access")
        || msg.contains("lock timeout")
}

pub(super) fn db_err(e: DbErr) -> DomainError {
    if is_contention(&e) {
        DomainError::SessionBusy(e.to_string())
    } else {
        DomainError::Storage(e.to_string())
    }
}
