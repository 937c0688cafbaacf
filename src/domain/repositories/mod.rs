//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: access to every store over one connection
//! - `UnitOfWork`: a provider bound to one database transaction
//! - `UnitOfWorkFactory`: opens units of work
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::account::AccountLedger;
use super::session::SessionStore;
use super::tariff::TariffStore;
use super::vehicle::VehicleDirectory;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain stores.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let open = repos.sessions().find_open_by_vehicle("AA1234BB").await?;
///     let owner = repos.vehicles().find_by_number("AA1234BB").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn sessions(&self) -> &dyn SessionStore;
    fn accounts(&self) -> &dyn AccountLedger;
    fn tariffs(&self) -> &dyn TariffStore;
    fn vehicles(&self) -> &dyn VehicleDirectory;
}

/// Stores bound to a single transaction.
///
/// Every read and write made through the accessors is part of the same
/// transaction. `commit` consumes the handle; dropping it without
/// committing rolls everything back.
#[async_trait]
pub trait UnitOfWork: RepositoryProvider {
    async fn commit(self: Box<Self>) -> DomainResult<()>;
}

#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}
