//! Database repository implementations
//!
//! A single connection-generic `SeaOrmStore` implements every domain store;
//! one file per store trait.

mod account_repository;
mod session_repository;
mod store;
mod tariff_repository;
mod unit_of_work;
mod vehicle_repository;

pub use store::{SeaOrmRepositoryProvider, SeaOrmStore, SeaOrmUnitOfWork};
pub use unit_of_work::SeaOrmUnitOfWorkFactory;
