pub mod account;
pub mod events;
pub mod repositories;
pub mod session;
pub mod tariff;
pub mod vehicle;

// Re-export commonly used types
pub use account::{Account, AccountLedger, BalancePolicy};
pub use repositories::{DomainResult, RepositoryProvider, UnitOfWork, UnitOfWorkFactory};
pub use session::{NewParkingSession, ParkingSession, SessionClosing, SessionStore, Settlement};
pub use tariff::{Tariff, TariffStore, TariffWindow};
pub use vehicle::{normalize_plate, Vehicle, VehicleDirectory};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
