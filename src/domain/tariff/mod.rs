//! Tariff aggregate
//!
//! Contains the Tariff and TariffWindow entities and the read-only store.

pub mod model;
pub mod repository;

pub use model::{weekday_name, Tariff, TariffWindow};
pub use repository::TariffStore;
