//! # Parking Gate
//!
//! Parking session lifecycle and billing engine: vehicles enter and exit
//! through gates, a per-weekday tariff prices the stay, and the owner's
//! account is debited on exit (or the stay is settled in cash).
//!
//! ## Architecture
//!
//! - **domain**: sessions, accounts, tariffs, vehicles and the store traits
//! - **application**: session engine, billing calculator, tariff resolver, events
//! - **infrastructure**: SeaORM entities, migrations and stores
//! - **interfaces**: REST API (axum)
//! - **server**: bootstrap shared by both binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::{SeaOrmRepositoryProvider, SeaOrmUnitOfWorkFactory};
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};

// Re-export the engine and events
pub use application::{create_event_bus, Event, EventBus, GateService, SessionEngine, SharedEventBus};
