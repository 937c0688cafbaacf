pub mod billing;
pub mod events;
pub mod parking;

// Re-export key types for convenience
pub use billing::{charge, ResolverPolicy, TariffMatching, TariffResolver, TieBreak};
pub use events::{create_event_bus, Event, EventBus, EventSubscriber, SharedEventBus};
pub use parking::{GateService, PlateRecognizer, SessionEngine, VehicleLocks};
