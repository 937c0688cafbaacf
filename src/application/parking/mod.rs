//! Parking session lifecycle

pub mod engine;
pub mod gate;
pub mod locks;

pub use engine::SessionEngine;
pub use gate::{GateService, PlateRecognizer};
pub use locks::{VehicleGuard, VehicleLocks};
