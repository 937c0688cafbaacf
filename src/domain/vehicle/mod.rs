//! Vehicle aggregate

pub mod model;
pub mod repository;

pub use model::{normalize_plate, Vehicle};
pub use repository::VehicleDirectory;
