//! Parking session aggregate

pub mod model;
pub mod repository;

pub use model::{NewParkingSession, ParkingSession, SessionClosing, Settlement};
pub use repository::SessionStore;
