pub mod accounts;
pub mod gate;
pub mod health;
pub mod metrics;
pub mod sessions;
pub mod tariffs;
