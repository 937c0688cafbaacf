//! Gate event DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Vehicle seen at the entry gate
#[derive(Debug, Deserialize, Validate)]
pub struct EntryRequest {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub vehicle_number: String,
}

/// Vehicle seen at the exit gate
#[derive(Debug, Deserialize, Validate)]
pub struct ExitRequest {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub vehicle_number: String,
    /// Subtracted from the charge; must not be negative
    #[serde(default)]
    pub discount: Option<Decimal>,
}
