//! Money helpers
//!
//! Amounts travel through the domain as [`Decimal`] with two fractional
//! digits and are persisted as `i64` minor units (cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::errors::DomainError;

/// Fractional digits kept for every stored amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Round to currency precision, midpoint away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, CURRENCY_SCALE)
}

/// Convert to minor units, rounding first.
pub fn to_minor(amount: Decimal) -> Result<i64, DomainError> {
    (round_currency(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| DomainError::Validation(format!("Amount {} is out of range", amount)))
}
