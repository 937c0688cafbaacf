//! Prorated parking charge
//!
//! `charge = price × elapsed_minutes / pricetime`, computed on whole
//! milliseconds and rounded once to currency precision.

use chrono::Duration;
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult, Tariff};
use crate::shared::money::round_currency;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Charge for parking `elapsed` under `tariff`. Negative durations count as zero.
pub fn charge(tariff: &Tariff, elapsed: Duration) -> DomainResult<Decimal> {
    if tariff.pricetime <= 0 {
        return Err(DomainError::InvalidTariffConfiguration(format!(
            "tariff '{}' has pricetime {}, expected a positive number of minutes",
            tariff.name, tariff.pricetime
        )));
    }
    if tariff.price < Decimal::ZERO {
        return Err(DomainError::InvalidTariffConfiguration(format!(
            "tariff '{}' has negative price {}",
            tariff.name, tariff.price
        )));
    }

    let millis = Decimal::from(elapsed.num_milliseconds().max(0));
    let unit = Decimal::from(MILLIS_PER_MINUTE * i64::from(tariff.pricetime));

    let amount = tariff
        .price
        .checked_mul(millis)
        .and_then(|scaled| scaled.checked_div(unit))
        .ok_or_else(|| {
            DomainError::InvalidTariffConfiguration(format!(
                "charge under tariff '{}' overflows for {} ms",
                tariff.name, millis
            ))
        })?;

    Ok(round_currency(amount))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    fn tariff(price: Decimal, pricetime: i32) -> Tariff {
        Tariff {
            id: 1,
            name: "Standard".into(),
            price,
            pricetime,
            currency: "UAH".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn half_an_hour_at_ten_per_hour() {
        let t = tariff(dec!(10), 60);
        assert_eq!(charge(&t, Duration::minutes(30)).unwrap(), dec!(5.00));
    }

    #[test]
    fn ninety_minutes_at_ten_per_hour() {
        let t = tariff(dec!(10), 60);
        assert_eq!(charge(&t, Duration::minutes(90)).unwrap(), dec!(15.00));
    }

    #[test]
    fn zero_pricetime_is_a_configuration_error() {
        let t = tariff(dec!(10), 0);
        let err = charge(&t, Duration::minutes(30)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTariffConfiguration(_)));
    }

    #[test]
    fn negative_price_is_a_configuration_error() {
        let t = tariff(dec!(-1), 60);
        assert!(matches!(
            charge(&t, Duration::minutes(1)),
            Err(DomainError::InvalidTariffConfiguration(_))
        ));
    }

    #[test]
    fn fractional_time_is_prorated_without_blocks() {
        let t = tariff(dec!(10), 60);
        // 10 min 30 s = 10.5 min → 1.75
        assert_eq!(charge(&t, Duration::seconds(630)).unwrap(), dec!(1.75));
        // 1 s → 0.002777… → 0.00
        assert_eq!(charge(&t, Duration::seconds(1)).unwrap(), dec!(0.00));
        // 3 s → 0.00833… → 0.01
        assert_eq!(charge(&t, Duration::seconds(3)).unwrap(), dec!(0.01));
    }

    #[test]
    fn rounding_is_midpoint_away_from_zero() {
        // 1.00 per 60 min, 3 min → 0.05; 0.3 min (18 s) → 0.005 → 0.01
        let t = tariff(dec!(1), 60);
        assert_eq!(charge(&t, Duration::minutes(3)).unwrap(), dec!(0.05));
        assert_eq!(charge(&t, Duration::seconds(18)).unwrap(), dec!(0.01));
    }

    #[test]
    fn negative_elapsed_is_free() {
        let t = tariff(dec!(10), 60);
        assert_eq!(charge(&t, Duration::minutes(-5)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn charge_is_monotonic_in_elapsed_time() {
        let t = tariff(dec!(7.30), 45);
        let mut previous = Decimal::ZERO;
        for seconds in (0..=6 * 3600).step_by(37) {
            let amount = charge(&t, Duration::seconds(seconds)).unwrap();
            assert!(amount >= previous, "charge dropped at {seconds}s");
            previous = amount;
        }
    }
}
