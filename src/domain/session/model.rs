//! Parking session domain entity

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// How a closed session was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Debited from the owner's account balance
    Balance,
    /// Plate has no owning account; collected at the gate
    Cash,
}

impl Settlement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Cash => "cash",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "balance" => Some(Self::Balance),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

/// One vehicle's continuous stay
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSession {
    pub id: i32,
    pub vehicle_number: String,
    pub start: DateTime<Utc>,
    /// Set at exit; `None` while parked
    pub stop: Option<DateTime<Utc>>,
    /// Charge computed at exit; `None` while parked
    pub total: Option<Decimal>,
    pub discount: Decimal,
    pub in_parking: bool,
    /// Tariff applied at exit
    pub tariff_id: Option<i32>,
    /// Account debited at exit, if the plate has an owner
    pub account_id: Option<String>,
    pub settlement: Option<Settlement>,
}

/// Values needed to open a session
#[derive(Debug, Clone)]
pub struct NewParkingSession {
    pub vehicle_number: String,
    pub start: DateTime<Utc>,
}

/// Outcome of billing a session at exit
#[derive(Debug, Clone)]
pub struct SessionClosing {
    pub stop: DateTime<Utc>,
    pub total: Decimal,
    pub discount: Decimal,
    pub tariff_id: i32,
    pub account_id: Option<String>,
    pub settlement: Settlement,
}

impl ParkingSession {
    /// Elapsed parking time at `now`, never negative.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start).max(Duration::zero())
    }

    /// The moment to record as `stop`: `now`, clamped so that `stop >= start`.
    pub fn stop_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.start)
    }

    /// Amount charged after discount, floored at zero.
    pub fn amount_due(&self) -> Option<Decimal> {
        self.total
            .map(|total| (total - self.discount).max(Decimal::ZERO))
    }

    /// Apply the single exit mutation. Fails if already closed.
    pub fn close(&mut self, closing: SessionClosing) -> DomainResult<()> {
        if !self.in_parking {
            return Err(DomainError::SessionNotFound(self.vehicle_number.clone()));
        }
        if closing.stop < self.start {
            return Err(DomainError::Validation(format!(
                "Stop {} precedes start {}",
                closing.stop, self.start
            )));
        }

        self.stop = Some(closing.stop);
        self.total = Some(closing.total);
        self.discount = closing.discount;
        self.tariff_id = Some(closing.tariff_id);
        self.account_id = closing.account_id;
        self.settlement = Some(closing.settlement);
        self.in_parking = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open_session() -> ParkingSession {
        ParkingSession {
            id: 1,
            vehicle_number: "AA1234BB".into(),
            start: Utc::now() - Duration::minutes(30),
            stop: None,
            total: None,
            discount: Decimal::ZERO,
            in_parking: true,
            tariff_id: None,
            account_id: None,
            settlement: None,
        }
    }

    fn closing(stop: DateTime<Utc>, total: Decimal, discount: Decimal) -> SessionClosing {
        SessionClosing {
            stop,
            total,
            discount,
            tariff_id: 7,
            account_id: Some("acc".into()),
            settlement: Settlement::Balance,
        }
    }

    #[test]
    fn close_sets_every_exit_field() {
        let mut s = open_session();
        let now = Utc::now();
        s.close(closing(now, dec!(5.00), dec!(1.00))).unwrap();

        assert!(!s.in_parking);
        assert_eq!(s.stop, Some(now));
        assert_eq!(s.total, Some(dec!(5.00)));
        assert_eq!(s.amount_due(), Some(dec!(4.00)));
        assert_eq!(s.tariff_id, Some(7));
        assert_eq!(s.settlement, Some(Settlement::Balance));
    }

    #[test]
    fn closing_twice_is_rejected() {
        let mut s = open_session();
        s.close(closing(Utc::now(), dec!(5.00), Decimal::ZERO)).unwrap();
        let err = s
            .close(closing(Utc::now(), dec!(9.00), Decimal::ZERO))
            .unwrap_err();
        assert!(matches!(err, DomainError::SessionNotFound(_)));
        assert_eq!(s.total, Some(dec!(5.00)));
    }

    #[test]
    fn stop_before_start_is_rejected() {
        let mut s = open_session();
        let early = s.start - Duration::seconds(1);
        assert!(s.close(closing(early, dec!(1), Decimal::ZERO)).is_err());
        assert!(s.in_parking);
    }

    #[test]
    fn clock_skew_is_clamped() {
        let s = open_session();
        let before = s.start - Duration::minutes(5);
        assert_eq!(s.stop_at(before), s.start);
        assert_eq!(s.elapsed_at(before), Duration::zero());
    }

    #[test]
    fn discount_larger_than_total_owes_nothing() {
        let mut s = open_session();
        s.close(closing(Utc::now(), dec!(2.00), dec!(3.00))).unwrap();
        assert_eq!(s.amount_due(), Some(Decimal::ZERO));
    }

    #[test]
    fn settlement_roundtrips_through_str() {
        assert_eq!(Settlement::from_str("cash"), Some(Settlement::Cash));
        assert_eq!(Settlement::Balance.as_str(), "balance");
        assert_eq!(Settlement::from_str("card"), None);
    }
}
