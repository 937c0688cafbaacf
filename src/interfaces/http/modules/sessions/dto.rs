//! Parking session DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ParkingSession;

/// Parking session as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: i32,
    pub vehicle_number: String,
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
    pub in_parking: bool,
    /// Charge before discount; `null` while parked
    pub total: Option<Decimal>,
    pub discount: Decimal,
    /// Debited or collected amount, `max(total - discount, 0)`
    pub amount_due: Option<Decimal>,
    pub tariff_id: Option<i32>,
    pub account_id: Option<String>,
    /// "balance" or "cash"
    pub settlement: Option<String>,
    /// Seconds parked so far (open) or in total (closed)
    pub duration_seconds: i64,
}

impl From<ParkingSession> for SessionResponse {
    fn from(s: ParkingSession) -> Self {
        let until = s.stop.unwrap_or_else(Utc::now);
        Self {
            duration_seconds: s.elapsed_at(until).num_seconds(),
            amount_due: s.amount_due(),
            id: s.id,
            vehicle_number: s.vehicle_number,
            start: s.start,
            stop: s.stop,
            in_parking: s.in_parking,
            total: s.total,
            discount: s.discount,
            tariff_id: s.tariff_id,
            account_id: s.account_id,
            settlement: s.settlement.map(|v| v.as_str().to_string()),
        }
    }
}

/// `GET /api/v1/sessions` query: one plate, optional start-date range
#[derive(Debug, Deserialize)]
pub struct SessionHistoryQuery {
    pub vehicle_number: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
