//! Tariff DTOs

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::tariff::weekday_name;
use crate::domain::{Tariff, TariffWindow};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Serialize, Deserialize)]
pub struct TariffResponse {
    pub id: i32,
    pub name: String,
    /// Price of one `pricetime` block of minutes
    pub price: Decimal,
    pub pricetime: i32,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<Vec<TariffWindowResponse>>,
}

impl From<Tariff> for TariffResponse {
    fn from(t: Tariff) -> Self {
        Self {
            id: t.id,
            name: t.name,
            price: t.price,
            pricetime: t.pricetime,
            currency: t.currency,
            windows: None,
        }
    }
}

impl From<(Tariff, Vec<TariffWindow>)> for TariffResponse {
    fn from((tariff, windows): (Tariff, Vec<TariffWindow>)) -> Self {
        Self {
            windows: Some(windows.into_iter().map(Into::into).collect()),
            ..TariffResponse::from(tariff)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TariffWindowResponse {
    pub id: i32,
    /// Active days, e.g. `["saturday", "sunday"]`
    pub days: Vec<String>,
    pub start_time: Option<NaiveTime>,
    pub stop_time: Option<NaiveTime>,
}

impl From<TariffWindow> for TariffWindowResponse {
    fn from(w: TariffWindow) -> Self {
        Self {
            days: WEEK
                .iter()
                .filter(|day| w.is_active_on(**day))
                .map(|day| weekday_name(*day).to_string())
                .collect(),
            id: w.id,
            start_time: w.start_time,
            stop_time: w.stop_time,
        }
    }
}

/// `GET /api/v1/tariffs/resolve?at=`; defaults to now
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub at: Option<DateTime<Utc>>,
}
