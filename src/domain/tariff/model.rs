//! Tariff domain entities

use chrono::{DateTime, NaiveTime, Timelike, Utc, Weekday};
use rust_decimal::Decimal;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Named price/time ratio: `pricetime` minutes of parking cost `price`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    /// Minutes of coverage one `price` unit buys
    pub pricetime: i32,
    /// Currency code (ISO 4217)
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Day-of-week and time-of-day activation rule for a [`Tariff`].
#[derive(Debug, Clone, PartialEq)]
pub struct TariffWindow {
    pub id: i32,
    pub tariff_id: i32,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    /// Inclusive lower bound; `None` means midnight
    pub start_time: Option<NaiveTime>,
    /// Exclusive upper bound; `None` means end of day
    pub stop_time: Option<NaiveTime>,
}

impl TariffWindow {
    pub fn is_active_on(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Whether local `day` at `time` falls inside the window.
    ///
    /// A window whose start is later than its stop runs from `start` on a
    /// flagged day until `stop` on the following day, so Mon 22:00-06:00
    /// covers Tue 03:00 but not Mon 03:00. Equal bounds cover the whole day.
    pub fn covers(&self, day: Weekday, time: NaiveTime) -> bool {
        let t = time.num_seconds_from_midnight();
        let (start, stop) = self.bounds();
        if start == stop {
            self.is_active_on(day)
        } else if start < stop {
            self.is_active_on(day) && start <= t && t < stop
        } else {
            (self.is_active_on(day) && t >= start) || (self.is_active_on(day.pred()) && t < stop)
        }
    }

    /// Start later than stop: the window runs past midnight.
    pub fn wraps_midnight(&self) -> bool {
        let (start, stop) = self.bounds();
        start > stop
    }

    /// Window length in seconds, used to rank overlapping windows.
    pub fn span_seconds(&self) -> u32 {
        let (start, stop) = self.bounds();
        if start == stop {
            SECONDS_PER_DAY
        } else if start < stop {
            stop - start
        } else {
            SECONDS_PER_DAY - start + stop
        }
    }

    fn bounds(&self) -> (u32, u32) {
        let start = self
            .start_time
            .map(|t| t.num_seconds_from_midnight())
            .unwrap_or(0);
        let stop = self
            .stop_time
            .map(|t| t.num_seconds_from_midnight())
            .unwrap_or(SECONDS_PER_DAY);
        (start, stop)
    }
}

/// Lower-case English day name, matching the day flag columns.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
