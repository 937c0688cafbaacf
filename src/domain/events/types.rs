//! Parking events
//!
//! Published after the unit of work that produced them has committed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    SessionOpened(SessionOpenedEvent),
    SessionClosed(SessionClosedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SessionOpened(_) => "session_opened",
            Event::SessionClosed(_) => "session_closed",
        }
    }

    pub fn vehicle_number(&self) -> &str {
        match self {
            Event::SessionOpened(e) => &e.vehicle_number,
            Event::SessionClosed(e) => &e.vehicle_number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOpenedEvent {
    pub session_id: i32,
    pub vehicle_number: String,
    pub start: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClosedEvent {
    pub session_id: i32,
    pub vehicle_number: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub total: Decimal,
    pub discount: Decimal,
    pub tariff_id: i32,
    /// "balance" or "cash"
    pub settlement: String,
    pub account_id: Option<String>,
    /// Owner balance after the debit
    pub balance_after: Option<Decimal>,
}

/// Envelope delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
