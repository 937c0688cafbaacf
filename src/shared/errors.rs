use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Vehicle {0} already has an open parking session")]
    SessionAlreadyOpen(String),

    #[error("No open parking session for vehicle {0}")]
    SessionNotFound(String),

    #[error("No tariff window matches {0}")]
    NoTariffForTimestamp(DateTime<Utc>),

    #[error("Invalid tariff configuration: {0}")]
    InvalidTariffConfiguration(String),

    #[error("Session busy: {0}, retry later")]
    SessionBusy(String),

    #[error("Insufficient balance on account {account_id}: balance {balance}, charge {amount}")]
    InsufficientBalance {
        account_id: String,
        balance: Decimal,
        amount: Decimal,
    },

    #[error("Plate not recognized: {0}")]
    PlateNotRecognized(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether the caller may retry the same request and expect it to succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::SessionBusy(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Metrics recorder error: {0}")]
    Metrics(String),
}
