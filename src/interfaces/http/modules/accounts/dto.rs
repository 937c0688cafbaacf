//! Account DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::Account;

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub owner_name: Option<String>,
    pub email: Option<String>,
    /// Signed; negative when parking was billed beyond the balance
    pub balance: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            owner_name: a.owner_name,
            email: a.email,
            balance: a.balance,
            updated_at: a.updated_at,
        }
    }
}

/// Administrative top-up
#[derive(Debug, Deserialize, Validate)]
pub struct TopUpRequest {
    /// Positive amount added to the balance
    pub amount: Decimal,
    #[validate(length(max = 200))]
    pub note: Option<String>,
}
