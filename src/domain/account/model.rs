use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Owner account holding a signed balance
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub owner_name: Option<String>,
    pub email: Option<String>,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a debit does when the balance cannot cover the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalancePolicy {
    /// Debit unconditionally; the balance may go negative
    #[default]
    AllowNegative,
    /// Fail with `InsufficientBalance` and leave the balance unchanged
    RejectInsufficient,
}

impl BalancePolicy {
    pub fn from_allow_negative(allow_negative_balance: bool) -> Self {
        if allow_negative_balance {
            Self::AllowNegative
        } else {
            Self::RejectInsufficient
        }
    }

    pub fn permits(&self, balance: Decimal, amount: Decimal) -> bool {
        match self {
            Self::AllowNegative => true,
            Self::RejectInsufficient => balance >= amount,
        }
    }
}
