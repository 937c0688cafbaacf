use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::{Account, BalancePolicy};
use crate::domain::DomainResult;

#[async_trait]
pub trait AccountLedger: Send + Sync {
    async fn find_by_id(&self, account_id: &str) -> DomainResult<Option<Account>>;

    /// Atomically subtract `amount` and return the updated account.
    async fn debit(
        &self,
        account_id: &str,
        amount: Decimal,
        policy: BalancePolicy,
    ) -> DomainResult<Account>;

    /// Atomically add `amount` (administrative top-up).
    async fn credit(&self, account_id: &str, amount: Decimal) -> DomainResult<Account>;
}
