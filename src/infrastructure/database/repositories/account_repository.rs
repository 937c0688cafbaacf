//! SeaORM implementation of AccountLedger
//!
//! Balance changes are single `UPDATE ... SET balance_minor = balance_minor ± x`
//! statements, so concurrent debits never lose an update.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{debug, warn};

use super::store::{db_err, SeaOrmStore};
use crate::domain::account::{Account, AccountLedger, BalancePolicy};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::account::{self, Column};
use crate::shared::money::{from_minor, to_minor};

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: account::Model) -> Account {
    Account {
        id: m.id,
        owner_name: m.owner_name,
        email: m.email,
        balance: from_minor(m.balance_minor),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn account_not_found(account_id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "Account",
        field: "id",
        value: account_id.to_string(),
    }
}

impl<C> SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn require_account(&self, account_id: &str) -> DomainResult<Account> {
        AccountLedger::find_by_id(self, account_id)
            .await?
            .ok_or_else(|| account_not_found(account_id))
    }
}

// ── AccountLedger ───────────────────────────────────────────────

#[async_trait]
impl<C> AccountLedger for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, account_id: &str) -> DomainResult<Option<Account>> {
        let model = account::Entity::find_by_id(account_id.to_string())
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn debit(
        &self,
        account_id: &str,
        amount: Decimal,
        policy: BalancePolicy,
    ) -> DomainResult<Account> {
        if amount.is_sign_negative() {
            return Err(DomainError::Validation(format!(
                "Debit amount must not be negative, got {}",
                amount
            )));
        }
        let minor = to_minor(amount)?;

        let mut update = account::Entity::update_many()
            .col_expr(Column::BalanceMinor, Expr::col(Column::BalanceMinor).sub(minor))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(account_id));
        if policy == BalancePolicy::RejectInsufficient {
            update = update.filter(Column::BalanceMinor.gte(minor));
        }

        let result = update.exec(&self.conn).await.map_err(db_err)?;
        if result.rows_affected == 0 {
            let current = self.require_account(account_id).await?;
            warn!(
                account_id,
                balance = %current.balance,
                amount = %amount,
                "Debit rejected: insufficient balance"
            );
            return Err(DomainError::InsufficientBalance {
                account_id: account_id.to_string(),
                balance: current.balance,
                amount,
            });
        }

        let updated = self.require_account(account_id).await?;
        debug!(account_id, amount = %amount, balance = %updated.balance, "Account debited");
        Ok(updated)
    }

    async fn credit(&self, account_id: &str, amount: Decimal) -> DomainResult<Account> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "Top-up amount must be positive, got {}",
                amount
            )));
        }
        let minor = to_minor(amount)?;

        let result = account::Entity::update_many()
            .col_expr(Column::BalanceMinor, Expr::col(Column::BalanceMinor).add(minor))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(account_id))
            .exec(&self.conn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(account_not_found(account_id));
        }

        let updated = self.require_account(account_id).await?;
        debug!(account_id, amount = %amount, balance = %updated.balance, "Account credited");
        Ok(updated)
    }
}
