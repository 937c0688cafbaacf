//! Account aggregate: owner balances and the ledger interface

pub mod model;
pub mod repository;

pub use model::{Account, BalancePolicy};
pub use repository::AccountLedger;
