//! Tariff store interface

use async_trait::async_trait;
use chrono::Weekday;

use super::model::{Tariff, TariffWindow};
use crate::domain::DomainResult;

/// Read-only access to tariffs. Writes belong to tariff administration.
#[async_trait]
pub trait TariffStore: Send + Sync {
    /// Windows whose flag for `day` is set, joined to their tariff,
    /// ordered by window id.
    async fn list_windows_for_day(&self, day: Weekday) -> DomainResult<Vec<(Tariff, TariffWindow)>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Tariff>>;
    /// All tariffs ordered by name, each with its windows.
    async fn list_tariffs(&self) -> DomainResult<Vec<(Tariff, Vec<TariffWindow>)>>;
}
