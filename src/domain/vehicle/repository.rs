use async_trait::async_trait;

use super::model::Vehicle;
use crate::domain::DomainResult;

#[async_trait]
pub trait VehicleDirectory: Send + Sync {
    async fn find_by_number(&self, number: &str) -> DomainResult<Option<Vehicle>>;
}
