//! Session store interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewParkingSession, ParkingSession};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The session with `in_parking = true` for this plate, locked for the
    /// rest of the transaction where the backend supports row locks.
    async fn find_open_by_vehicle(&self, vehicle_number: &str) -> DomainResult<Option<ParkingSession>>;

    /// Insert an open session. A concurrent open session for the same plate
    /// fails with `SessionAlreadyOpen`.
    async fn insert(&self, session: NewParkingSession) -> DomainResult<ParkingSession>;

    /// Persist the exit fields of a closed session. Only an open row is
    /// updated; a row closed meanwhile yields `SessionNotFound`.
    async fn close_and_persist(&self, session: &ParkingSession) -> DomainResult<()>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSession>>;

    async fn list_open(&self, page: PaginationParams) -> DomainResult<PaginatedResult<ParkingSession>>;

    /// Sessions for one plate that started within `[from, to]`, newest first.
    async fn list_for_vehicle(
        &self,
        vehicle_number: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<ParkingSession>>;
}
