//! SeaORM implementation of SessionStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use tracing::debug;

use super::store::{db_err, SeaOrmStore};
use crate::domain::session::{NewParkingSession, ParkingSession, SessionStore, Settlement};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::parking_session::{self, Column};
use crate::shared::money::{from_minor, to_minor};
use crate::shared::{PaginatedResult, PaginationParams};

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: parking_session::Model) -> ParkingSession {
    ParkingSession {
        id: m.id,
        vehicle_number: m.vehicle_number,
        start: m.start,
        stop: m.stop,
        total: m.total_minor.map(from_minor),
        discount: from_minor(m.discount_minor),
        in_parking: m.in_parking,
        tariff_id: m.tariff_id,
        account_id: m.account_id,
        settlement: m.settlement.as_deref().and_then(Settlement::from_str),
    }
}

/// The partial unique index turns a second open session into a constraint
/// violation.
fn insert_err(vehicle_number: &str, e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::SessionAlreadyOpen(vehicle_number.to_string())
        }
        _ => db_err(e),
    }
}

// ── SessionStore ────────────────────────────────────────────────

#[async_trait]
impl<C> SessionStore for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_open_by_vehicle(&self, vehicle_number: &str) -> DomainResult<Option<ParkingSession>> {
        let model = parking_session::Entity::find()
            .filter(Column::VehicleNumber.eq(vehicle_number))
            .filter(Column::InParking.eq(true))
            .lock_exclusive()
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn insert(&self, session: NewParkingSession) -> DomainResult<ParkingSession> {
        let vehicle_number = session.vehicle_number.clone();
        let model = parking_session::ActiveModel {
            id: NotSet,
            vehicle_number: Set(session.vehicle_number),
            start: Set(session.start),
            stop: Set(None),
            total_minor: Set(None),
            discount_minor: Set(0),
            in_parking: Set(true),
            tariff_id: Set(None),
            account_id: Set(None),
            settlement: Set(None),
        };

        let inserted = model
            .insert(&self.conn)
            .await
            .map_err(|e| insert_err(&vehicle_number, e))?;
        debug!(session_id = inserted.id, vehicle_number = %vehicle_number, "Session row inserted");
        Ok(entity_to_domain(inserted))
    }

    async fn close_and_persist(&self, session: &ParkingSession) -> DomainResult<()> {
        let total_minor = session.total.map(to_minor).transpose()?;
        let changes = parking_session::ActiveModel {
            stop: Set(session.stop),
            total_minor: Set(total_minor),
            discount_minor: Set(to_minor(session.discount)?),
            in_parking: Set(session.in_parking),
            tariff_id: Set(session.tariff_id),
            account_id: Set(session.account_id.clone()),
            settlement: Set(session.settlement.map(|s| s.as_str().to_string())),
            ..Default::default()
        };

        let result = parking_session::Entity::update_many()
            .set(changes)
            .filter(Column::Id.eq(session.id))
            .filter(Column::InParking.eq(true))
            .exec(&self.conn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::SessionNotFound(session.vehicle_number.clone()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSession>> {
        let model = parking_session::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn list_open(&self, page: PaginationParams) -> DomainResult<PaginatedResult<ParkingSession>> {
        let paginator = parking_session::Entity::find()
            .filter(Column::InParking.eq(true))
            .order_by_asc(Column::Start)
            .order_by_asc(Column::Id)
            .paginate(&self.conn, u64::from(page.limit));

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(entity_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn list_for_vehicle(
        &self,
        vehicle_number: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<ParkingSession>> {
        let mut query = parking_session::Entity::find().filter(Column::VehicleNumber.eq(vehicle_number));
        if let Some(from) = from {
            query = query.filter(Column::Start.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(Column::Start.lte(to));
        }

        let models = query
            .order_by_desc(Column::Start)
            .order_by_desc(Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }
}
