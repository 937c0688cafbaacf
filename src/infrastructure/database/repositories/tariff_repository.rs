//! SeaORM implementation of TariffStore

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Weekday;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use super::store::{db_err, SeaOrmStore};
use crate::domain::tariff::{Tariff, TariffStore, TariffWindow};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{tariff, tariff_window};
use crate::shared::money::from_minor;

// ── Conversion helpers ──────────────────────────────────────────

fn tariff_to_domain(t: tariff::Model) -> Tariff {
    Tariff {
        id: t.id,
        name: t.name,
        price: from_minor(t.price_minor),
        pricetime: t.pricetime,
        currency: t.currency,
        created_at: t.created_at,
        updated_at: t.updated_at,
    }
}

fn window_to_domain(w: tariff_window::Model) -> TariffWindow {
    TariffWindow {
        id: w.id,
        tariff_id: w.tariff_id,
        monday: w.monday,
        tuesday: w.tuesday,
        wednesday: w.wednesday,
        thursday: w.thursday,
        friday: w.friday,
        saturday: w.saturday,
        sunday: w.sunday,
        start_time: w.start_time,
        stop_time: w.stop_time,
    }
}

// ── TariffStore ─────────────────────────────────────────────────

#[async_trait]
impl<C> TariffStore for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn list_windows_for_day(&self, day: Weekday) -> DomainResult<Vec<(Tariff, TariffWindow)>> {
        let rows = tariff_window::Entity::find()
            .find_also_related(tariff::Entity)
            .filter(tariff_window::Column::for_weekday(day).eq(true))
            .order_by_asc(tariff_window::Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(w, t)| t.map(|t| (tariff_to_domain(t), window_to_domain(w))))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Tariff>> {
        let model = tariff::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(tariff_to_domain))
    }

    async fn list_tariffs(&self) -> DomainResult<Vec<(Tariff, Vec<TariffWindow>)>> {
        let tariffs = tariff::Entity::find()
            .order_by_asc(tariff::Column::Name)
            .all(&self.conn)
            .await
            .map_err(db_err)?;
        let windows = tariff_window::Entity::find()
            .order_by_asc(tariff_window::Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err)?;

        let mut by_tariff: HashMap<i32, Vec<TariffWindow>> = HashMap::new();
        for w in windows {
            by_tariff.entry(w.tariff_id).or_default().push(window_to_domain(w));
        }

        Ok(tariffs
            .into_iter()
            .map(|t| {
                let windows = by_tariff.remove(&t.id).unwrap_or_default();
                (tariff_to_domain(t), windows)
            })
            .collect())
    }
}
