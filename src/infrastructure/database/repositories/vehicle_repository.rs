//! SeaORM implementation of VehicleDirectory

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use super::store::{db_err, SeaOrmStore};
use crate::domain::vehicle::{Vehicle, VehicleDirectory};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::vehicle::{self, Column};

fn entity_to_domain(m: vehicle::Model) -> Vehicle {
    Vehicle {
        id: m.id,
        number: m.number,
        color: m.color,
        model: m.model,
        is_banned: m.is_banned,
        account_id: m.account_id,
    }
}

#[async_trait]
impl<C> VehicleDirectory for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_number(&self, number: &str) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find()
            .filter(Column::Number.eq(number))
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::testing::{seed_account, seed_vehicle, test_db};

    #[tokio::test]
    async fn finds_owner_of_registered_plate() {
        let db = test_db().await;
        seed_account(&db, "acc-1", 0).await;
        seed_vehicle(&db, "AA1234BB", Some("acc-1")).await;
        seed_vehicle(&db, "KA0001AA", None).await;
        let directory = SeaOrmStore::new(db);

        let owned = directory.find_by_number("AA1234BB").await.unwrap().unwrap();
        assert_eq!(owned.account_id.as_deref(), Some("acc-1"));

        let unowned = directory.find_by_number("KA0001AA").await.unwrap().unwrap();
        assert!(unowned.account_id.is_none());

        assert!(directory.find_by_number("XX0000XX").await.unwrap().is_none());
    }
}
