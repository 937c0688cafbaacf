//! Parking session entity with billing support

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub vehicle_number: String,

    pub start: DateTimeUtc,

    #[sea_orm(nullable)]
    pub stop: Option<DateTimeUtc>,

    /// Charge in smallest currency unit; NULL while parked
    #[sea_orm(nullable)]
    pub total_minor: Option<i64>,

    pub discount_minor: i64,

    /// TRUE while the vehicle is inside. A partial unique index allows one
    /// such row per vehicle_number.
    pub in_parking: bool,

    // Billing fields

    /// Tariff applied at exit
    #[sea_orm(nullable)]
    pub tariff_id: Option<i32>,

    /// Account debited at exit
    #[sea_orm(nullable)]
    pub account_id: Option<String>,

    /// "balance" or "cash"
    #[sea_orm(nullable)]
    pub settlement: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tariff::Entity",
        from = "Column::TariffId",
        to = "super::tariff::Column::Id"
    )]
    Tariff,

    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::tariff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tariff.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
