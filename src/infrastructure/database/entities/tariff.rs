//! Tariff entity for billing

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tariff model: `price_minor` buys `pricetime` minutes of parking
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tariffs")]
pub struct Model {
    /// Unique tariff ID
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Tariff name (e.g., "Standard", "Weekend", "Night")
    #[sea_orm(unique)]
    pub name: String,

    /// Price in smallest currency unit (e.g., cents)
    pub price_minor: i64,

    /// Minutes of parking one price unit covers
    pub pricetime: i32,

    /// Currency code (ISO 4217, e.g., "UAH", "EUR")
    pub currency: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tariff_window::Entity")]
    Windows,
}

impl Related<super::tariff_window::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Windows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
