//! Create parking_sessions table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts::Accounts;
use super::m20240101_000003_create_tariffs::Tariffs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::VehicleNumber)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::Start)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSessions::Stop).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(ParkingSessions::TotalMinor).big_integer().null())
                    .col(
                        ColumnDef::new(ParkingSessions::DiscountMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::InParking)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ParkingSessions::TariffId).integer().null())
                    .col(ColumnDef::new(ParkingSessions::AccountId).string_len(36).null())
                    .col(ColumnDef::new(ParkingSessions::Settlement).string_len(20).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_sessions_tariff")
                            .from(ParkingSessions::Table, ParkingSessions::TariffId)
                            .to(Tariffs::Table, Tariffs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_sessions_account")
                            .from(ParkingSessions::Table, ParkingSessions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Reporting: sessions of one plate by start date
        manager
            .create_index(
                Index::create()
                    .name("idx_parking_sessions_vehicle_start")
                    .table(ParkingSessions::Table)
                    .col(ParkingSessions::VehicleNumber)
                    .col(ParkingSessions::Start)
                    .to_owned(),
            )
            .await?;

        // At most one open session per plate. Partial indexes are not
        // expressible through the index builder; this statement is valid for
        // both SQLite and PostgreSQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_parking_sessions_one_open \
                 ON parking_sessions (vehicle_number) WHERE in_parking",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSessions {
    Table,
    Id,
    VehicleNumber,
    Start,
    Stop,
    TotalMinor,
    DiscountMinor,
    InParking,
    TariffId,
    AccountId,
    Settlement,
}
