//! Create tariff_windows table

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_tariffs::Tariffs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let day = |col: TariffWindows| {
            ColumnDef::new(col)
                .boolean()
                .not_null()
                .default(false)
                .to_owned()
        };

        manager
            .create_table(
                Table::create()
                    .table(TariffWindows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TariffWindows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TariffWindows::TariffId).integer().not_null())
                    .col(day(TariffWindows::Monday))
                    .col(day(TariffWindows::Tuesday))
                    .col(day(TariffWindows::Wednesday))
                    .col(day(TariffWindows::Thursday))
                    .col(day(TariffWindows::Friday))
                    .col(day(TariffWindows::Saturday))
                    .col(day(TariffWindows::Sunday))
                    .col(ColumnDef::new(TariffWindows::StartTime).time().null())
                    .col(ColumnDef::new(TariffWindows::StopTime).time().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tariff_windows_tariff")
                            .from(TariffWindows::Table, TariffWindows::TariffId)
                            .to(Tariffs::Table, Tariffs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tariff_windows_tariff")
                    .table(TariffWindows::Table)
                    .col(TariffWindows::TariffId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TariffWindows::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
pub enum TariffWindows {
    Table,
    Id,
    TariffId,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    StartTime,
    StopTime,
}
