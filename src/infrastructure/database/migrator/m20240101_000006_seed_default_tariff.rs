//! Seed the "Standard" tariff, active all week

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_tariffs::Tariffs;
use super::m20240101_000004_create_tariff_windows::TariffWindows;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let insert_tariff = Query::insert()
            .into_table(Tariffs::Table)
            .columns([
                Tariffs::Name,
                Tariffs::PriceMinor,
                Tariffs::Pricetime,
                Tariffs::Currency,
                Tariffs::CreatedAt,
                Tariffs::UpdatedAt,
            ])
            .values_panic([
                "Standard".into(),
                1000.into(), // 10.00 per hour
                60.into(),
                "UAH".into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(insert_tariff).await?;

        // Window for every day, bound to the tariff just inserted
        let standard_id = Query::select()
            .column(Tariffs::Id)
            .exprs((0..7).map(|_| Expr::val(true)))
            .from(Tariffs::Table)
            .and_where(Expr::col(Tariffs::Name).eq("Standard"))
            .to_owned();

        let insert_window = Query::insert()
            .into_table(TariffWindows::Table)
            .columns([
                TariffWindows::TariffId,
                TariffWindows::Monday,
                TariffWindows::Tuesday,
                TariffWindows::Wednesday,
                TariffWindows::Thursday,
                TariffWindows::Friday,
                TariffWindows::Saturday,
                TariffWindows::Sunday,
            ])
            .select_from(standard_id)
            .map_err(|e| DbErr::Migration(e.to_string()))?
            .to_owned();
        manager.exec_stmt(insert_window).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Tariffs::Table)
            .and_where(Expr::col(Tariffs::Name).eq("Standard"))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}
