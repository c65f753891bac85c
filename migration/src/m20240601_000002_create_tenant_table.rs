use entity::{tenant, unit};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(tenant::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(tenant::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(tenant::Column::Name).string_len(100).not_null())
            .col(ColumnDef::new(tenant::Column::Nik).string_len(20).null())
            .col(ColumnDef::new(tenant::Column::Email).string_len(100).null())
            .col(ColumnDef::new(tenant::Column::Phone).string_len(20).not_null())
            .col(ColumnDef::new(tenant::Column::Address).text().null())
            .col(ColumnDef::new(tenant::Column::UnitId).integer().null())
            .col(ColumnDef::new(tenant::Column::ContractStart).date().null())
            .col(ColumnDef::new(tenant::Column::DueDate).date().null())
            .col(
                ColumnDef::new(tenant::Column::PaymentStatus)
                    .string_len(20)
                    .null(),
            )
            .col(ColumnDef::new(tenant::Column::KtpPath).string_len(255).null())
            .col(
                ColumnDef::new(tenant::Column::CreatedAt)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(tenant::Column::UpdatedAt)
                    .big_integer()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_penyewa_properti")
                    .from(tenant::Entity, tenant::Column::UnitId)
                    .to(unit::Entity, unit::Column::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();

        manager.create_table(table).await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_penyewa_properti_id")
                    .col(tenant::Column::UnitId)
                    .table(tenant::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(tenant::Entity).to_owned())
            .await
    }
}
