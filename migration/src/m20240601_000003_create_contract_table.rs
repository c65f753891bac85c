use entity::{contract, tenant};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(contract::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(contract::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(contract::Column::TenantId).integer().not_null())
            .col(
                ColumnDef::new(contract::Column::TotalDue)
                    .decimal_len(12, 2)
                    .not_null(),
            )
            .col(ColumnDef::new(contract::Column::Paid).decimal_len(12, 2).null())
            .col(ColumnDef::new(contract::Column::PaidOn).date().not_null())
            .col(ColumnDef::new(contract::Column::PeriodStart).date().not_null())
            .col(ColumnDef::new(contract::Column::PeriodEnd).date().null())
            .col(
                ColumnDef::new(contract::Column::Method)
                    .string_len(50)
                    .not_null()
                    .default("Transfer".to_owned()),
            )
            .col(
                ColumnDef::new(contract::Column::ReceiptPath)
                    .string_len(255)
                    .null(),
            )
            .col(
                ColumnDef::new(contract::Column::Status)
                    .string_len(20)
                    .not_null()
                    .default("pending".to_owned()),
            )
            .col(ColumnDef::new(contract::Column::Note).text().not_null())
            .col(
                ColumnDef::new(contract::Column::CreatedAt)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(contract::Column::UpdatedAt)
                    .big_integer()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_pembayaran_penyewa")
                    .from(contract::Entity, contract::Column::TenantId)
                    .to(tenant::Entity, tenant::Column::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .to_owned();

        manager.create_table(table).await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pembayaran_penyewa_id")
                    .col(contract::Column::TenantId)
                    .table(contract::Entity)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pembayaran_tanggal_akhir")
                    .col(contract::Column::PeriodEnd)
                    .table(contract::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(contract::Entity).to_owned())
            .await
    }
}
