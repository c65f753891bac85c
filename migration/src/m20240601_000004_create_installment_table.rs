use entity::{contract, installment};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(installment::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(installment::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(installment::Column::ContractId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(installment::Column::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(installment::Column::PaidAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(installment::Column::Method)
                            .string_len(50)
                            .not_null()
                            .default("Transfer".to_owned()),
                    )
                    .col(
                        ColumnDef::new(installment::Column::ReceiptPath)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(installment::Column::Note).text().not_null())
                    .col(
                        ColumnDef::new(installment::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_riwayat_pembayaran")
                            .from(installment::Entity, installment::Column::ContractId)
                            .to(contract::Entity, contract::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_riwayat_pembayaran_id")
                    .col(installment::Column::ContractId)
                    .col(installment::Column::PaidAt)
                    .table(installment::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(installment::Entity).to_owned())
            .await
    }
}
