use entity::unit;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(unit::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(unit::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(unit::Column::Name).string_len(100).not_null())
            .col(
                ColumnDef::new(unit::Column::Kind)
                    .string_len(50)
                    .not_null()
                    .default("".to_owned()),
            )
            .col(
                ColumnDef::new(unit::Column::Rent)
                    .decimal_len(12, 2)
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(unit::Column::PhotoPath).string_len(255).null())
            .col(
                ColumnDef::new(unit::Column::Status)
                    .string_len(20)
                    .not_null()
                    .default("kosong".to_owned()),
            )
            .col(
                ColumnDef::new(unit::Column::CreatedAt)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(unit::Column::UpdatedAt)
                    .big_integer()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(unit::Entity).to_owned())
            .await
    }
}
