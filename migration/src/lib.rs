pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_unit_table;
mod m20240601_000002_create_tenant_table;
mod m20240601_000003_create_contract_table;
mod m20240601_000004_create_installment_table;
mod m20240601_000005_backfill_installments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_unit_table::Migration),
            Box::new(m20240601_000002_create_tenant_table::Migration),
            Box::new(m20240601_000003_create_contract_table::Migration),
            Box::new(m20240601_000004_create_installment_table::Migration),
            Box::new(m20240601_000005_backfill_installments::Migration),
        ]
    }
}
