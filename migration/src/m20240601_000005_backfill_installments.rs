use entity::{contract, installment};
use sea_orm_migration::{
    prelude::*,
    sea_orm::{prelude::Decimal, ActiveModelTrait, EntityTrait, QuerySelect, Set},
};
use std::collections::HashSet;

/// Contracts written before the installment history existed get one
/// opening installment, dated on the header's payment day, and their
/// cached paid amount is made explicit.
#[derive(DeriveMigrationName)]
pub struct Migration;

const INITIAL_NOTE: &str = "Pembayaran awal";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let with_history: HashSet<i32> = installment::Entity::find()
            .select_only()
            .column(installment::Column::ContractId)
            .distinct()
            .into_tuple::<i32>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        for header in contract::Entity::find().all(db).await? {
            let amount = header.paid.unwrap_or(header.total_due);
            if amount > Decimal::ZERO && !with_history.contains(&header.id) {
                installment::ActiveModel {
                    contract_id: Set(header.id),
                    amount: Set(amount),
                    paid_at: Set(header
                        .paid_on
                        .and_time(Default::default())
                        .and_utc()
                        .timestamp()),
                    method: Set(header.method.clone()),
                    receipt_path: Set(header.receipt_path.clone()),
                    note: Set(INITIAL_NOTE.to_owned()),
                    created_at: Set(header.created_at),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
            if header.paid.is_none() {
                contract::ActiveModel {
                    id: Set(header.id),
                    paid: Set(Some(header.total_due)),
                    ..Default::default()
                }
                .update(db)
                .await?;
            }
        }
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Ok(())
    }
}
