use crate::{date, status::revenue, Result, Service};
use chrono::NaiveDate;
use entity::{contract, unit};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_pendapatan: Decimal,
    pub unit_terisi: u64,
    pub total_unit: u64,
    /// contracts ending within the next seven days
    pub jatuh_tempo: u64,
}

impl Service {
    pub async fn dashboard_stats(&self, today: NaiveDate) -> Result<DashboardStats> {
        let contracts = contract::Entity::find().all(self.db()).await?;
        let total_pendapatan = contracts
            .iter()
            .map(|c| revenue(c.total_due, c.paid))
            .sum();

        let unit_terisi = unit::Entity::find()
            .filter(unit::Column::Status.eq(unit::Status::Occupied))
            .count(self.db())
            .await?;
        let total_unit = unit::Entity::find().count(self.db()).await?;
        let jatuh_tempo = contract::Entity::find()
            .filter(contract::Column::PeriodEnd.between(today, date::due_soon_until(today)))
            .count(self.db())
            .await?;

        Ok(DashboardStats {
            total_pendapatan,
            unit_terisi,
            total_unit,
            jatuh_tempo,
        })
    }
}
