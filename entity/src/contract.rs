use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract lifecycle.
#[derive(
    EnumIter, DeriveActiveEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sea_orm(string_value = "lunas")]
    #[serde(rename = "lunas")]
    Paid,
    #[sea_orm(string_value = "ditolak")]
    #[serde(rename = "ditolak")]
    Rejected,
}

/// Contract and payment header

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pembayaran")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_name = "penyewa_id")]
    pub tenant_id: i32,

    /// total due
    #[sea_orm(column_name = "nominal", column_type = "Decimal(Some((12, 2)))")]
    pub total_due: Decimal,

    /// cumulative amount paid, cache of the installment sum.
    /// Null on legacy rows, which count as fully paid.
    #[sea_orm(
        column_name = "uang_dibayar",
        column_type = "Decimal(Some((12, 2)))",
        nullable
    )]
    pub paid: Option<Decimal>,

    #[sea_orm(column_name = "tanggal_bayar")]
    pub paid_on: Date,

    #[sea_orm(column_name = "tanggal_mulai")]
    pub period_start: Date,

    #[sea_orm(column_name = "tanggal_akhir")]
    pub period_end: Option<Date>,

    #[sea_orm(column_name = "metode_bayar")]
    pub method: String,

    #[sea_orm(column_name = "kwitansi_path")]
    pub receipt_path: Option<String>,

    pub status: Status,

    #[sea_orm(column_name = "keterangan", column_type = "Text")]
    pub note: String,

    /// data create time
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Tenant,
    #[sea_orm(has_many = "super::installment::Entity")]
    Installment,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::installment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
