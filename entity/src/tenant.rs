use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status written by the contract cascade.
/// Readers derive the effective status from the ledger instead.
#[derive(EnumIter, DeriveActiveEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "belum_bayar")]
    #[serde(rename = "belum_bayar")]
    Unpaid,
    #[sea_orm(string_value = "lunas")]
    #[serde(rename = "lunas")]
    Paid,
}

/// Tenants

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "penyewa")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_name = "nama")]
    pub name: String,

    /// national id number
    pub nik: Option<String>,

    pub email: Option<String>,

    #[sea_orm(column_name = "telepon")]
    pub phone: String,

    #[sea_orm(column_name = "alamat", column_type = "Text", nullable)]
    pub address: Option<String>,

    /// only written by the contract cascade
    #[sea_orm(column_name = "properti_id")]
    pub unit_id: Option<i32>,

    #[sea_orm(column_name = "mulai_kontrak")]
    pub contract_start: Option<Date>,

    #[sea_orm(column_name = "jatuh_tempo")]
    pub due_date: Option<Date>,

    #[sea_orm(column_name = "status_bayar")]
    pub payment_status: Option<PaymentStatus>,

    /// identity document
    pub ktp_path: Option<String>,

    /// data create time
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Unit,
    #[sea_orm(has_many = "super::contract::Entity")]
    Contract,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
