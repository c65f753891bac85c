use sea_orm::entity::prelude::*;

/// Payment installments, append only.

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "riwayat_pembayaran")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_name = "pembayaran_id")]
    pub contract_id: i32,

    #[sea_orm(column_name = "jumlah_dibayar", column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,

    /// payment time, defaults to the creation time
    #[sea_orm(column_name = "tanggal_bayar")]
    pub paid_at: i64,

    #[sea_orm(column_name = "metode_bayar")]
    pub method: String,

    #[sea_orm(column_name = "kwitansi_path")]
    pub receipt_path: Option<String>,

    #[sea_orm(column_name = "keterangan", column_type = "Text")]
    pub note: String,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Contract,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
