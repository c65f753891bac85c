use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occupancy of a unit.
#[derive(
    EnumIter, DeriveActiveEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "kosong")]
    #[serde(rename = "kosong")]
    Vacant,
    #[sea_orm(string_value = "terisi")]
    #[serde(rename = "terisi")]
    Occupied,
}

/// Rental units

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "properti")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_name = "nama_unit")]
    pub name: String,

    #[sea_orm(column_name = "tipe")]
    pub kind: String,

    /// monthly rent
    #[sea_orm(column_name = "harga_sewa", column_type = "Decimal(Some((12, 2)))")]
    pub rent: Decimal,

    #[sea_orm(column_name = "foto_path")]
    pub photo_path: Option<String>,

    /// set when a contract is signed for the unit, not derived
    pub status: Status,

    /// data create time
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tenant::Entity")]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
