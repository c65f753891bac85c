use crate::{now, Error, Result, Service};
use entity::{tenant, unit};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct UnitInput {
    pub name: String,
    pub kind: String,
    pub rent: Decimal,
    pub status: unit::Status,
    /// keeps the stored photo when `None`
    pub photo_path: Option<String>,
}

impl UnitInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Nama unit wajib diisi".to_owned()));
        }
        if self.rent.is_sign_negative() {
            return Err(Error::Validation(
                "Harga sewa tidak boleh negatif".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Unit with its current tenant.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnitView {
    pub id: i32,
    #[serde(rename = "nama_unit")]
    pub name: String,
    #[serde(rename = "tipe")]
    pub kind: String,
    #[serde(rename = "harga_sewa", with = "rust_decimal::serde::float")]
    pub rent: Decimal,
    #[serde(rename = "foto_path")]
    pub photo_path: String,
    pub status: unit::Status,
    #[serde(rename = "nama_penyewa")]
    pub tenant_name: String,
    /// `YYYY-MM-DD` or empty
    #[serde(rename = "jatuh_tempo")]
    pub due_date: String,
}

impl UnitView {
    fn new(unit: unit::Model, tenant: Option<&tenant::Model>) -> Self {
        Self {
            id: unit.id,
            name: unit.name,
            kind: unit.kind,
            rent: unit.rent,
            photo_path: unit.photo_path.unwrap_or_default(),
            status: unit.status,
            tenant_name: tenant.map(|t| t.name.clone()).unwrap_or_default(),
            due_date: tenant
                .and_then(|t| t.due_date)
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }
}

impl Service {
    pub async fn get_unit(&self, id: i32) -> Result<Option<unit::Model>> {
        Ok(unit::Entity::find_by_id(id).one(self.db()).await?)
    }

    pub async fn list_units(&self) -> Result<Vec<UnitView>> {
        let units = unit::Entity::find()
            .order_by_desc(unit::Column::Id)
            .all(self.db())
            .await?;

        // ascending, so the newest tenant of a unit overwrites older ones
        let tenants = tenant::Entity::find()
            .filter(tenant::Column::UnitId.is_not_null())
            .order_by_asc(tenant::Column::Id)
            .all(self.db())
            .await?;
        let mut occupants = HashMap::new();
        for t in tenants {
            if let Some(unit_id) = t.unit_id {
                occupants.insert(unit_id, t);
            }
        }

        Ok(units
            .into_iter()
            .map(|u| {
                let tenant = occupants.get(&u.id);
                UnitView::new(u, tenant)
            })
            .collect())
    }

    pub async fn create_unit(&self, input: UnitInput) -> Result<unit::Model> {
        input.validate()?;
        let now = now() as i64;
        let model = unit::ActiveModel {
            name: Set(input.name),
            kind: Set(input.kind),
            rent: Set(input.rent),
            photo_path: Set(input.photo_path),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db())
        .await?;
        info!("Created unit {}", model.id);
        Ok(model)
    }

    pub async fn update_unit(&self, id: i32, input: UnitInput) -> Result<unit::Model> {
        input.validate()?;
        let existing = self
            .get_unit(id)
            .await?
            .ok_or_else(|| unit_not_found(id))?;
        let mut model: unit::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.kind = Set(input.kind);
        model.rent = Set(input.rent);
        model.status = Set(input.status);
        if let Some(path) = input.photo_path {
            model.photo_path = Set(Some(path));
        }
        model.updated_at = Set(now() as i64);
        Ok(model.update(self.db()).await?)
    }

    /// Delete a unit, detaching its tenants first.
    pub async fn delete_unit(&self, id: i32) -> Result<()> {
        let txn = self.db().begin().await?;
        unit::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| unit_not_found(id))?;

        let detached = tenant::Entity::update_many()
            .set(tenant::ActiveModel {
                unit_id: Set(None),
                updated_at: Set(now() as i64),
                ..Default::default()
            })
            .filter(tenant::Column::UnitId.eq(id))
            .exec(&txn)
            .await?;
        unit::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            "Deleted unit {}, detached {} tenants",
            id, detached.rows_affected
        );
        Ok(())
    }
}

pub(crate) fn unit_not_found(id: i32) -> Error {
    Error::NotFound(format!("Properti {} tidak ditemukan", id))
}
