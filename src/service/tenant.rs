use crate::{
    now,
    status::{effective_paid, payment_status, PaymentStatus},
    Error, Result, Service,
};
use entity::{contract, tenant, unit};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct TenantInput {
    pub name: String,
    pub phone: String,
    pub nik: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// keeps the stored document when `None`
    pub ktp_path: Option<String>,
}

impl TenantInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.phone.trim().is_empty() {
            return Err(Error::Validation(
                "Nama dan telepon wajib diisi".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Tenant with its unit and the status of its latest contract.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TenantView {
    pub id: i32,
    #[serde(rename = "nama")]
    pub name: String,
    pub nik: String,
    pub email: String,
    #[serde(rename = "telepon")]
    pub phone: String,
    #[serde(rename = "alamat")]
    pub address: String,
    /// 0 without a unit
    #[serde(rename = "properti_id")]
    pub unit_id: i32,
    #[serde(rename = "nama_properti")]
    pub unit_name: String,
    #[serde(rename = "foto_properti")]
    pub unit_photo: String,
    #[serde(rename = "mulai_kontrak")]
    pub contract_start: String,
    #[serde(rename = "jatuh_tempo")]
    pub due_date: String,
    #[serde(rename = "status_bayar")]
    pub status: PaymentStatus,
    pub ktp_path: String,
    #[serde(rename = "total_biaya", with = "rust_decimal::serde::float")]
    pub total_due: Decimal,
    #[serde(rename = "uang_dibayar", with = "rust_decimal::serde::float")]
    pub paid: Decimal,
}

impl TenantView {
    fn new(
        tenant: tenant::Model,
        unit: Option<unit::Model>,
        latest: Option<&contract::Model>,
    ) -> Self {
        let (total_due, paid) = latest
            .map(|c| (c.total_due, effective_paid(c.total_due, c.paid)))
            .unwrap_or_default();
        Self {
            id: tenant.id,
            name: tenant.name,
            nik: tenant.nik.unwrap_or_default(),
            email: tenant.email.unwrap_or_default(),
            phone: tenant.phone,
            address: tenant.address.unwrap_or_default(),
            unit_id: tenant.unit_id.unwrap_or_default(),
            unit_name: unit.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            unit_photo: unit.and_then(|u| u.photo_path).unwrap_or_default(),
            contract_start: tenant
                .contract_start
                .map(|d| d.to_string())
                .unwrap_or_default(),
            due_date: tenant.due_date.map(|d| d.to_string()).unwrap_or_default(),
            status: payment_status(total_due, paid),
            ktp_path: tenant.ktp_path.unwrap_or_default(),
            total_due,
            paid,
        }
    }
}

impl Service {
    pub async fn get_tenant(&self, id: i32) -> Result<Option<tenant::Model>> {
        Ok(tenant::Entity::find_by_id(id).one(self.db()).await?)
    }

    pub async fn list_tenants(&self) -> Result<Vec<TenantView>> {
        let tenants = tenant::Entity::find()
            .find_also_related(unit::Entity)
            .order_by_desc(tenant::Column::Id)
            .all(self.db())
            .await?;

        // oldest first, so the latest contract of each tenant is inserted last
        let contracts = contract::Entity::find()
            .order_by_asc(contract::Column::CreatedAt)
            .order_by_asc(contract::Column::Id)
            .all(self.db())
            .await?;
        let mut latest = HashMap::new();
        for c in contracts {
            latest.insert(c.tenant_id, c);
        }

        Ok(tenants
            .into_iter()
            .map(|(t, u)| {
                let contract = latest.get(&t.id);
                TenantView::new(t, u, contract)
            })
            .collect())
    }

    pub async fn create_tenant(&self, input: TenantInput) -> Result<tenant::Model> {
        input.validate()?;
        let now = now() as i64;
        let model = tenant::ActiveModel {
            name: Set(input.name),
            phone: Set(input.phone),
            nik: Set(input.nik),
            email: Set(input.email),
            address: Set(input.address),
            ktp_path: Set(input.ktp_path),
            unit_id: Set(None),
            contract_start: Set(None),
            due_date: Set(None),
            payment_status: Set(Some(tenant::PaymentStatus::Unpaid)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db())
        .await?;
        info!("Created tenant {}", model.id);
        Ok(model)
    }

    /// Update identity fields. The unit link is only written by contracts.
    pub async fn update_tenant(&self, id: i32, input: TenantInput) -> Result<tenant::Model> {
        input.validate()?;
        let existing = self
            .get_tenant(id)
            .await?
            .ok_or_else(|| tenant_not_found(id))?;
        let mut model: tenant::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.phone = Set(input.phone);
        model.nik = Set(input.nik);
        model.email = Set(input.email);
        model.address = Set(input.address);
        if let Some(path) = input.ktp_path {
            model.ktp_path = Set(Some(path));
        }
        model.updated_at = Set(now() as i64);
        Ok(model.update(self.db()).await?)
    }

    pub async fn delete_tenant(&self, id: i32) -> Result<()> {
        self.get_tenant(id)
            .await?
            .ok_or_else(|| tenant_not_found(id))?;
        let contracts = contract::Entity::find()
            .filter(contract::Column::TenantId.eq(id))
            .count(self.db())
            .await?;
        if contracts > 0 {
            return Err(Error::Conflict(format!(
                "Penyewa masih memiliki {} data pembayaran, hapus pembayaran terlebih dahulu",
                contracts
            )));
        }
        tenant::Entity::delete_by_id(id).exec(self.db()).await?;
        info!("Deleted tenant {}", id);
        Ok(())
    }
}

pub(crate) fn tenant_not_found(id: i32) -> Error {
    Error::NotFound(format!("Penyewa {} tidak ditemukan", id))
}
