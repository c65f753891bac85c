//! Contract headers and their installment history.
//!
//! The installment rows are the record of what was paid. The header's paid
//! column is rewritten to their sum in the same transaction as every
//! installment write.

use super::{tenant::tenant_not_found, unit::unit_not_found};
use crate::{date, now, status::effective_paid, Error, Result, Service};
use chrono::NaiveDate;
use entity::{contract, installment, tenant, unit};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};

pub const DEFAULT_METHOD: &str = "Transfer";
const INITIAL_NOTE: &str = "Pembayaran awal";
const ADJUSTMENT_NOTE: &str = "Penyesuaian pembayaran";

#[derive(Debug, Clone)]
pub struct ContractInput {
    pub tenant_id: i32,
    /// occupy this unit for the tenant
    pub unit_id: Option<i32>,
    pub total_due: Decimal,
    /// paid so far, `None` means fully paid
    pub paid: Option<Decimal>,
    pub period_start: NaiveDate,
    pub period_end: Option<NaiveDate>,
    pub method: String,
    /// keeps the stored receipt on update when `None`
    pub receipt_path: Option<String>,
    pub note: Option<String>,
    /// ignored on create
    pub status: contract::Status,
}

impl ContractInput {
    pub fn new(tenant_id: i32, total_due: Decimal, period_start: NaiveDate) -> Self {
        Self {
            tenant_id,
            unit_id: None,
            total_due,
            paid: None,
            period_start,
            period_end: None,
            method: DEFAULT_METHOD.to_owned(),
            receipt_path: None,
            note: None,
            status: contract::Status::Pending,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.total_due.is_sign_negative() && !self.total_due.is_zero() {
            return Err(Error::Validation(
                "Total biaya tidak boleh negatif".to_owned(),
            ));
        }
        if matches!(self.paid, Some(p) if p.is_sign_negative() && !p.is_zero()) {
            return Err(Error::Validation(
                "Uang dibayar tidak boleh negatif".to_owned(),
            ));
        }
        if matches!(self.period_end, Some(end) if end < self.period_start) {
            return Err(Error::Validation(
                "Tanggal akhir tidak boleh sebelum tanggal mulai".to_owned(),
            ));
        }
        Ok(())
    }

    fn default_note(&self) -> String {
        format!(
            "Kontrak sewa dari {} sampai {}",
            self.period_start,
            self.period_end.map(|d| d.to_string()).unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone)]
pub struct InstallmentInput {
    pub amount: Decimal,
    pub method: String,
    pub receipt_path: Option<String>,
    pub note: String,
    /// unix seconds, now when `None`
    pub paid_at: Option<i64>,
}

impl InstallmentInput {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            method: DEFAULT_METHOD.to_owned(),
            receipt_path: None,
            note: String::new(),
            paid_at: None,
        }
    }
}

/// Contract header joined with its tenant.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContractView {
    pub id: i32,
    #[serde(rename = "penyewa_id")]
    pub tenant_id: i32,
    #[serde(rename = "properti_id")]
    pub unit_id: i32,
    #[serde(rename = "nama_penyewa")]
    pub tenant_name: String,
    pub nik: String,
    pub email: String,
    #[serde(rename = "telepon")]
    pub phone: String,
    #[serde(rename = "alamat")]
    pub address: String,
    pub ktp_path: String,
    #[serde(rename = "nominal", with = "rust_decimal::serde::float")]
    pub total_due: Decimal,
    #[serde(rename = "uang_dibayar", with = "rust_decimal::serde::float")]
    pub paid: Decimal,
    #[serde(rename = "tanggal_bayar")]
    pub paid_on: String,
    #[serde(rename = "tanggal_mulai")]
    pub period_start: String,
    #[serde(rename = "tanggal_akhir")]
    pub period_end: Option<String>,
    #[serde(rename = "metode_bayar")]
    pub method: String,
    #[serde(rename = "kwitansi_path")]
    pub receipt_path: String,
    pub status: contract::Status,
    #[serde(rename = "keterangan")]
    pub note: String,
}

impl ContractView {
    fn new(c: contract::Model, t: Option<tenant::Model>) -> Self {
        let t = t.unwrap_or_else(|| tenant::Model {
            id: c.tenant_id,
            name: "Unknown".to_owned(),
            nik: None,
            email: None,
            phone: String::new(),
            address: None,
            unit_id: None,
            contract_start: None,
            due_date: None,
            payment_status: None,
            ktp_path: None,
            created_at: 0,
            updated_at: 0,
        });
        Self {
            id: c.id,
            tenant_id: c.tenant_id,
            unit_id: t.unit_id.unwrap_or_default(),
            tenant_name: t.name,
            nik: t.nik.unwrap_or_default(),
            email: t.email.unwrap_or_default(),
            phone: t.phone,
            address: t.address.unwrap_or_default(),
            ktp_path: t.ktp_path.unwrap_or_default(),
            total_due: c.total_due,
            paid: effective_paid(c.total_due, c.paid),
            paid_on: c.paid_on.to_string(),
            period_start: c.period_start.to_string(),
            period_end: c.period_end.map(|d| d.to_string()),
            method: c.method,
            receipt_path: c.receipt_path.unwrap_or_default(),
            status: c.status,
            note: c.note,
        }
    }
}

/// Installment with the amount paid up to and including it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstallmentView {
    pub id: i32,
    #[serde(rename = "jumlah_dibayar", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// `YYYY-MM-DD HH:MM:SS` UTC
    #[serde(rename = "tanggal_bayar")]
    pub paid_at: String,
    #[serde(rename = "metode_bayar")]
    pub method: String,
    #[serde(rename = "kwitansi_path")]
    pub receipt_path: String,
    #[serde(rename = "keterangan")]
    pub note: String,
    #[serde(rename = "total_sampai_sini", with = "rust_decimal::serde::float")]
    pub running_total: Decimal,
}

/// Order installments by payment time and annotate running totals.
pub fn running_totals(mut rows: Vec<installment::Model>) -> Vec<InstallmentView> {
    rows.sort_by_key(|r| (r.paid_at, r.id));
    let mut total = Decimal::ZERO;
    rows.into_iter()
        .map(|r| {
            total += r.amount;
            InstallmentView {
                id: r.id,
                amount: r.amount,
                paid_at: date::from_timestamp(r.paid_at)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                method: r.method,
                receipt_path: r.receipt_path.unwrap_or_default(),
                note: r.note,
                running_total: total,
            }
        })
        .collect()
}

async fn installment_sum<C: ConnectionTrait>(db: &C, contract_id: i32) -> Result<Decimal> {
    let rows = installment::Entity::find()
        .filter(installment::Column::ContractId.eq(contract_id))
        .all(db)
        .await?;
    Ok(rows.iter().map(|r| r.amount).sum())
}

async fn insert_installment(
    txn: &DatabaseTransaction,
    contract_id: i32,
    input: InstallmentInput,
) -> Result<installment::Model> {
    let now = now() as i64;
    Ok(installment::ActiveModel {
        contract_id: Set(contract_id),
        amount: Set(input.amount),
        paid_at: Set(input.paid_at.unwrap_or(now)),
        method: Set(input.method),
        receipt_path: Set(input.receipt_path),
        note: Set(input.note),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?)
}

/// Mark the unit occupied and attach it to the tenant.
async fn occupy(
    txn: &DatabaseTransaction,
    unit_id: i32,
    tenant_id: i32,
    start: NaiveDate,
) -> Result<()> {
    unit::Entity::find_by_id(unit_id)
        .one(txn)
        .await?
        .ok_or_else(|| unit_not_found(unit_id))?;
    let now = now() as i64;
    unit::ActiveModel {
        id: Set(unit_id),
        status: Set(unit::Status::Occupied),
        updated_at: Set(now),
        ..Default::default()
    }
    .update(txn)
    .await?;

    tenant::ActiveModel {
        id: Set(tenant_id),
        unit_id: Set(Some(unit_id)),
        contract_start: Set(Some(start)),
        due_date: Set(Some(date::add_month(start))),
        payment_status: Set(Some(tenant::PaymentStatus::Paid)),
        updated_at: Set(now),
        ..Default::default()
    }
    .update(txn)
    .await?;
    debug!("Unit {} occupied by tenant {}", unit_id, tenant_id);
    Ok(())
}

async fn ensure_tenant(txn: &DatabaseTransaction, tenant_id: i32) -> Result<()> {
    tenant::Entity::find_by_id(tenant_id)
        .one(txn)
        .await?
        .map(|_| ())
        .ok_or_else(|| Error::Validation(tenant_not_found(tenant_id).to_string()))
}

impl Service {
    pub async fn get_contract(&self, id: i32) -> Result<Option<contract::Model>> {
        Ok(contract::Entity::find_by_id(id).one(self.db()).await?)
    }

    /// Create a contract header, its initial installment and the occupancy
    /// of the unit, all or nothing.
    pub async fn create_contract(&self, input: ContractInput) -> Result<contract::Model> {
        input.validate()?;
        let txn = self.db().begin().await?;
        ensure_tenant(&txn, input.tenant_id).await?;

        let paid = input.paid.unwrap_or(input.total_due);
        let note = input.note.clone().unwrap_or_else(|| input.default_note());
        let now = now() as i64;
        let header = contract::ActiveModel {
            tenant_id: Set(input.tenant_id),
            total_due: Set(input.total_due),
            paid: Set(Some(paid)),
            paid_on: Set(input.period_start),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            method: Set(input.method.clone()),
            receipt_path: Set(input.receipt_path.clone()),
            status: Set(contract::Status::Pending),
            note: Set(note),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if paid > Decimal::ZERO {
            insert_installment(
                &txn,
                header.id,
                InstallmentInput {
                    amount: paid,
                    method: input.method.clone(),
                    receipt_path: input.receipt_path.clone(),
                    note: INITIAL_NOTE.to_owned(),
                    paid_at: Some(midnight(input.period_start)),
                },
            )
            .await?;
        }

        if let Some(unit_id) = input.unit_id {
            occupy(&txn, unit_id, input.tenant_id, input.period_start).await?;
        }
        txn.commit().await?;

        info!(
            "Created contract {} for tenant {}, paid {} of {}",
            header.id, header.tenant_id, paid, header.total_due
        );
        Ok(header)
    }

    /// Overwrite a contract header. A higher paid amount is recorded as an
    /// adjustment installment.
    pub async fn update_contract(&self, id: i32, input: ContractInput) -> Result<contract::Model> {
        input.validate()?;
        let txn = self.db().begin().await?;
        // writers to one contract run one at a time
        let existing = contract::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| contract_not_found(id))?;
        ensure_tenant(&txn, input.tenant_id).await?;

        let mut sum = installment_sum(&txn, id).await?;
        if let Some(paid) = input.paid {
            if paid < sum {
                return Err(Error::Validation(format!(
                    "Uang dibayar tidak boleh kurang dari total riwayat pembayaran ({})",
                    sum
                )));
            }
            if paid > sum {
                insert_installment(
                    &txn,
                    id,
                    InstallmentInput {
                        amount: paid - sum,
                        method: input.method.clone(),
                        receipt_path: input.receipt_path.clone(),
                        note: ADJUSTMENT_NOTE.to_owned(),
                        paid_at: None,
                    },
                )
                .await?;
                sum = paid;
            }
        }
        // legacy rows without history stay fully paid
        let cached = if input.paid.is_none() && existing.paid.is_none() {
            None
        } else {
            Some(sum)
        };

        let mut model: contract::ActiveModel = existing.into();
        model.tenant_id = Set(input.tenant_id);
        model.total_due = Set(input.total_due);
        model.paid = Set(cached);
        model.paid_on = Set(input.period_start);
        model.period_start = Set(input.period_start);
        model.period_end = Set(input.period_end);
        model.method = Set(input.method.clone());
        model.status = Set(input.status);
        if let Some(path) = input.receipt_path.clone() {
            model.receipt_path = Set(Some(path));
        }
        if let Some(note) = input.note.clone() {
            model.note = Set(note);
        }
        model.updated_at = Set(now() as i64);
        let header = model.update(&txn).await?;

        if let Some(unit_id) = input.unit_id {
            occupy(&txn, unit_id, input.tenant_id, input.period_start).await?;
        }
        txn.commit().await?;
        info!("Updated contract {}", id);
        Ok(header)
    }

    pub async fn delete_contract(&self, id: i32) -> Result<()> {
        let txn = self.db().begin().await?;
        contract::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| contract_not_found(id))?;
        let removed = installment::Entity::delete_many()
            .filter(installment::Column::ContractId.eq(id))
            .exec(&txn)
            .await?;
        contract::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        info!(
            "Deleted contract {} with {} installments",
            id, removed.rows_affected
        );
        Ok(())
    }

    /// All contracts, newest first.
    pub async fn list_contracts(&self) -> Result<Vec<ContractView>> {
        let rows = contract::Entity::find()
            .find_also_related(tenant::Entity)
            .order_by_desc(contract::Column::CreatedAt)
            .order_by_desc(contract::Column::Id)
            .all(self.db())
            .await?;
        Ok(rows
            .into_iter()
            .map(|(c, t)| ContractView::new(c, t))
            .collect())
    }

    /// Append an installment and refresh the header's paid amount.
    pub async fn add_installment(
        &self,
        contract_id: i32,
        input: InstallmentInput,
    ) -> Result<installment::Model> {
        if input.amount <= Decimal::ZERO {
            return Err(Error::Validation(
                "Jumlah dibayar harus lebih dari 0".to_owned(),
            ));
        }
        let txn = self.db().begin().await?;
        contract::Entity::find_by_id(contract_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| contract_not_found(contract_id))?;

        let row = insert_installment(&txn, contract_id, input).await?;
        let sum = installment_sum(&txn, contract_id).await?;
        contract::ActiveModel {
            id: Set(contract_id),
            paid: Set(Some(sum)),
            updated_at: Set(now() as i64),
            ..Default::default()
        }
        .update(&txn)
        .await?;
        txn.commit().await?;

        info!(
            "Added installment {} to contract {}, paid {}",
            row.id, contract_id, sum
        );
        Ok(row)
    }

    pub async fn list_installments(&self, contract_id: i32) -> Result<Vec<InstallmentView>> {
        let rows = installment::Entity::find()
            .filter(installment::Column::ContractId.eq(contract_id))
            .order_by_asc(installment::Column::PaidAt)
            .order_by_asc(installment::Column::Id)
            .all(self.db())
            .await?;
        Ok(running_totals(rows))
    }
}

fn midnight(day: NaiveDate) -> i64 {
    day.and_time(Default::default()).and_utc().timestamp()
}

pub(crate) fn contract_not_found(id: i32) -> Error {
    Error::NotFound(format!("Pembayaran {} tidak ditemukan", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, amount: i64, paid_at: i64) -> installment::Model {
        installment::Model {
            id,
            contract_id: 1,
            amount: Decimal::from(amount),
            paid_at,
            method: DEFAULT_METHOD.to_owned(),
            receipt_path: None,
            note: String::new(),
            created_at: 0,
        }
    }

    #[test]
    fn prefix_sums() {
        let views = running_totals(vec![
            row(3, 100, 1_710_600_000),
            row(1, 250, 1_710_460_800),
            row(2, 50, 1_710_600_000),
        ]);
        let ids: Vec<_> = views.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let totals: Vec<_> = views.iter().map(|v| v.running_total).collect();
        assert_eq!(
            totals,
            vec![Decimal::from(250), Decimal::from(300), Decimal::from(400)]
        );
        assert_eq!(views[0].paid_at, "2024-03-15 00:00:00");
        assert!(running_totals(vec![]).is_empty());
    }

    #[test]
    fn input() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut input = ContractInput::new(1, Decimal::from(500), start);
        assert_eq!(input.default_note(), "Kontrak sewa dari 2024-03-15 sampai ");
        input.period_end = NaiveDate::from_ymd_opt(2024, 4, 15);
        assert_eq!(
            input.default_note(),
            "Kontrak sewa dari 2024-03-15 sampai 2024-04-15"
        );
        assert!(input.validate().is_ok());

        input.period_end = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
        input.period_end = None;
        input.total_due = Decimal::from(-5);
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
        input.total_due = Decimal::ZERO;
        input.paid = Some(Decimal::from(-1));
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn view_fallbacks() -> anyhow::Result<()> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let c = contract::Model {
            id: 9,
            tenant_id: 4,
            total_due: Decimal::from(500),
            paid: None,
            paid_on: start,
            period_start: start,
            period_end: None,
            method: DEFAULT_METHOD.to_owned(),
            receipt_path: None,
            status: contract::Status::Pending,
            note: String::new(),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_value(ContractView::new(c, None))?;
        assert_eq!(json["nama_penyewa"], "Unknown");
        assert_eq!(json["uang_dibayar"], 500.0);
        assert_eq!(json["tanggal_mulai"], "2024-03-15");
        assert!(json["tanggal_akhir"].is_null());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["properti_id"], 0);
        Ok(())
    }
}
