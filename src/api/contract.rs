use super::{created, keep_file_if_ok, message, required, save_file};
use crate::{
    auth::Writable,
    date::{parse_date, parse_timestamp},
    upload::{Category, Form},
    AppState, ContractInput, ContractView, Error, InstallmentInput, InstallmentView, Result,
    DEFAULT_METHOD,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use entity::contract;
use serde_json::json;
use tracing::error;

fn contract_status(form: &Form) -> Result<contract::Status> {
    match form.text("status").as_deref() {
        None | Some("pending") => Ok(contract::Status::Pending),
        Some("lunas") => Ok(contract::Status::Paid),
        Some("ditolak") => Ok(contract::Status::Rejected),
        Some(s) => Err(Error::Validation(format!(
            "Status pembayaran tidak valid: {}",
            s
        ))),
    }
}

fn contract_input(form: &Form) -> Result<ContractInput> {
    const MISSING: &str = "Penyewa, total biaya, dan tanggal mulai wajib diisi";
    let tenant_id = required(form.parse_field("penyewa_id")?, MISSING)?;
    let total_due = required(form.parse_field("total_biaya")?, MISSING)?;
    let start = required(form.text("tanggal_mulai"), MISSING)?;

    let mut input = ContractInput::new(tenant_id, total_due, parse_date("tanggal_mulai", &start)?);
    // 0 is what clients send for "no unit"
    input.unit_id = form.parse_field::<i32>("properti_id")?.filter(|id| *id > 0);
    input.paid = form.parse_field("uang_dibayar")?;
    input.period_end = form
        .text("tanggal_akhir")
        .map(|s| parse_date("tanggal_akhir", &s))
        .transpose()?;
    input.method = form
        .text("metode_bayar")
        .unwrap_or_else(|| DEFAULT_METHOD.to_owned());
    input.note = form.text("keterangan");
    input.status = contract_status(form)?;
    Ok(input)
}

fn installment_input(form: &Form) -> Result<InstallmentInput> {
    let amount = required(
        form.parse_field("jumlah_dibayar")?,
        "Jumlah dibayar wajib diisi",
    )?;
    let mut input = InstallmentInput::new(amount);
    if let Some(method) = form.text("metode_bayar") {
        input.method = method;
    }
    input.note = form.text("keterangan").unwrap_or_default();
    input.paid_at = form
        .text("tanggal_bayar")
        .map(|s| parse_timestamp("tanggal_bayar", &s))
        .transpose()?;
    Ok(input)
}

/// Store a receipt without recording a payment.
#[post("/pembayaran/upload")]
pub async fn upload(
    _w: Writable,
    state: web::Data<AppState>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let path = save_file(&state, &form, "kwitansi", Category::Receipt)
        .await?
        .ok_or_else(|| Error::Validation("File tidak ditemukan".to_owned()))?;
    let filename = path.rsplit('/').next().unwrap_or_default().to_owned();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Upload berhasil",
        "filename": filename,
        "path": path,
    })))
}

#[get("/pembayaran")]
pub async fn list(state: web::Data<AppState>) -> impl Responder {
    match state.service.list_contracts().await {
        Ok(rows) => web::Json(rows),
        Err(e) => {
            error!("Failed to list contracts: {}", e);
            web::Json(Vec::<ContractView>::new())
        }
    }
}

#[post("/pembayaran")]
pub async fn create(
    _w: Writable,
    state: web::Data<AppState>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let mut input = contract_input(&form)?;
    let receipt = save_file(&state, &form, "kwitansi", Category::Receipt).await?;
    input.receipt_path = receipt.clone();
    let res = state.service.create_contract(input).await;
    let model = keep_file_if_ok(&state, &receipt, res).await?;
    Ok(created(
        model.id,
        "Kontrak berhasil dibuat",
        Some(("kwitansi_path", model.receipt_path)),
    ))
}

#[put("/pembayaran/{id}")]
pub async fn update(
    _w: Writable,
    state: web::Data<AppState>,
    id: web::Path<i32>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let mut input = contract_input(&form)?;
    let receipt = save_file(&state, &form, "kwitansi", Category::Receipt).await?;
    input.receipt_path = receipt.clone();
    let res = state.service.update_contract(id.into_inner(), input).await;
    let model = keep_file_if_ok(&state, &receipt, res).await?;
    Ok(message(model.id, "Pembayaran berhasil diupdate"))
}

#[delete("/pembayaran/{id}")]
pub async fn delete(
    _w: Writable,
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    state.service.delete_contract(id).await?;
    Ok(message(id, "Pembayaran berhasil dihapus"))
}

#[get("/pembayaran/{id}/riwayat")]
pub async fn list_installments(state: web::Data<AppState>, id: web::Path<i32>) -> impl Responder {
    let id = id.into_inner();
    match state.service.list_installments(id).await {
        Ok(rows) => web::Json(rows),
        Err(e) => {
            error!("Failed to list installments of contract {}: {}", id, e);
            web::Json(Vec::<InstallmentView>::new())
        }
    }
}

#[post("/pembayaran/{id}/riwayat")]
pub async fn add_installment(
    _w: Writable,
    state: web::Data<AppState>,
    id: web::Path<i32>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let mut input = installment_input(&form)?;
    let receipt = save_file(&state, &form, "kwitansi", Category::Receipt).await?;
    input.receipt_path = receipt.clone();
    let res = state.service.add_installment(id.into_inner(), input).await;
    let model = keep_file_if_ok(&state, &receipt, res).await?;
    Ok(created(
        model.id,
        "Riwayat pembayaran berhasil ditambahkan",
        Some(("kwitansi_path", model.receipt_path)),
    ))
}
