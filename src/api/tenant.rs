use super::{created, keep_file_if_ok, message, save_file};
use crate::{
    auth::Writable,
    upload::{Category, Form},
    AppState, Error, TenantInput,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

fn tenant_input(form: &Form) -> TenantInput {
    TenantInput {
        name: form.text("nama").unwrap_or_default(),
        phone: form.text("telepon").unwrap_or_default(),
        nik: form.text("nik"),
        email: form.text("email"),
        address: form.text("alamat"),
        ktp_path: None,
    }
}

#[get("/penyewa")]
pub async fn list(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    Ok(web::Json(state.service.list_tenants().await?))
}

#[post("/penyewa")]
pub async fn create(
    _w: Writable,
    state: web::Data<AppState>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let mut input = tenant_input(&form);
    let ktp = save_file(&state, &form, "ktp", Category::Identity).await?;
    input.ktp_path = ktp.clone();
    let res = state.service.create_tenant(input).await;
    let model = keep_file_if_ok(&state, &ktp, res).await?;
    Ok(created(
        model.id,
        "Penyewa berhasil ditambahkan",
        Some(("ktp_path", model.ktp_path)),
    ))
}

#[put("/penyewa/{id}")]
pub async fn update(
    _w: Writable,
    state: web::Data<AppState>,
    id: web::Path<i32>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let mut input = tenant_input(&form);
    let ktp = save_file(&state, &form, "ktp", Category::Identity).await?;
    input.ktp_path = ktp.clone();
    let res = state.service.update_tenant(id.into_inner(), input).await;
    let model = keep_file_if_ok(&state, &ktp, res).await?;
    Ok(message(model.id, "Penyewa updated successfully"))
}

#[delete("/penyewa/{id}")]
pub async fn delete(
    _w: Writable,
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    state.service.delete_tenant(id).await?;
    Ok(message(id, "Penyewa deleted successfully"))
}
