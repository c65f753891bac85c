use super::{created, keep_file_if_ok, message, save_file};
use crate::{
    auth::Writable,
    upload::{Category, Form},
    AppState, Error, Result, UnitInput,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use entity::unit;

fn unit_status(form: &Form) -> Result<unit::Status> {
    match form.text("status").as_deref() {
        None | Some("kosong") => Ok(unit::Status::Vacant),
        Some("terisi") => Ok(unit::Status::Occupied),
        Some(s) => Err(Error::Validation(format!("Status properti tidak valid: {}", s))),
    }
}

fn unit_input(form: &Form) -> Result<UnitInput> {
    Ok(UnitInput {
        name: form.text("nama_unit").unwrap_or_default(),
        kind: form.text("tipe").unwrap_or_default(),
        rent: form.parse_field("harga_sewa")?.unwrap_or_default(),
        status: unit_status(form)?,
        photo_path: None,
    })
}

#[get("/properti")]
pub async fn list(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    Ok(web::Json(state.service.list_units().await?))
}

#[post("/properti")]
pub async fn create(
    _w: Writable,
    state: web::Data<AppState>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let mut input = unit_input(&form)?;
    let photo = save_file(&state, &form, "foto", Category::Unit).await?;
    input.photo_path = photo.clone();
    let res = state.service.create_unit(input).await;
    let model = keep_file_if_ok(&state, &photo, res).await?;
    Ok(created(
        model.id,
        "Properti created successfully",
        Some(("foto_path", model.photo_path)),
    ))
}

#[put("/properti/{id}")]
pub async fn update(
    _w: Writable,
    state: web::Data<AppState>,
    id: web::Path<i32>,
    form: Form,
) -> Result<HttpResponse, Error> {
    let mut input = unit_input(&form)?;
    let photo = save_file(&state, &form, "foto", Category::Unit).await?;
    input.photo_path = photo.clone();
    let res = state.service.update_unit(id.into_inner(), input).await;
    let model = keep_file_if_ok(&state, &photo, res).await?;
    Ok(message(model.id, "Properti updated successfully"))
}

#[delete("/properti/{id}")]
pub async fn delete(
    _w: Writable,
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    state.service.delete_unit(id).await?;
    Ok(message(id, "Properti deleted successfully"))
}
