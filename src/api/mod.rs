//! http api

use crate::{
    upload::{Category, Form},
    AppState, Error, Result,
};
use actix_web::{web, HttpResponse, Scope};
use serde_json::{json, Value};

mod auth;
mod contract;
mod dashboard;
mod tenant;
mod unit;

pub fn scope() -> Scope {
    web::scope("/api")
        .service(dashboard::stats)
        .service(auth::scope())
        .service(unit::list)
        .service(unit::create)
        .service(unit::update)
        .service(unit::delete)
        .service(tenant::list)
        .service(tenant::create)
        .service(tenant::update)
        .service(tenant::delete)
        .service(contract::upload)
        .service(contract::list)
        .service(contract::create)
        .service(contract::update)
        .service(contract::delete)
        .service(contract::list_installments)
        .service(contract::add_installment)
}

/// Store the file sent in `field`, if any.
async fn save_file(
    state: &AppState,
    form: &Form,
    field: &str,
    category: Category,
) -> Result<Option<String>> {
    match form.file(field) {
        Some(file) => Ok(Some(state.service.files().save(category, file).await?)),
        None => Ok(None),
    }
}

/// Drop a file stored for a request that failed afterwards.
async fn keep_file_if_ok<T>(state: &AppState, path: &Option<String>, res: Result<T>) -> Result<T> {
    if res.is_err() {
        if let Some(path) = path {
            state.service.files().remove(path).await;
        }
    }
    res
}

fn required<T>(value: Option<T>, message: &str) -> Result<T> {
    value.ok_or_else(|| Error::Validation(message.to_owned()))
}

fn created(id: i32, message: &str, extra: Option<(&str, Option<String>)>) -> HttpResponse {
    let mut body = json!({
        "id": id,
        "message": message,
    });
    if let (Some((key, value)), Value::Object(map)) = (extra, &mut body) {
        map.insert(key.to_owned(), json!(value.unwrap_or_default()));
    }
    HttpResponse::Created().json(body)
}

fn message(id: i32, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "id": id,
        "message": message,
    }))
}
