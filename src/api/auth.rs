use crate::{AppState, Error};
use actix_web::{post, web, Responder, Scope};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginReq {
    nama: String,
    password: String,
}

pub fn scope() -> Scope {
    web::scope("/auth")
        .app_data(web::JsonConfig::default().error_handler(|_err, _req| {
            Error::Validation("Data login tidak valid".to_owned()).into()
        }))
        .service(login)
        .service(logout)
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginReq>,
) -> Result<impl Responder, Error> {
    let user = state
        .setting
        .auth
        .login(&data.nama, &data.password)
        .ok_or_else(|| {
            warn!("Login failed for {}", data.nama);
            Error::Unauthorized
        })?;
    info!("Login {} as {}", user.name, user.role.as_str());
    Ok(web::Json(json!({
        "success": true,
        "message": "Login berhasil",
        "user": {
            "nama": user.name,
            "role": user.role,
        },
    })))
}

#[post("/logout")]
pub async fn logout() -> Result<impl Responder, Error> {
    Ok(web::Json(json!({
        "success": true,
        "message": "Logout berhasil",
    })))
}
