use crate::{date, AppState, Error};
use actix_web::{get, web, Responder};

#[get("/dashboard/stats")]
pub async fn stats(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    Ok(web::Json(
        state.service.dashboard_stats(date::today()).await?,
    ))
}
