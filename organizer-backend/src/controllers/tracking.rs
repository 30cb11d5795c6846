//! Daily habit tracking. Counters from an earlier day are zeroed on read.

use actix_web::{web, HttpResponse};

use crate::config::today;
use crate::controllers::with_db;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateTrackingRequest, DoneDelta, UpdateDoneRequest};
use crate::AppState;

async fn list_tracking(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let date = today();
    let items = with_db(&state, move |db| db.list_tracking(&date)).await?;
    Ok(HttpResponse::Ok().json(items))
}

async fn add_tracking(
    state: web::Data<AppState>,
    body: web::Json<CreateTrackingRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let date = today();
    let item = with_db(&state, move |db| {
        db.add_tracking_item(&req.name, req.amount, &req.content, &date)
    })
    .await?;
    Ok(HttpResponse::Ok().json(item))
}

async fn update_done(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateDoneRequest>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let delta = DoneDelta::from_i64(body.delta).ok_or_else(|| {
        ApiError::Validation(format!("Field `delta` must be 1 or -1, got {}", body.delta))
    })?;
    let item = with_db(&state, move |db| db.update_tracking_done(&name, delta)).await?;
    Ok(HttpResponse::Ok().json(item))
}

async fn delete_tracking(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let deleted = with_db(&state, move |db| db.delete_tracking_item(&name)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tracking")
            .route("", web::get().to(list_tracking))
            .route("", web::post().to(add_tracking))
            .route("/{name}/done", web::put().to(update_done))
            .route("/{name}", web::delete().to(delete_tracking)),
    );
}
