//! Signaling between frontend windows: a one-shot argument blob and a
//! pending "open window" request.

use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::AppState;

async fn set_args(state: web::Data<AppState>, body: web::Json<Value>) -> HttpResponse {
    state.signals.set_args(body.into_inner());
    HttpResponse::Ok().json(serde_json::json!({ "stored": true }))
}

/// Returns the stored blob once, `null` afterwards
async fn take_args(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.signals.take_args().unwrap_or(Value::Null))
}

async fn raise_open_request(state: web::Data<AppState>) -> HttpResponse {
    state.signals.raise_open_request();
    HttpResponse::Ok().json(serde_json::json!({ "open_request": true }))
}

async fn check_open_request(state: web::Data<AppState>) -> HttpResponse {
    let pending = state.signals.take_open_request();
    HttpResponse::Ok().json(serde_json::json!({ "open_request": pending }))
}

async fn reset_open_request(state: web::Data<AppState>) -> HttpResponse {
    state.signals.reset_open_request();
    HttpResponse::Ok().json(serde_json::json!({ "open_request": false }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/window")
            .route("/args", web::post().to(set_args))
            .route("/args", web::get().to(take_args))
            .route("/open_request", web::post().to(raise_open_request))
            .route("/open_request", web::get().to(check_open_request))
            .route("/open_request", web::delete().to(reset_open_request)),
    );
}
