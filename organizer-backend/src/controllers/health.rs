use actix_web::{web, HttpResponse};

use crate::controllers::with_db;
use crate::error::ApiResult;
use crate::AppState;

/// Liveness probe; also proves the pool can hand out a connection
async fn health(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    with_db(&state, |db| db.conn().map(|_| ())).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}
