//! Files, their content blobs, the linked registry and entries.

use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::controllers::with_db;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateEntryRequest, CreateFileRequest, SetLinkedRequest};
use crate::AppState;

async fn create_file(
    state: web::Data<AppState>,
    body: web::Json<CreateFileRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let created = with_db(&state, move |db| db.create_file(req.topic_id, &req.name, req.section)).await?;
    log::debug!("[FILES] Created file {}", created.file_id);
    Ok(HttpResponse::Ok().json(created))
}

async fn get_file(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let file = with_db(&state, move |db| db.get_file(id))
        .await?
        .ok_or_else(|| ApiError::not_found("File"))?;
    Ok(HttpResponse::Ok().json(file))
}

async fn delete_file(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = with_db(&state, move |db| db.delete_file(id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

async fn get_content(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let content = with_db(&state, move |db| db.get_file_content(id)).await?;
    Ok(HttpResponse::Ok().json(content))
}

/// Any JSON document is accepted and stored as-is
async fn put_content(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let content = body.into_inner();
    with_db(&state, move |db| db.set_file_content(id, &content)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "saved": true })))
}

async fn set_linked(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<SetLinkedRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let linked = body.linked;
    let file = with_db(&state, move |db| db.set_file_linked(id, linked)).await?;
    Ok(HttpResponse::Ok().json(file))
}

async fn clear_linked(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let file = with_db(&state, move |db| db.set_file_linked(id, false)).await?;
    Ok(HttpResponse::Ok().json(file))
}

async fn toggle_linked(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let linked = with_db(&state, move |db| db.toggle_file_linked(id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "linked": linked })))
}

async fn list_linked(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let files = with_db(&state, |db| db.list_linked_files()).await?;
    Ok(HttpResponse::Ok().json(files))
}

async fn list_entries(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let entries = with_db(&state, move |db| db.list_entries(id)).await?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn add_entry(
    state: web::Data<AppState>,
    body: web::Json<CreateEntryRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let entry = with_db(&state, move |db| {
        db.add_entry(req.file_id, &req.text, req.date.as_deref(), req.done, req.order)
    })
    .await?;
    Ok(HttpResponse::Ok().json(entry))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/files")
            .route("", web::post().to(create_file))
            .route("/{id}", web::get().to(get_file))
            .route("/{id}", web::delete().to(delete_file))
            .route("/{id}/content", web::get().to(get_content))
            .route("/{id}/content", web::put().to(put_content))
            .route("/{id}/linked", web::put().to(set_linked))
            .route("/{id}/linked", web::delete().to(clear_linked))
            .route("/{id}/linked/toggle", web::post().to(toggle_linked))
            .route("/{id}/entries", web::get().to(list_entries)),
    )
    .route("/linked_files", web::get().to(list_linked))
    .route("/entries", web::post().to(add_entry));
}
