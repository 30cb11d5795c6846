use actix_web::{web, HttpResponse};

use crate::controllers::with_db;
use crate::error::{ApiError, ApiResult};
use crate::models::{ReplaceNoteTopicsRequest, SaveGreenNoteRequest};
use crate::AppState;

async fn list_topics(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let topics = with_db(&state, |db| db.list_green_note_topics()).await?;
    Ok(HttpResponse::Ok().json(topics))
}

async fn replace_topics(
    state: web::Data<AppState>,
    body: web::Json<ReplaceNoteTopicsRequest>,
) -> ApiResult<HttpResponse> {
    let topics = body.into_inner().topics;
    let stored = with_db(&state, move |db| db.replace_green_note_topics(&topics)).await?;
    Ok(HttpResponse::Ok().json(stored))
}

async fn list_notes(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let signatures = with_db(&state, |db| db.list_green_note_signatures()).await?;
    Ok(HttpResponse::Ok().json(signatures))
}

/// Saving under an existing signature replaces the note and its scores
async fn save_note(
    state: web::Data<AppState>,
    body: web::Json<SaveGreenNoteRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let note = with_db(&state, move |db| db.save_green_note(&req)).await?;
    log::info!("[GREEN_NOTES] Saved note '{}' for {}", note.signature, note.date);
    Ok(HttpResponse::Ok().json(note))
}

async fn get_note(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let signature = path.into_inner();
    let note = with_db(&state, move |db| db.get_green_note(&signature))
        .await?
        .ok_or_else(|| ApiError::not_found("Green note"))?;
    Ok(HttpResponse::Ok().json(note))
}

async fn latest_for_date(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let date = path.into_inner();
    let note = with_db(&state, move |db| db.latest_green_note_for_date(&date))
        .await?
        .ok_or_else(|| ApiError::not_found("Green note"))?;
    Ok(HttpResponse::Ok().json(note))
}

async fn delete_note(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let signature = path.into_inner();
    let deleted = with_db(&state, move |db| db.delete_green_note(&signature)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/green_note_topics", web::get().to(list_topics))
        .route("/green_note_topics", web::put().to(replace_topics))
        .service(
            web::scope("/green_notes")
                .route("", web::get().to(list_notes))
                .route("", web::post().to(save_note))
                .route("/latest/{date}", web::get().to(latest_for_date))
                .route("/{signature}", web::get().to(get_note))
                .route("/{signature}", web::delete().to(delete_note)),
        );
}
