use actix_web::{web, HttpResponse};

use crate::controllers::with_db;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateTopicRequest, MoveTopicRequest, UpdateTopicRequest};
use crate::AppState;

/// Topics grouped by house, each house in display order
async fn list_topics(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let grouped = with_db(&state, |db| db.list_topics_by_house()).await?;
    Ok(HttpResponse::Ok().json(grouped))
}

async fn create_topic(
    state: web::Data<AppState>,
    body: web::Json<CreateTopicRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let topic = with_db(&state, move |db| {
        db.create_topic(&req.name, &req.color, req.house.as_deref())
    })
    .await?;
    Ok(HttpResponse::Ok().json(topic))
}

async fn update_topic(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateTopicRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    let topic = with_db(&state, move |db| db.update_topic(id, &req.name, &req.color)).await?;
    Ok(HttpResponse::Ok().json(topic))
}

async fn delete_topic(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = with_db(&state, move |db| db.delete_topic(id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

async fn move_topic(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<MoveTopicRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    let topic = with_db(&state, move |db| db.move_topic(id, &req.house, req.index)).await?;
    Ok(HttpResponse::Ok().json(topic))
}

async fn toggle_flat(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let flat = with_db(&state, move |db| db.toggle_topic_flat(id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id, "flat": flat })))
}

async fn list_topic_files(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let files = with_db(&state, move |db| db.list_files(id)).await?;
    Ok(HttpResponse::Ok().json(files))
}

async fn get_topic(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let topic = with_db(&state, move |db| db.get_topic(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Topic"))?;
    Ok(HttpResponse::Ok().json(topic))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/topics")
            .route("", web::get().to(list_topics))
            .route("", web::post().to(create_topic))
            .route("/{id}", web::get().to(get_topic))
            .route("/{id}", web::put().to(update_topic))
            .route("/{id}", web::delete().to(delete_topic))
            .route("/{id}/move", web::post().to(move_topic))
            .route("/{id}/flat", web::post().to(toggle_flat))
            .route("/{id}/files", web::get().to(list_topic_files)),
    );
}
