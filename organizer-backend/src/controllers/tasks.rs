//! Task board and the unclassified backlog.

use actix_web::{web, HttpResponse};

use crate::controllers::with_db;
use crate::error::ApiResult;
use crate::models::{
    AddUnclassifiedTaskRequest, CreateTaskRequest, DeleteUnclassifiedTaskRequest,
    MoveTaskRequest, ReorderTasksRequest,
};
use crate::AppState;

async fn list_tasks(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let tasks = with_db(&state, |db| db.list_tasks()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates the backing `tasks` file too; the card lands in `later`
async fn create_task(
    state: web::Data<AppState>,
    body: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let task = with_db(&state, move |db| db.create_task(req.topic_id, &req.name)).await?;
    Ok(HttpResponse::Ok().json(task))
}

async fn reorder_tasks(
    state: web::Data<AppState>,
    body: web::Json<ReorderTasksRequest>,
) -> ApiResult<HttpResponse> {
    let layout = body.into_inner();
    let tasks = with_db(&state, move |db| db.reorder_tasks(&layout)).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

async fn move_task(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<MoveTaskRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    let task = with_db(&state, move |db| db.move_task(id, &req.section, req.index)).await?;
    Ok(HttpResponse::Ok().json(task))
}

async fn delete_task(state: web::Data<AppState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = with_db(&state, move |db| db.delete_task(id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

async fn list_unclassified(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let tasks = with_db(&state, |db| db.list_unclassified_tasks()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

async fn add_unclassified(
    state: web::Data<AppState>,
    body: web::Json<AddUnclassifiedTaskRequest>,
) -> ApiResult<HttpResponse> {
    let content = body.into_inner().content;
    let task = with_db(&state, move |db| db.add_unclassified_task(&content)).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// The body is the complete backlog in its new order
async fn reorder_unclassified(
    state: web::Data<AppState>,
    body: web::Json<Vec<String>>,
) -> ApiResult<HttpResponse> {
    let contents = body.into_inner();
    let tasks = with_db(&state, move |db| db.reorder_unclassified_tasks(&contents)).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

async fn delete_unclassified(
    state: web::Data<AppState>,
    body: web::Json<DeleteUnclassifiedTaskRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let deleted =
        with_db(&state, move |db| db.delete_unclassified_task(&req.content, req.order)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .route("", web::get().to(list_tasks))
            .route("", web::post().to(create_task))
            .route("/order", web::put().to(reorder_tasks))
            .route("/{id}/move", web::post().to(move_task))
            .route("/{id}", web::delete().to(delete_task)),
    )
    .service(
        web::scope("/unclassified_tasks")
            .route("", web::get().to(list_unclassified))
            .route("", web::post().to(add_unclassified))
            .route("", web::delete().to(delete_unclassified))
            .route("/order", web::put().to(reorder_unclassified)),
    );
}
