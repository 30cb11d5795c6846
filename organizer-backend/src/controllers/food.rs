use actix_web::{web, HttpResponse};

use crate::controllers::with_db;
use crate::error::ApiResult;
use crate::models::{CreateFoodRequest, DeleteFoodQuery, FoodDayQuery};
use crate::AppState;

async fn list_food(
    state: web::Data<AppState>,
    query: web::Query<FoodDayQuery>,
) -> ApiResult<HttpResponse> {
    let date = query.into_inner().date;
    let entries = with_db(&state, move |db| db.list_food(&date)).await?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn add_food(
    state: web::Data<AppState>,
    body: web::Json<CreateFoodRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();
    let entry = with_db(&state, move |db| {
        db.add_food(&req.date, &req.name, req.calories, req.protein)
    })
    .await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// Removes every entry with that name on that date
async fn delete_food(
    state: web::Data<AppState>,
    query: web::Query<DeleteFoodQuery>,
) -> ApiResult<HttpResponse> {
    let DeleteFoodQuery { name, date } = query.into_inner();
    let deleted = with_db(&state, move |db| db.delete_food(&name, &date)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/food")
            .route(web::get().to(list_food))
            .route(web::post().to(add_food))
            .route(web::delete().to(delete_food)),
    );
}
