use actix_web::{web, HttpResponse};

use crate::controllers::with_db;
use crate::error::ApiResult;
use crate::models::{CreateHouseRequest, RenameHouseRequest};
use crate::AppState;

async fn list_houses(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let houses = with_db(&state, |db| db.list_houses()).await?;
    Ok(HttpResponse::Ok().json(houses))
}

/// Create a house; creating an existing one succeeds with `created: false`
async fn create_house(
    state: web::Data<AppState>,
    body: web::Json<CreateHouseRequest>,
) -> ApiResult<HttpResponse> {
    let name = body.into_inner().name;
    let lookup = name.clone();
    let created = with_db(&state, move |db| db.create_house(&lookup)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "name": name.trim(),
        "created": created
    })))
}

async fn rename_house(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RenameHouseRequest>,
) -> ApiResult<HttpResponse> {
    let old_name = path.into_inner();
    let new_name = body.into_inner().name;
    let target = new_name.clone();
    with_db(&state, move |db| db.rename_house(&old_name, &target)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "name": new_name.trim() })))
}

/// Delete a house; its topics move to the default house first
async fn delete_house(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let target = name.clone();
    let moved = with_db(&state, move |db| db.delete_house(&target)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "deleted": name,
        "moved_topics": moved
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/houses")
            .route("", web::get().to(list_houses))
            .route("", web::post().to(create_house))
            .route("/{name}", web::put().to(rename_house))
            .route("/{name}", web::delete().to(delete_house)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use crate::controllers::test_support::test_state;

    #[actix_web::test]
    async fn test_house_lifecycle() {
        let (_dir, state) = test_state();
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/houses")
            .set_json(json!({"name": "work"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["created"], true);

        let req = test::TestRequest::put()
            .uri("/houses/work")
            .set_json(json!({"name": "office"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/houses").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(["general", "office"]));

        let req = test::TestRequest::delete().uri("/houses/office").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_default_house_delete_is_bad_request() {
        let (_dir, state) = test_state();
        let app = crate::test_app!(state);

        let req = test::TestRequest::delete().uri("/houses/general").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("cannot be deleted"));
    }

    #[actix_web::test]
    async fn test_missing_field_names_the_field() {
        let (_dir, state) = test_state();
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/houses")
            .set_json(json!({"title": "work"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("name"));
    }
}
